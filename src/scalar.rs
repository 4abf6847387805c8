//! The scalar tier of the serialization protocol.
//!
//! [`ToChars`] renders a value as text and [`FromChars`] reads it back. Both are
//! implemented for the primitive types; application types opt in by
//! implementing them, after which they can be written to and read from any
//! node:
//!
//! ```rust
//! use yaml_tree::{FromChars, ToChars, Tree};
//!
//! #[derive(Debug, PartialEq)]
//! struct Celsius(i32);
//!
//! impl ToChars for Celsius {
//!     fn to_chars(&self, buf: &mut String) {
//!         self.0.to_chars(buf);
//!         buf.push('C');
//!     }
//! }
//!
//! impl FromChars for Celsius {
//!     fn from_chars(s: &str) -> Option<Self> {
//!         s.strip_suffix('C').and_then(i32::from_chars).map(Celsius)
//!     }
//! }
//!
//! let mut tree = Tree::new();
//! tree.at("temp").write(&Celsius(21)).unwrap();
//! assert_eq!(tree.get("temp").unwrap().read::<Celsius>().unwrap(), Celsius(21));
//! assert_eq!(Celsius::from_chars("21F"), None);
//! ```
//!
//! The module also holds the literal classification used by the emitters and
//! the deserializer.

use std::borrow::Cow;

/// Renders a value into a character buffer.
pub trait ToChars {
    /// Whether the rendered text is a string in its own right, as opposed to
    /// the text form of a number, boolean or other atom. Values of textual
    /// types are written with VALQUO (or KEYQUO) set so they are always
    /// emitted as quoted strings.
    const QUOTED: bool = false;

    /// Appends the textual form of `self` to `buf`.
    fn to_chars(&self, buf: &mut String);
}

/// Parses a value back from its textual form.
///
/// Returns `None` when the text cannot be interpreted as `Self`; this is not an
/// error condition, callers decide what to do with it.
pub trait FromChars: Sized {
    fn from_chars(s: &str) -> Option<Self>;
}

impl<T: ToChars + ?Sized> ToChars for &T {
    const QUOTED: bool = T::QUOTED;

    fn to_chars(&self, buf: &mut String) {
        (**self).to_chars(buf);
    }
}

impl ToChars for str {
    const QUOTED: bool = true;

    fn to_chars(&self, buf: &mut String) {
        buf.push_str(self);
    }
}

impl ToChars for String {
    const QUOTED: bool = true;

    fn to_chars(&self, buf: &mut String) {
        buf.push_str(self);
    }
}

impl ToChars for Cow<'_, str> {
    const QUOTED: bool = true;

    fn to_chars(&self, buf: &mut String) {
        buf.push_str(self);
    }
}

impl ToChars for char {
    const QUOTED: bool = true;

    fn to_chars(&self, buf: &mut String) {
        buf.push(*self);
    }
}

impl ToChars for bool {
    fn to_chars(&self, buf: &mut String) {
        buf.push_str(if *self { "true" } else { "false" });
    }
}

macro_rules! int_to_chars {
    ($($t:ty),*) => {$(
        impl ToChars for $t {
            fn to_chars(&self, buf: &mut String) {
                let mut b = itoa::Buffer::new();
                buf.push_str(b.format(*self));
            }
        }
    )*};
}

int_to_chars!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! float_to_chars {
    ($($t:ty),*) => {$(
        impl ToChars for $t {
            fn to_chars(&self, buf: &mut String) {
                if self.is_nan() {
                    buf.push_str(".nan");
                } else if self.is_infinite() {
                    buf.push_str(if self.is_sign_negative() { "-.inf" } else { ".inf" });
                } else {
                    let mut b = ryu::Buffer::new();
                    buf.push_str(b.format_finite(*self));
                }
            }
        }
    )*};
}

float_to_chars!(f32, f64);

impl FromChars for String {
    fn from_chars(s: &str) -> Option<Self> {
        Some(s.to_string())
    }
}

impl FromChars for char {
    fn from_chars(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl FromChars for bool {
    fn from_chars(s: &str) -> Option<Self> {
        match s {
            "true" | "True" | "TRUE" => Some(true),
            "false" | "False" | "FALSE" => Some(false),
            _ => None,
        }
    }
}

/// Splits an integer literal into sign, radix and digits for the `0x`, `0o`
/// and `0b` forms.
fn split_radix(s: &str) -> Option<(bool, u32, &str)> {
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (radix, digits) = if let Some(d) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        (16, d)
    } else if let Some(d) = body.strip_prefix("0o").or_else(|| body.strip_prefix("0O")) {
        (8, d)
    } else if let Some(d) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        (2, d)
    } else {
        return None;
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    Some((negative, radix, digits))
}

macro_rules! int_from_chars {
    ($($t:ty),*) => {$(
        impl FromChars for $t {
            fn from_chars(s: &str) -> Option<Self> {
                if let Ok(v) = s.parse::<$t>() {
                    return Some(v);
                }
                let (negative, radix, digits) = split_radix(s)?;
                if negative {
                    <$t>::from_str_radix(&format!("-{}", digits), radix).ok()
                } else {
                    <$t>::from_str_radix(digits, radix).ok()
                }
            }
        }
    )*};
}

int_from_chars!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Recognizes the YAML spellings of infinity and not-a-number.
fn special_float(s: &str) -> Option<f64> {
    match s {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => Some(f64::NAN),
        _ => None,
    }
}

/// True when `s` is made of the characters of a decimal float and has at
/// least one digit. Keeps `inf`/`nan`/`infinity`, which Rust's float parser
/// accepts, from being read as numbers.
fn looks_decimal(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.iter().any(u8::is_ascii_digit)
        && bytes
            .iter()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}

macro_rules! float_from_chars {
    ($($t:ty),*) => {$(
        impl FromChars for $t {
            fn from_chars(s: &str) -> Option<Self> {
                if let Some(v) = special_float(s) {
                    return Some(v as $t);
                }
                if !looks_decimal(s) {
                    return None;
                }
                s.parse::<$t>().ok()
            }
        }
    )*};
}

float_from_chars!(f32, f64);

/// Strict JSON number grammar: `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`.
///
/// Leading zeros (`045`), a leading `+`, bare dots (`1.`, `.5`) and repeated
/// dots (`0.30.2`) are all rejected.
///
/// # Examples
///
/// ```rust
/// use yaml_tree::is_json_number;
///
/// assert!(is_json_number("-12.5e3"));
/// assert!(!is_json_number("045"));
/// assert!(!is_json_number("0.30.2"));
/// ```
#[must_use]
pub fn is_json_number(s: &str) -> bool {
    let b = s.as_bytes();
    let mut i = 0;
    if b.get(i) == Some(&b'-') {
        i += 1;
    }
    match b.get(i) {
        Some(b'0') => i += 1,
        Some(c) if c.is_ascii_digit() => {
            while b.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
        }
        _ => return false,
    }
    if b.get(i) == Some(&b'.') {
        i += 1;
        let start = i;
        while b.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == start {
            return false;
        }
    }
    if matches!(b.get(i), Some(b'e') | Some(b'E')) {
        i += 1;
        if matches!(b.get(i), Some(b'+') | Some(b'-')) {
            i += 1;
        }
        let start = i;
        while b.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == start {
            return false;
        }
    }
    i == b.len()
}

/// True when an unquoted scalar can be written to JSON as-is: a strict JSON
/// number or one of `true`, `false`, `null`.
#[must_use]
pub fn is_json_literal(s: &str) -> bool {
    matches!(s, "true" | "false" | "null") || is_json_number(s)
}

/// True for the plain-scalar spellings of null.
#[must_use]
pub fn is_null_plain(s: &str) -> bool {
    matches!(s, "" | "~" | "null" | "Null" | "NULL")
}

/// The typed reading of a plain (unquoted) scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Plain {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str,
}

pub(crate) fn classify_plain(s: &str) -> Plain {
    if is_null_plain(s) {
        return Plain::Null;
    }
    if let Some(b) = bool::from_chars(s) {
        return Plain::Bool(b);
    }
    if let Some(i) = i64::from_chars(s) {
        return Plain::Int(i);
    }
    if let Some(u) = u64::from_chars(s) {
        return Plain::UInt(u);
    }
    if let Some(f) = f64::from_chars(s) {
        return Plain::Float(f);
    }
    Plain::Str
}
