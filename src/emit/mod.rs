//! Text emitters.
//!
//! - [`json`]: compact JSON, the format the tree's quoting flags are designed
//!   around
//! - [`yaml`]: block YAML, with flow layout for nodes marked [`Style::Flow`](crate::Style::Flow)
//!
//! Both walk the tree depth first and in insertion order, and both refuse
//! trees nested deeper than [`EmitOptions::max_depth`](crate::EmitOptions).

pub mod json;
pub mod yaml;

use crate::{Error, Result};
use std::fmt::Write;

/// Writes `s` as a double-quoted string with JSON escapes for quote,
/// backslash, newline, tab, carriage return, backspace and form feed.
///
/// Other C0 control characters are not copied raw: a raw control character
/// is not allowed inside a JSON string, so they become `\u00XX`. Everything
/// else, braces and brackets included, is copied as-is.
pub(crate) fn write_escaped<W: Write>(out: &mut W, s: &str) -> Result<()> {
    out.write_char('"').map_err(fmt_error)?;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        let esc = match c {
            '"' => "\\\"",
            '\\' => "\\\\",
            '\n' => "\\n",
            '\t' => "\\t",
            '\r' => "\\r",
            '\u{0008}' => "\\b",
            '\u{000C}' => "\\f",
            c if c < ' ' => {
                out.write_str(&s[start..i]).map_err(fmt_error)?;
                write!(out, "\\u{:04x}", c as u32).map_err(fmt_error)?;
                start = i + 1;
                continue;
            }
            _ => continue,
        };
        out.write_str(&s[start..i]).map_err(fmt_error)?;
        out.write_str(esc).map_err(fmt_error)?;
        start = i + c.len_utf8();
    }
    out.write_str(&s[start..]).map_err(fmt_error)?;
    out.write_char('"').map_err(fmt_error)
}

pub(crate) fn fmt_error(_: std::fmt::Error) -> Error {
    Error::io("formatter error")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(s: &str) -> String {
        let mut out = String::new();
        write_escaped(&mut out, s).unwrap();
        out
    }

    #[test]
    fn test_every_escape() {
        assert_eq!(
            escaped("\"\\\n\t\r\u{0008}\u{000C}"),
            r#""\"\\\n\t\r\b\f""#
        );
    }

    #[test]
    fn test_structural_characters_pass_through() {
        assert_eq!(escaped("{[x]}"), r#""{[x]}""#);
        assert_eq!(escaped("ünï"), "\"ünï\"");
        assert_eq!(escaped(""), "\"\"");
    }

    #[test]
    fn test_other_controls_use_unicode_escapes() {
        assert_eq!(escaped("a\u{1}b\u{1f}"), r#""a\u0001b\u001f""#);
    }
}
