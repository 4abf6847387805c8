//! Append-only string storage owned by a [`Tree`](crate::Tree).
//!
//! Text synthesized while building a tree (formatted numbers, serialized
//! strings, unescaped parser output) lives here. A stored string is addressed
//! by a [`Span`] (offset and length) rather than by a reference, so growing the
//! arena never invalidates a view handed out earlier.

use crate::scalar::ToChars;

/// A byte range inside a [`StringArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

impl Span {
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Text attached to a node: either borrowed from caller memory or owned by
/// the tree's arena.
///
/// `Borrowed` views carry the caller's lifetime `'a`; the tree cannot outlive
/// the memory they point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text<'a> {
    Borrowed(&'a str),
    Arena(Span),
}

impl<'a> Text<'a> {
    #[inline]
    #[must_use]
    pub const fn is_borrowed(&self) -> bool {
        matches!(self, Text::Borrowed(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_arena(&self) -> bool {
        matches!(self, Text::Arena(_))
    }
}

/// Growable, append-only byte storage.
///
/// # Examples
///
/// ```rust
/// use yaml_tree::StringArena;
///
/// let mut arena = StringArena::new();
/// let a = arena.push_str("hello");
/// let b = arena.format(&42);
/// assert_eq!(arena.get(a), "hello");
/// assert_eq!(arena.get(b), "42");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringArena {
    buf: String,
    // `ToChars` output lands here first so user code never sees `buf`.
    scratch: String,
}

impl StringArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        StringArena {
            buf: String::with_capacity(capacity),
            scratch: String::new(),
        }
    }

    /// Copies `s` into the arena.
    pub fn push_str(&mut self, s: &str) -> Span {
        let offset = self.buf.len();
        self.buf.push_str(s);
        Span {
            offset,
            len: s.len(),
        }
    }

    /// Renders `value` through its [`ToChars`] implementation and appends the
    /// result to the arena.
    ///
    /// The implementation writes into a scratch buffer, so whatever it does to
    /// that buffer cannot disturb text stored earlier.
    pub fn format<T: ToChars + ?Sized>(&mut self, value: &T) -> Span {
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.clear();
        value.to_chars(&mut scratch);
        let span = self.push_str(&scratch);
        self.scratch = scratch;
        span
    }

    /// Resolves a span handed out by this arena.
    ///
    /// A span from another arena resolves to the empty string rather than
    /// panicking.
    #[must_use]
    pub fn get(&self, span: Span) -> &str {
        self.buf.get(span.offset..span.end()).unwrap_or("")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.buf.reserve(additional);
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}
