//! Configuration options for emission and parsing.
//!
//! - [`EmitOptions`]: indentation for YAML output and the nesting limit
//! - [`ParseOptions`]: the nesting limit for the document parser
//!
//! ## Examples
//!
//! ```rust
//! use yaml_tree::{emit_yaml_with_options, parse_in_arena, EmitOptions};
//!
//! let tree = parse_in_arena("{a: {b: 1}}").unwrap();
//! let options = EmitOptions::new().with_indent(4);
//! let yaml = emit_yaml_with_options(&tree, &options).unwrap();
//! assert_eq!(yaml, "a:\n    b: 1\n");
//! ```

/// Default nesting limit shared by the emitters and the parser.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Configuration options for the JSON and YAML emitters.
///
/// # Examples
///
/// ```rust
/// use yaml_tree::EmitOptions;
///
/// let options = EmitOptions::new().with_indent(4).with_max_depth(32);
/// assert_eq!(options.indent, 4);
/// assert_eq!(options.max_depth, 32);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EmitOptions {
    /// Spaces per nesting level in block YAML. JSON output is always compact.
    pub indent: usize,
    pub max_depth: usize,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            indent: 2,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EmitOptions {
    /// Creates default options (2-space YAML indent, depth limit 256).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the YAML indentation size.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the maximum nesting depth accepted by the emitter.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Configuration options for the document parser.
///
/// # Examples
///
/// ```rust
/// use yaml_tree::{parse_with_options, ParseOptions};
///
/// let options = ParseOptions::new().with_max_depth(1);
/// assert!(parse_with_options("[[1]]", &options).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ParseOptions {
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
