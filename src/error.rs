//! Error types for tree construction, serialization, parsing and emission.
//!
//! ## Error Categories
//!
//! - **Type Mismatches**: a map/sequence operation on a scalar node, or the reverse
//! - **Missing Keys**: a required child was looked up and is not there
//! - **Parse Failures**: a scalar's text cannot be read as the requested type
//! - **Syntax Errors**: the document parser rejected its input (with line/column)
//! - **Depth Errors**: nesting exceeded the configured maximum
//!
//! Scalar conversion itself ([`FromChars`](crate::FromChars)) reports failure as
//! `None`; only the tree-level readers lift that into [`Error::ParseFailure`], so a
//! caller can try several target types without any error plumbing.
//!
//! ## Examples
//!
//! ```rust
//! use yaml_tree::{Error, Tree};
//!
//! let tree = yaml_tree::parse_in_arena("{a: 1}").unwrap();
//! let err = tree.root().child("b").unwrap_err();
//! assert!(matches!(err, Error::MissingKey(_)));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents every error this crate can report.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error while writing emitted text
    #[error("IO error: {0}")]
    Io(String),

    /// Syntax error in parser input
    #[error("Syntax error at line {line}, column {col}: {msg}")]
    Syntax { line: usize, col: usize, msg: String },

    /// An operation was applied to a node of the wrong kind
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A required child key is absent
    #[error("Missing key: {0}")]
    MissingKey(String),

    /// Scalar text could not be interpreted as the target type
    #[error("Cannot parse {text:?} as {target}")]
    ParseFailure { target: String, text: String },

    /// Nesting went deeper than the configured limit
    #[error("Maximum nesting depth of {max} exceeded")]
    DepthExceeded { max: usize },

    /// The tree breaks an invariant the emitters rely on
    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),

    /// Generic message
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_tree::Error;
    ///
    /// let err = Error::syntax(3, 7, "unterminated flow mapping");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_tree::Error;
    ///
    /// let err = Error::type_mismatch("map", "scalar");
    /// assert!(err.to_string().contains("expected map"));
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a missing key error.
    pub fn missing_key(key: &str) -> Self {
        Error::MissingKey(key.to_string())
    }

    /// Creates a parse failure for `text` that could not become a `target`.
    pub fn parse_failure(target: &str, text: &str) -> Self {
        Error::ParseFailure {
            target: target.to_string(),
            text: text.to_string(),
        }
    }

    /// Creates a depth error.
    pub fn depth_exceeded(max: usize) -> Self {
        Error::DepthExceeded { max }
    }

    /// Creates an invalid tree error.
    pub fn invalid_tree(msg: &str) -> Self {
        Error::InvalidTree(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_tree::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    fn missing_field(field: &'static str) -> Self {
        Error::MissingKey(field.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
