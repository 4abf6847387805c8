//! # yaml_tree
//!
//! An index-addressed YAML/JSON document tree with a string arena, a two-tier
//! (scalar and serde) conversion protocol, and an exact-format JSON emitter.
//!
//! ## What is in the tree?
//!
//! A [`Tree`] is a flat table of nodes addressed by [`NodeId`]. Each node is
//! unset, a scalar, a map or a sequence, and carries an optional key and an
//! optional value. Key and value text is either *borrowed* from caller memory
//! (the tree's lifetime parameter) or *owned* by the tree's [`StringArena`].
//! Two flags record whether the key and the value were quoted, which is what
//! lets the string `"9001"` survive a round trip without turning into the
//! number `9001`.
//!
//! ## Key Features
//!
//! - **Lazy handles**: `tree.at("a")` creates nothing until a write happens
//! - **Scalar tier**: [`ToChars`] and [`FromChars`] for primitives and your own types
//! - **Structural tier**: any `Serialize` type writes a subtree, any
//!   `Deserialize` type reads one
//! - **Exact JSON**: `{"k": v,"k2": v2}` / `[a,b]`, strings always quoted,
//!   numbers bare only when they are valid JSON numbers
//! - **YAML in and out**: a practical YAML subset parser and a block-style emitter
//!
//! ## Quick Start
//!
//! ```rust
//! use yaml_tree::{emit_json, Tree};
//!
//! let mut tree = Tree::new();
//! tree.at("foo").write(&1).unwrap();
//! tree.at("bar").write("2").unwrap();
//! tree.at("list").serialize(&[1.5, 2.0]).unwrap();
//!
//! assert_eq!(emit_json(&tree).unwrap(), r#"{"foo": 1,"bar": "2","list": [1.5,2.0]}"#);
//!
//! let foo: i32 = tree.root().child("foo").unwrap().read().unwrap();
//! assert_eq!(foo, 1);
//! ```
//!
//! ### Serde types
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use yaml_tree::{from_tree, to_tree, emit_json};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Joint {
//!     name: String,
//!     position: f64,
//!     velocity: Option<f64>,
//! }
//!
//! let joint = Joint { name: "elbow".into(), position: 0.5, velocity: None };
//! let tree = to_tree(&joint).unwrap();
//! assert_eq!(
//!     emit_json(&tree).unwrap(),
//!     r#"{"name": "elbow","position": 0.5,"velocity": null}"#
//! );
//! let back: Joint = from_tree(&tree).unwrap();
//! assert_eq!(back, joint);
//! ```
//!
//! ### Parsing
//!
//! ```rust
//! use yaml_tree::{emit_json, parse_in_arena};
//!
//! let tree = parse_in_arena("string_value: 'string'\nnumber_value: '9001'\n").unwrap();
//! assert_eq!(
//!     emit_json(&tree).unwrap(),
//!     r#"{"string_value": "string","number_value": "9001"}"#
//! );
//! ```
//!
//! ## Ownership
//!
//! [`parse_in_place`] and [`NodeMut::set_val`] store views into caller memory;
//! the borrow checker keeps the tree from outliving it. [`Tree::into_owned`]
//! copies every such view into the arena and yields a `Tree<'static>`.
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Node links are indices, never references, so appending never invalidates them
//! - Arena text is addressed by offset, so arena growth never invalidates it
//! - Emission and parsing are depth-limited (see [`DEFAULT_MAX_DEPTH`])

pub mod arena;
pub mod de;
pub mod emit;
pub mod error;
pub mod flags;
pub mod macros;
pub mod node;
pub mod options;
pub mod parse;
pub mod scalar;
pub mod ser;
pub mod store;
pub mod tree;

pub use arena::{Span, StringArena, Text};
pub use de::NodeDeserializer;
pub use emit::json::AsJson;
pub use error::{Error, Result};
pub use flags::{NodeKind, NodeType, Style};
pub use node::{Children, NodeMut, NodeRef};
pub use options::{EmitOptions, ParseOptions, DEFAULT_MAX_DEPTH};
pub use parse::{parse_in_arena, parse_in_place, parse_in_place_with_options, parse_with_options};
pub use scalar::{is_json_literal, is_json_number, FromChars, ToChars};
pub use ser::NodeSerializer;
pub use store::{ChildIds, NodeId, NodeStore};
pub use tree::Tree;

use serde::{Deserialize, Serialize};
use std::io;

/// Serialize any `T: Serialize` into a new self-contained tree.
///
/// # Examples
///
/// ```rust
/// use yaml_tree::to_tree;
///
/// let tree = to_tree(&vec![1, 2, 3]).unwrap();
/// assert_eq!(tree.root().num_children(), 3);
/// ```
///
/// # Errors
///
/// Returns an error if the value reports one, or if a map key is not a
/// scalar.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_tree<T>(value: &T) -> Result<Tree<'static>>
where
    T: ?Sized + Serialize,
{
    let mut tree = Tree::new();
    tree.root_mut().serialize(value)?;
    Ok(tree)
}

/// Deserialize a `T` from the root of `tree`.
///
/// Strings are borrowed from the tree where `T` allows it.
///
/// # Errors
///
/// Returns an error if the tree's shape or text does not fit `T`.
pub fn from_tree<'t, T>(tree: &'t Tree<'_>) -> Result<T>
where
    T: Deserialize<'t>,
{
    tree.root().deserialize()
}

/// Emit a tree as compact JSON.
///
/// # Examples
///
/// ```rust
/// use yaml_tree::{emit_json, parse_in_arena};
///
/// let tree = parse_in_arena("[045, 1.2.3, 1e3]").unwrap();
/// assert_eq!(emit_json(&tree).unwrap(), r#"["045","1.2.3",1e3]"#);
/// ```
///
/// # Errors
///
/// [`Error::DepthExceeded`] for trees nested deeper than the default limit,
/// [`Error::InvalidTree`] for a map child without a key.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn emit_json(tree: &Tree<'_>) -> Result<String> {
    emit::json::emit(tree, &EmitOptions::default())
}

/// Emit a tree as compact JSON with custom options.
///
/// # Errors
///
/// See [`emit_json`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn emit_json_with_options(tree: &Tree<'_>, options: &EmitOptions) -> Result<String> {
    emit::json::emit(tree, options)
}

/// Emit the subtree rooted at `node` as compact JSON.
///
/// # Errors
///
/// See [`emit_json`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn emit_json_node(node: NodeRef<'_, '_>) -> Result<String> {
    emit::json::emit_node(node, &EmitOptions::default())
}

/// Emit a tree as compact JSON into an I/O writer.
///
/// # Errors
///
/// See [`emit_json`]; writer failures are reported as [`Error::Io`].
pub fn emit_json_to_writer<W>(writer: W, tree: &Tree<'_>) -> Result<()>
where
    W: io::Write,
{
    emit::json::emit_to_writer(writer, tree, &EmitOptions::default())
}

/// Emit a tree as block-style YAML.
///
/// # Examples
///
/// ```rust
/// use yaml_tree::{emit_yaml, parse_in_arena};
///
/// let tree = parse_in_arena(r#"{a: [1, "2"]}"#).unwrap();
/// assert_eq!(emit_yaml(&tree).unwrap(), "a:\n  - 1\n  - '2'\n");
/// ```
///
/// # Errors
///
/// See [`emit_json`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn emit_yaml(tree: &Tree<'_>) -> Result<String> {
    emit::yaml::emit(tree, &EmitOptions::default())
}

/// Emit a tree as YAML with custom options.
///
/// # Errors
///
/// See [`emit_json`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn emit_yaml_with_options(tree: &Tree<'_>, options: &EmitOptions) -> Result<String> {
    emit::yaml::emit(tree, options)
}

/// Emit the subtree rooted at `node` as a YAML document.
///
/// # Errors
///
/// See [`emit_json`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn emit_yaml_node(node: NodeRef<'_, '_>) -> Result<String> {
    emit::yaml::emit_node(node, &EmitOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
    }

    #[test]
    fn test_serialize_deserialize_point() {
        let point = Point { x: 1, y: 2 };
        let tree = to_tree(&point).unwrap();
        let point_back: Point = from_tree(&tree).unwrap();
        assert_eq!(point, point_back);
    }

    #[test]
    fn test_serialize_deserialize_user() {
        let user = User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
        };

        let tree = to_tree(&user).unwrap();
        assert_eq!(
            emit_json(&tree).unwrap(),
            r#"{"id": 123,"name": "Alice","active": true,"tags": ["admin","user"]}"#
        );
        let user_back: User = from_tree(&tree).unwrap();
        assert_eq!(user, user_back);
    }

    #[test]
    fn test_through_text() {
        let user = User {
            id: 7,
            name: "it's".to_string(),
            active: false,
            tags: vec![],
        };
        let yaml = emit_yaml(&to_tree(&user).unwrap()).unwrap();
        let parsed = parse_in_arena(&yaml).unwrap();
        let user_back: User = from_tree(&parsed).unwrap();
        assert_eq!(user, user_back);
    }

    #[test]
    fn test_arrays() {
        let numbers = vec![1, 2, 3, 4, 5];
        let tree = to_tree(&numbers).unwrap();
        let numbers_back: Vec<i32> = from_tree(&tree).unwrap();
        assert_eq!(numbers, numbers_back);
    }

    #[test]
    fn test_custom_options() {
        let tree = to_tree(&vec![vec![1]]).unwrap();
        let options = EmitOptions::new().with_max_depth(1);
        assert!(emit_json_with_options(&tree, &options).is_err());
        assert!(emit_yaml_with_options(&tree, &options).is_err());
        assert_eq!(emit_json(&tree).unwrap(), "[[1]]");
    }
}
