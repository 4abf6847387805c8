//! JSON emission.
//!
//! Output is compact: maps are `{"k": v,"k2": v2}`, sequences `[a,b]`, with
//! a single space after each `:` and no other whitespace. Keys are always
//! quoted. A scalar is written bare only when it is unquoted and its text is
//! already a JSON literal (a strict JSON number, `true`, `false` or `null`);
//! everything else becomes a JSON string.
//!
//! ## Examples
//!
//! ```rust
//! use yaml_tree::{emit_json, parse_in_arena};
//!
//! let tree = parse_in_arena("{a: 1, b: '2', c: 0.30.2, d: ~}").unwrap();
//! assert_eq!(emit_json(&tree).unwrap(), r#"{"a": 1,"b": "2","c": "0.30.2","d": null}"#);
//! ```

use super::{fmt_error, write_escaped};
use crate::flags::NodeKind;
use crate::node::NodeRef;
use crate::options::EmitOptions;
use crate::scalar::{is_json_literal, is_null_plain};
use crate::tree::Tree;
use crate::{Error, Result};
use log::debug;
use std::fmt::{self, Write};

struct JsonEmitter<'o, W> {
    out: W,
    options: &'o EmitOptions,
}

impl<W: Write> JsonEmitter<'_, W> {
    fn node(&mut self, node: NodeRef<'_, '_>, depth: usize) -> Result<()> {
        match node.kind() {
            NodeKind::Map => {
                self.enter(depth)?;
                self.out.write_char('{').map_err(fmt_error)?;
                for (i, child) in node.children()?.enumerate() {
                    if i > 0 {
                        self.out.write_char(',').map_err(fmt_error)?;
                    }
                    let key = child
                        .key()
                        .ok_or_else(|| Error::invalid_tree("map child without a key"))?;
                    write_escaped(&mut self.out, key)?;
                    self.out.write_str(": ").map_err(fmt_error)?;
                    self.node(child, depth + 1)?;
                }
                self.out.write_char('}').map_err(fmt_error)
            }
            NodeKind::Seq => {
                self.enter(depth)?;
                self.out.write_char('[').map_err(fmt_error)?;
                for (i, child) in node.children()?.enumerate() {
                    if i > 0 {
                        self.out.write_char(',').map_err(fmt_error)?;
                    }
                    self.node(child, depth + 1)?;
                }
                self.out.write_char(']').map_err(fmt_error)
            }
            NodeKind::Scalar | NodeKind::Unset => self.scalar(node),
        }
    }

    fn enter(&self, depth: usize) -> Result<()> {
        if depth >= self.options.max_depth {
            return Err(Error::depth_exceeded(self.options.max_depth));
        }
        Ok(())
    }

    fn scalar(&mut self, node: NodeRef<'_, '_>) -> Result<()> {
        let Some(text) = node.val() else {
            return self.out.write_str("null").map_err(fmt_error);
        };
        if node.is_val_quoted() {
            return write_escaped(&mut self.out, text);
        }
        if is_json_literal(text) {
            self.out.write_str(text).map_err(fmt_error)
        } else if !text.is_empty() && is_null_plain(text) {
            self.out.write_str("null").map_err(fmt_error)
        } else {
            write_escaped(&mut self.out, text)
        }
    }
}

fn write_tree<W: Write>(out: W, tree: &Tree<'_>, options: &EmitOptions) -> Result<()> {
    if tree.is_empty() {
        return Ok(());
    }
    write_node(out, tree.root(), options)
}

fn write_node<W: Write>(out: W, node: NodeRef<'_, '_>, options: &EmitOptions) -> Result<()> {
    let mut emitter = JsonEmitter { out, options };
    emitter.node(node, 0)
}

/// Emits a whole tree. An empty tree yields an empty document.
pub fn emit(tree: &Tree<'_>, options: &EmitOptions) -> Result<String> {
    debug!("emit_json: {} nodes", tree.len());
    let mut out = String::new();
    write_tree(&mut out, tree, options)?;
    Ok(out)
}

/// Emits the subtree rooted at `node`, exactly as it would appear if it were
/// the root of its own tree.
pub fn emit_node(node: NodeRef<'_, '_>, options: &EmitOptions) -> Result<String> {
    debug!("emit_json: subtree at node {}", node.id().index());
    let mut out = String::new();
    write_node(&mut out, node, options)?;
    Ok(out)
}

/// Streams a whole tree to an I/O writer.
pub fn emit_to_writer<W: std::io::Write>(
    mut writer: W,
    tree: &Tree<'_>,
    options: &EmitOptions,
) -> Result<()> {
    let text = emit(tree, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))
}

/// [`Display`](fmt::Display) adapter returned by [`Tree::as_json`].
///
/// Formatting never fails. No depth limit applies, and a tree that cannot be
/// emitted (a map child without a key) is shown as a JSON string holding the
/// error message.
pub struct AsJson<'t, 'a> {
    pub(crate) tree: &'t Tree<'a>,
}

impl fmt::Display for AsJson<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = EmitOptions::new().with_max_depth(usize::MAX);
        let mut out = String::new();
        match write_tree(&mut out, self.tree, &options) {
            Ok(()) => f.write_str(&out),
            Err(e) => {
                let mut shown = String::new();
                write_escaped(&mut shown, &format!("<{}>", e)).map_err(|_| fmt::Error)?;
                f.write_str(&shown)
            }
        }
    }
}
