//! YAML emission.
//!
//! Containers are written in block layout, indented by
//! [`EmitOptions::indent`]; a map or sequence that is an item of a sequence
//! starts on the item's own line (`- a: 1`). Containers marked
//! [`Style::Flow`](crate::Style::Flow), and empty ones, are written inline
//! (`[a, b]`, `{k: v}`, `{}`).
//!
//! Scalars keep their quoting: a quoted value is single-quoted even when it
//! looks like a number, so `'9001'` reads back as a string. Text with line
//! breaks or control characters is double-quoted with escapes; unquoted text
//! that would not read back as itself is single-quoted.
//!
//! ```rust
//! use serde::Serialize;
//! use yaml_tree::{emit_yaml, to_tree};
//!
//! #[derive(Serialize)]
//! struct Reading { number_value: String, count: u32 }
//!
//! let tree = to_tree(&Reading { number_value: "9001".into(), count: 3 }).unwrap();
//! assert_eq!(emit_yaml(&tree).unwrap(), "number_value: '9001'\ncount: 3\n");
//! ```

use super::write_escaped;
use crate::flags::NodeKind;
use crate::node::NodeRef;
use crate::options::EmitOptions;
use crate::tree::Tree;
use crate::{Error, Result};
use log::debug;

struct YamlEmitter<'o> {
    out: String,
    options: &'o EmitOptions,
}

/// True for a non-empty container in block layout.
fn is_block(node: NodeRef<'_, '_>) -> bool {
    node.kind().is_container() && node.num_children() > 0 && !node.node_type().is_flow()
}

/// Whether plain text would be misread, or break the surrounding layout,
/// if written without quotes.
fn needs_quotes(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return true;
    };
    if s.starts_with(' ') || s.ends_with(' ') || s.ends_with(':') {
        return true;
    }
    if matches!(
        first,
        '?' | ':' | ',' | '[' | ']' | '{' | '}' | '#' | '&' | '*' | '!' | '|' | '>' | '\'' | '"' | '%' | '@' | '`'
    ) {
        return true;
    }
    if s == "-" || s.starts_with("- ") {
        return true;
    }
    s.contains(": ") || s.contains(" #") || s.contains([',', '[', ']', '{', '}'])
}

impl YamlEmitter<'_> {
    fn enter(&self, depth: usize) -> Result<()> {
        if depth >= self.options.max_depth {
            return Err(Error::depth_exceeded(self.options.max_depth));
        }
        Ok(())
    }

    fn pad(&mut self, column: usize) {
        self.out.extend(std::iter::repeat(' ').take(column));
    }

    fn text(&mut self, text: &str, quoted: bool) -> Result<()> {
        if text.chars().any(char::is_control) {
            write_escaped(&mut self.out, text)
        } else if quoted || needs_quotes(text) {
            self.out.push('\'');
            self.out.push_str(&text.replace('\'', "''"));
            self.out.push('\'');
            Ok(())
        } else {
            self.out.push_str(text);
            Ok(())
        }
    }

    fn key(&mut self, node: NodeRef<'_, '_>) -> Result<()> {
        let key = node
            .key()
            .ok_or_else(|| Error::invalid_tree("map child without a key"))?;
        self.text(key, node.is_key_quoted())?;
        self.out.push(':');
        Ok(())
    }

    /// Writes a node on the current line.
    fn inline(&mut self, node: NodeRef<'_, '_>, depth: usize) -> Result<()> {
        match node.kind() {
            NodeKind::Map => {
                self.enter(depth)?;
                self.out.push('{');
                for (i, child) in node.children()?.enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.key(child)?;
                    self.out.push(' ');
                    self.inline(child, depth + 1)?;
                }
                self.out.push('}');
                Ok(())
            }
            NodeKind::Seq => {
                self.enter(depth)?;
                self.out.push('[');
                for (i, child) in node.children()?.enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.inline(child, depth + 1)?;
                }
                self.out.push(']');
                Ok(())
            }
            NodeKind::Scalar | NodeKind::Unset => match node.val() {
                Some(text) => self.text(text, node.is_val_quoted()),
                None => {
                    self.out.push('~');
                    Ok(())
                }
            },
        }
    }

    /// Writes a block container whose entries start at `column`. With
    /// `inline_first` the first entry continues the current line.
    fn block(
        &mut self,
        node: NodeRef<'_, '_>,
        column: usize,
        depth: usize,
        inline_first: bool,
    ) -> Result<()> {
        self.enter(depth)?;
        let is_map = node.is_map();
        for (i, child) in node.children()?.enumerate() {
            if i > 0 || !inline_first {
                self.pad(column);
            }
            if is_map {
                self.key(child)?;
                if is_block(child) {
                    self.out.push('\n');
                    self.block(child, column + self.options.indent, depth + 1, false)?;
                    continue;
                }
                self.out.push(' ');
            } else {
                self.out.push_str("- ");
                if is_block(child) {
                    self.block(child, column + 2, depth + 1, true)?;
                    continue;
                }
            }
            self.inline(child, depth + 1)?;
            self.out.push('\n');
        }
        Ok(())
    }

    fn document(&mut self, node: NodeRef<'_, '_>) -> Result<()> {
        if is_block(node) {
            self.block(node, 0, 0, false)
        } else {
            self.inline(node, 0)?;
            self.out.push('\n');
            Ok(())
        }
    }
}

/// Emits a whole tree. An empty tree yields an empty document.
pub fn emit(tree: &Tree<'_>, options: &EmitOptions) -> Result<String> {
    debug!("emit_yaml: {} nodes", tree.len());
    if tree.is_empty() {
        return Ok(String::new());
    }
    emit_node(tree.root(), options)
}

/// Emits the subtree rooted at `node` as a standalone document.
pub fn emit_node(node: NodeRef<'_, '_>, options: &EmitOptions) -> Result<String> {
    let mut emitter = YamlEmitter {
        out: String::new(),
        options,
    };
    emitter.document(node)?;
    Ok(emitter.out)
}
