//! Per-node type and style facts.
//!
//! A node records its container kind and, independently, whether its key and
//! its value were quoted and whether it prefers flow layout. These are kept as
//! separate fields rather than one packed integer so every emitter branch is an
//! exhaustive `match`.

use std::fmt;

/// What a node holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    /// Freshly created, not yet written to.
    #[default]
    Unset,
    Scalar,
    Map,
    Seq,
}

impl NodeKind {
    #[inline]
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, NodeKind::Map | NodeKind::Seq)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            NodeKind::Unset => "unset",
            NodeKind::Scalar => "scalar",
            NodeKind::Map => "map",
            NodeKind::Seq => "sequence",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Layout hint for containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Block,
    Flow,
}

/// The full set of type/style facts for one node.
///
/// # Examples
///
/// ```rust
/// use yaml_tree::{NodeKind, NodeType};
///
/// let ty = NodeType::scalar().with_val_quoted(true);
/// assert_eq!(ty.kind, NodeKind::Scalar);
/// assert!(ty.val_quoted);
/// assert!(!ty.key_quoted);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeType {
    pub kind: NodeKind,
    /// KEYQUO: the key must be written as a quoted string.
    pub key_quoted: bool,
    /// VALQUO: the value must be written as a quoted string even if it looks
    /// like a number, boolean or null.
    pub val_quoted: bool,
    pub style: Style,
}

impl NodeType {
    #[must_use]
    pub const fn scalar() -> Self {
        NodeType {
            kind: NodeKind::Scalar,
            key_quoted: false,
            val_quoted: false,
            style: Style::Block,
        }
    }

    #[must_use]
    pub const fn map() -> Self {
        NodeType {
            kind: NodeKind::Map,
            key_quoted: false,
            val_quoted: false,
            style: Style::Block,
        }
    }

    #[must_use]
    pub const fn seq() -> Self {
        NodeType {
            kind: NodeKind::Seq,
            key_quoted: false,
            val_quoted: false,
            style: Style::Block,
        }
    }

    #[must_use]
    pub const fn with_val_quoted(mut self, quoted: bool) -> Self {
        self.val_quoted = quoted;
        self
    }

    #[must_use]
    pub const fn with_key_quoted(mut self, quoted: bool) -> Self {
        self.key_quoted = quoted;
        self
    }

    #[must_use]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self.kind, NodeKind::Map)
    }

    #[inline]
    #[must_use]
    pub const fn is_seq(&self) -> bool {
        matches!(self.kind, NodeKind::Seq)
    }

    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar)
    }

    #[inline]
    #[must_use]
    pub const fn is_flow(&self) -> bool {
        matches!(self.style, Style::Flow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unset_block() {
        let ty = NodeType::default();
        assert_eq!(ty.kind, NodeKind::Unset);
        assert_eq!(ty.style, Style::Block);
        assert!(!ty.key_quoted && !ty.val_quoted);
    }

    #[test]
    fn test_flags_are_independent() {
        let ty = NodeType::map()
            .with_key_quoted(true)
            .with_style(Style::Flow);
        assert!(ty.is_map());
        assert!(ty.key_quoted);
        assert!(!ty.val_quoted);
        assert!(ty.is_flow());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(NodeKind::Seq.to_string(), "sequence");
        assert!(NodeKind::Map.is_container());
        assert!(!NodeKind::Scalar.is_container());
    }
}
