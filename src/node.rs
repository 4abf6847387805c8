//! Handles onto individual nodes.
//!
//! [`NodeRef`] is a cheap, copyable read-only view (tree reference plus node
//! id). [`NodeMut`] is the mutable counterpart used to build trees; indexing
//! it with [`NodeMut::at`] does not create anything until the returned handle
//! is written to.
//!
//! ## Examples
//!
//! ```rust
//! use yaml_tree::Tree;
//!
//! let mut tree = Tree::new();
//! {
//!     let mut missing = tree.at("a");
//!     let _deeper = missing.at("b");
//! }
//! assert!(tree.is_empty());
//!
//! tree.at("a").at("b").write(&1).unwrap();
//! let b = tree.get("a").and_then(|a| a.get("b")).unwrap();
//! assert_eq!(b.read::<i32>().unwrap(), 1);
//! ```

use crate::de::NodeDeserializer;
use crate::emit;
use crate::flags::{NodeKind, NodeType, Style};
use crate::scalar::{FromChars, ToChars};
use crate::ser::NodeSerializer;
use crate::store::{ChildIds, NodeId};
use crate::tree::Tree;
use crate::{Error, Result};
use log::trace;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Read-only handle onto one node of a [`Tree`].
#[derive(Clone, Copy)]
pub struct NodeRef<'t, 'a> {
    tree: &'t Tree<'a>,
    id: NodeId,
}

impl<'t, 'a> NodeRef<'t, 'a> {
    pub(crate) fn new(tree: &'t Tree<'a>, id: NodeId) -> Self {
        NodeRef { tree, id }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn tree(&self) -> &'t Tree<'a> {
        self.tree
    }

    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.tree.node_type(self.id).unwrap_or_default()
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.node_type().kind
    }

    #[must_use]
    pub fn is_map(&self) -> bool {
        self.node_type().is_map()
    }

    #[must_use]
    pub fn is_seq(&self) -> bool {
        self.node_type().is_seq()
    }

    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.node_type().is_scalar()
    }

    #[must_use]
    pub fn is_key_quoted(&self) -> bool {
        self.node_type().key_quoted
    }

    #[must_use]
    pub fn is_val_quoted(&self) -> bool {
        self.node_type().val_quoted
    }

    #[must_use]
    pub fn style(&self) -> Style {
        self.node_type().style
    }

    #[must_use]
    pub fn key(&self) -> Option<&'t str> {
        self.tree.key(self.id).ok().flatten()
    }

    #[must_use]
    pub fn val(&self) -> Option<&'t str> {
        self.tree.val(self.id).ok().flatten()
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeRef<'t, 'a>> {
        let parent = self.tree.data(self.id).ok()?.parent?;
        Some(NodeRef::new(self.tree, parent))
    }

    /// Iterates the children in insertion order. Scalars have no children
    /// and fail with [`Error::TypeMismatch`].
    pub fn children(&self) -> Result<Children<'t, 'a>> {
        Ok(Children {
            tree: self.tree,
            ids: self.tree.children(self.id)?,
        })
    }

    #[must_use]
    pub fn num_children(&self) -> usize {
        self.tree.data(self.id).map_or(0, |d| d.num_children)
    }

    #[must_use]
    pub fn child_at(&self, pos: usize) -> Option<NodeRef<'t, 'a>> {
        self.children().ok()?.nth(pos)
    }

    /// Looks up a map child by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<NodeRef<'t, 'a>> {
        let id = self.tree.find_child(self.id, key)?;
        Some(NodeRef::new(self.tree, id))
    }

    /// Looks up a required map child.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] when this node is not a map, [`Error::MissingKey`]
    /// when it has no child named `key`.
    pub fn child(&self, key: &str) -> Result<NodeRef<'t, 'a>> {
        let kind = self.kind();
        if kind != NodeKind::Map {
            return Err(Error::type_mismatch("map", kind.name()));
        }
        self.get(key).ok_or_else(|| Error::missing_key(key))
    }

    #[must_use]
    pub fn has_child(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Parses the scalar value through [`FromChars`].
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] on a container and [`Error::ParseFailure`] when
    /// the text is not a valid `T`.
    pub fn read<T: FromChars>(&self) -> Result<T> {
        let kind = self.kind();
        if kind.is_container() {
            return Err(Error::type_mismatch("scalar", kind.name()));
        }
        let text = self.val().unwrap_or("");
        T::from_chars(text).ok_or_else(|| Error::parse_failure(std::any::type_name::<T>(), text))
    }

    /// Parses the key through [`FromChars`].
    pub fn read_key<T: FromChars>(&self) -> Result<T> {
        let text = self
            .key()
            .ok_or_else(|| Error::type_mismatch("keyed node", "unkeyed node"))?;
        T::from_chars(text).ok_or_else(|| Error::parse_failure(std::any::type_name::<T>(), text))
    }

    /// Reads the subtree rooted here as any deserializable type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde::Deserialize;
    /// use yaml_tree::parse_in_arena;
    ///
    /// #[derive(Deserialize, Debug, PartialEq)]
    /// struct Point { x: i32, y: i32 }
    ///
    /// let tree = parse_in_arena("{x: 1, y: 2}").unwrap();
    /// let p: Point = tree.root().deserialize().unwrap();
    /// assert_eq!(p, Point { x: 1, y: 2 });
    /// ```
    pub fn deserialize<T: Deserialize<'t>>(&self) -> Result<T> {
        trace!("deserialize: node {} into {}", self.id.index(), std::any::type_name::<T>());
        T::deserialize(NodeDeserializer::new(*self))
    }

    /// Reads child `key` into `dst` if it exists, leaving `dst` untouched
    /// otherwise. Returns whether the key was present.
    ///
    /// A present key is always read, even when its value is empty.
    pub fn read_optional<T: Deserialize<'t>>(&self, key: &str, dst: &mut T) -> Result<bool> {
        match self.get(key) {
            Some(node) => {
                *dst = node.deserialize()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn emit_json(&self) -> Result<String> {
        emit::json::emit_node(*self, &crate::EmitOptions::default())
    }

    pub fn emit_yaml(&self) -> Result<String> {
        emit::yaml::emit_node(*self, &crate::EmitOptions::default())
    }
}

impl PartialEq for NodeRef<'_, '_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl fmt::Debug for NodeRef<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id.index())
            .field("kind", &self.kind())
            .field("key", &self.key())
            .field("val", &self.val())
            .finish()
    }
}

/// Iterator over the children of a node, yielding handles.
#[derive(Clone)]
pub struct Children<'t, 'a> {
    tree: &'t Tree<'a>,
    ids: ChildIds<'t, 'a>,
}

impl<'t, 'a> Iterator for Children<'t, 'a> {
    type Item = NodeRef<'t, 'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|id| NodeRef::new(self.tree, id))
    }
}

#[derive(Debug, Clone)]
enum Target<'a> {
    Node(NodeId),
    /// Not created yet: the path of keys below an existing node.
    Seed {
        base: NodeId,
        keys: Vec<Cow<'a, str>>,
    },
}

/// Mutable handle onto one node of a [`Tree`], or onto a node that will be
/// created on first write.
pub struct NodeMut<'t, 'a> {
    tree: &'t mut Tree<'a>,
    target: Target<'a>,
}

impl<'t, 'a> NodeMut<'t, 'a> {
    pub(crate) fn existing(tree: &'t mut Tree<'a>, id: NodeId) -> Self {
        NodeMut {
            tree,
            target: Target::Node(id),
        }
    }

    pub(crate) fn lookup(tree: &'t mut Tree<'a>, parent: NodeId, key: Cow<'a, str>) -> Self {
        let target = match tree.find_child(parent, &key) {
            Some(id) => Target::Node(id),
            None => Target::Seed {
                base: parent,
                keys: vec![key],
            },
        };
        NodeMut { tree, target }
    }

    /// True while the handle points at a node that does not exist yet.
    #[must_use]
    pub fn is_seed(&self) -> bool {
        matches!(self.target, Target::Seed { .. })
    }

    /// The node id, once the node exists.
    #[must_use]
    pub fn id(&self) -> Option<NodeId> {
        match self.target {
            Target::Node(id) => Some(id),
            Target::Seed { .. } => None,
        }
    }

    /// Read-only view of the node, once it exists.
    #[must_use]
    pub fn as_node_ref(&self) -> Option<NodeRef<'_, 'a>> {
        self.id().map(|id| NodeRef::new(self.tree, id))
    }

    /// Handle to map child `key`. The child (and any missing ancestors on
    /// the path) is only created when the returned handle is written to.
    pub fn at(&mut self, key: &'a str) -> NodeMut<'_, 'a> {
        self.descend(Cow::Borrowed(key))
    }

    /// Like [`at`](Self::at) for a key that does not outlive the tree. A
    /// created node gets its own copy of the key in the arena.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_tree::{emit_json, Tree};
    ///
    /// let mut tree = Tree::new();
    /// for i in 0..2 {
    ///     let key = format!("item{}", i);
    ///     tree.root_mut().at_copied(&key).write(&i).unwrap();
    /// }
    /// assert_eq!(emit_json(&tree).unwrap(), r#"{"item0": 0,"item1": 1}"#);
    /// ```
    pub fn at_copied(&mut self, key: &str) -> NodeMut<'_, 'a> {
        self.descend(Cow::Owned(key.to_owned()))
    }

    fn descend(&mut self, key: Cow<'a, str>) -> NodeMut<'_, 'a> {
        let target = match &self.target {
            Target::Node(id) => match self.tree.find_child(*id, &key) {
                Some(child) => Target::Node(child),
                None => Target::Seed {
                    base: *id,
                    keys: vec![key],
                },
            },
            Target::Seed { base, keys } => {
                let mut keys = keys.clone();
                keys.push(key);
                Target::Seed { base: *base, keys }
            }
        };
        NodeMut {
            tree: &mut *self.tree,
            target,
        }
    }

    fn materialize(&mut self) -> Result<NodeId> {
        let (base, keys) = match &self.target {
            Target::Node(id) => return Ok(*id),
            Target::Seed { base, keys } => (*base, keys.clone()),
        };
        let mut id = base;
        for key in keys {
            id = match key {
                Cow::Borrowed(key) => self.tree.find_or_create_child(id, key)?,
                Cow::Owned(key) => self.tree.find_or_create_child_copied(id, &key)?,
            };
        }
        self.target = Target::Node(id);
        Ok(id)
    }

    fn kind(&self) -> NodeKind {
        self.id()
            .and_then(|id| self.tree.node_type(id).ok())
            .map_or(NodeKind::Unset, |ty| ty.kind)
    }

    /// Appends a new child to this map or sequence.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] unless the node is already a map or a sequence.
    pub fn append_child(&mut self) -> Result<NodeMut<'_, 'a>> {
        let kind = self.kind();
        if !kind.is_container() {
            return Err(Error::type_mismatch("map or sequence", kind.name()));
        }
        let parent = self.materialize()?;
        let child = self.tree.append_child(parent)?;
        Ok(NodeMut::existing(&mut *self.tree, child))
    }

    pub fn set_map(&mut self) -> Result<&mut Self> {
        let id = self.materialize()?;
        self.tree.set_kind(id, NodeKind::Map)?;
        Ok(self)
    }

    pub fn set_seq(&mut self) -> Result<&mut Self> {
        let id = self.materialize()?;
        self.tree.set_kind(id, NodeKind::Seq)?;
        Ok(self)
    }

    fn check_scalar(&self) -> Result<()> {
        let kind = self.kind();
        if kind.is_container() {
            return Err(Error::type_mismatch("scalar", kind.name()));
        }
        Ok(())
    }

    /// Sets the value to a view of caller memory. The text is not copied
    /// and is emitted unquoted, so it must be a valid JSON literal to appear
    /// bare in JSON output.
    pub fn set_val(&mut self, val: &'a str) -> Result<&mut Self> {
        self.check_scalar()?;
        let id = self.materialize()?;
        self.tree.set_val_text(id, crate::Text::Borrowed(val), false)?;
        Ok(self)
    }

    /// Like [`set_val`](Self::set_val), but marks the value as quoted.
    pub fn set_val_quoted(&mut self, val: &'a str) -> Result<&mut Self> {
        self.check_scalar()?;
        let id = self.materialize()?;
        self.tree.set_val_text(id, crate::Text::Borrowed(val), true)?;
        Ok(self)
    }

    /// Sets the key to a view of caller memory.
    pub fn set_key(&mut self, key: &'a str) -> Result<&mut Self> {
        let id = self.materialize()?;
        self.tree.set_key_text(id, crate::Text::Borrowed(key), false)?;
        Ok(self)
    }

    /// Renders `value` into the tree's arena and stores it as this node's
    /// value. Textual types are marked quoted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.root_mut().set_seq().unwrap();
    /// let mut root = tree.root_mut();
    /// root.append_child().unwrap().write(&44).unwrap();
    /// root.append_child().unwrap().write("child5").unwrap();
    /// assert_eq!(tree.as_json().to_string(), r#"[44,"child5"]"#);
    /// ```
    pub fn write<T: ToChars + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        self.check_scalar()?;
        let id = self.materialize()?;
        self.tree.write_val(id, value)?;
        Ok(self)
    }

    /// Renders `key` into the tree's arena and stores it as this node's key.
    pub fn write_key<T: ToChars + ?Sized>(&mut self, key: &T) -> Result<&mut Self> {
        let id = self.materialize()?;
        self.tree.write_key(id, key)?;
        Ok(self)
    }

    pub fn set_style(&mut self, style: Style) -> Result<&mut Self> {
        let id = self.materialize()?;
        self.tree.set_style(id, style)?;
        Ok(self)
    }

    /// Replaces the node's contents with the structural form of `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use indexmap::IndexMap;
    /// use yaml_tree::Tree;
    ///
    /// let mut m = IndexMap::new();
    /// m.insert("bar", 2);
    /// m.insert("foo", 1);
    ///
    /// let mut tree = Tree::new();
    /// tree.root_mut().serialize(&m).unwrap();
    /// assert_eq!(tree.as_json().to_string(), r#"{"bar": 2,"foo": 1}"#);
    /// ```
    pub fn serialize<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        let id = self.materialize()?;
        self.tree.reset(id)?;
        trace!("serialize: {} into node {}", std::any::type_name::<T>(), id.index());
        value.serialize(NodeSerializer::new(&mut *self.tree, id))?;
        Ok(self)
    }
}

impl fmt::Debug for NodeMut<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeMut")
            .field("target", &self.target)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_is_lazy() {
        let mut tree = Tree::new();
        {
            let handle = tree.at("nothing");
            assert!(handle.is_seed());
            assert!(handle.as_node_ref().is_none());
        }
        assert_eq!(tree.len(), 1);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_nested_seed_materializes_path() {
        let mut tree = Tree::new();
        tree.at("a").at("b").at("c").set_val("1").unwrap();
        let c = tree
            .get("a")
            .and_then(|a| a.get("b"))
            .and_then(|b| b.get("c"))
            .unwrap();
        assert_eq!(c.val(), Some("1"));
        assert!(tree.get("a").unwrap().is_map());
    }

    #[test]
    fn test_at_finds_existing_child() {
        let mut tree = Tree::new();
        tree.at("k").write(&1).unwrap();
        let handle = tree.at("k");
        assert!(!handle.is_seed());
        tree.at("k").write(&2).unwrap();
        assert_eq!(tree.root().num_children(), 1);
        assert_eq!(tree.get("k").unwrap().read::<i32>().unwrap(), 2);
    }

    #[test]
    fn test_append_child_requires_container() {
        let mut tree = Tree::new();
        assert!(matches!(
            tree.root_mut().append_child(),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(tree.at("seed").append_child().is_err());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_append_child_allows_duplicate_keys() {
        let mut tree = Tree::new();
        let mut root = tree.root_mut();
        root.set_map().unwrap();
        root.append_child().unwrap().set_key("k").unwrap().write(&1).unwrap();
        root.append_child().unwrap().set_key("k").unwrap().write(&2).unwrap();
        assert_eq!(tree.root().num_children(), 2);
        assert_eq!(tree.get("k").unwrap().read::<i32>().unwrap(), 1);
    }

    #[test]
    fn test_write_on_container_fails() {
        let mut tree = Tree::new();
        tree.root_mut().set_seq().unwrap();
        assert!(matches!(
            tree.root_mut().write(&1),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(tree.root_mut().set_val("x").is_err());
    }

    #[test]
    fn test_set_map_on_valued_scalar_fails() {
        let mut tree = Tree::new();
        tree.at("k").write(&1).unwrap();
        assert!(tree.at("k").set_seq().is_err());
        assert!(tree.at("k").at("inner").write(&2).is_err());
    }

    #[test]
    fn test_child_errors() {
        let mut tree = Tree::new();
        tree.at("k").write(&1).unwrap();
        let root = tree.root();
        assert!(matches!(root.child("x"), Err(Error::MissingKey(_))));
        let k = root.child("k").unwrap();
        assert!(matches!(k.child("x"), Err(Error::TypeMismatch { .. })));
        assert!(matches!(k.children(), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_read_failure_is_recoverable() {
        let mut tree = Tree::new();
        tree.at("k").set_val("(1,2").unwrap();
        let k = tree.get("k").unwrap();
        assert!(matches!(k.read::<i32>(), Err(Error::ParseFailure { .. })));
        assert_eq!(k.read::<String>().unwrap(), "(1,2");
    }

    #[test]
    fn test_handles_alias() {
        let mut tree = Tree::new();
        tree.at("k").write(&1).unwrap();
        let a = tree.get("k").unwrap();
        let b = tree.root().child_at(0).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.parent(), Some(tree.root()));
    }

    #[test]
    fn test_read_key() {
        let mut tree = Tree::new();
        tree.root_mut().set_map().unwrap();
        tree.root_mut()
            .append_child()
            .unwrap()
            .write_key(&66)
            .unwrap()
            .write(&7)
            .unwrap();
        let child = tree.root().child_at(0).unwrap();
        assert_eq!(child.read_key::<u32>().unwrap(), 66);
        assert!(!child.is_key_quoted());
        assert!(tree.root().read_key::<u32>().is_err());
    }

    #[test]
    fn test_read_optional_leaves_default() {
        let mut tree = Tree::new();
        tree.at("present").write(&5).unwrap();
        let mut present = 0;
        let mut absent = 9;
        assert!(tree.root().read_optional("present", &mut present).unwrap());
        assert!(!tree.root().read_optional("absent", &mut absent).unwrap());
        assert_eq!(present, 5);
        assert_eq!(absent, 9);
    }
}
