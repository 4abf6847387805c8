//! The document tree: a node store plus the string arena its synthesized
//! text lives in.
//!
//! ## Examples
//!
//! ```rust
//! use yaml_tree::{emit_json, Tree};
//!
//! let mut tree = Tree::new();
//! let mut root = tree.root_mut();
//! root.set_map().unwrap();
//! root.at("foo").set_val("1").unwrap();
//! let mut seq = root.at("seq");
//! seq.set_seq().unwrap();
//! seq.append_child().unwrap().set_val("bar0").unwrap();
//! seq.append_child().unwrap().write(&33).unwrap();
//!
//! assert_eq!(emit_json(&tree).unwrap(), r#"{"foo": 1,"seq": ["bar0",33]}"#);
//! ```

use std::borrow::Cow;

use crate::arena::{StringArena, Text};
use crate::emit::json::AsJson;
use crate::flags::{NodeKind, NodeType, Style};
use crate::node::{NodeMut, NodeRef};
use crate::scalar::ToChars;
use crate::store::{ChildIds, NodeData, NodeId, NodeStore};
use crate::{Error, Result};
use log::{debug, trace};

/// An in-memory YAML/JSON document.
///
/// `'a` is the lifetime of caller memory the tree may borrow text from (see
/// [`NodeMut::set_val`]). Text written through [`NodeMut::write`] or the serde
/// bridge is copied into the tree's own arena and carries no such
/// restriction; [`Tree::into_owned`] copies everything and drops the borrow.
#[derive(Debug, Clone)]
pub struct Tree<'a> {
    store: NodeStore<'a>,
    arena: StringArena,
    root: NodeId,
}

impl Default for Tree<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Tree<'a> {
    /// Creates a tree holding a single, unset root node.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(16, 0)
    }

    /// Creates a tree with room for `nodes` nodes and `arena` bytes of text.
    #[must_use]
    pub fn with_capacity(nodes: usize, arena: usize) -> Self {
        let mut store = NodeStore::with_capacity(nodes.max(1));
        let root = store.create_root();
        Tree {
            store,
            arena: StringArena::with_capacity(arena),
            root,
        }
    }

    #[inline]
    #[must_use]
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn root(&self) -> NodeRef<'_, 'a> {
        NodeRef::new(self, self.root)
    }

    pub fn root_mut(&mut self) -> NodeMut<'_, 'a> {
        let root = self.root;
        NodeMut::existing(self, root)
    }

    /// Looks up `key` in the root map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<NodeRef<'_, 'a>> {
        self.root().get(key)
    }

    /// Handle to the root map's child `key`; see [`NodeMut::at`].
    pub fn at(&mut self, key: &'a str) -> NodeMut<'_, 'a> {
        let root = self.root;
        NodeMut::lookup(self, root, Cow::Borrowed(key))
    }

    /// Like [`at`](Self::at) for a key that does not outlive the tree, such
    /// as one built with `format!`. See [`NodeMut::at_copied`].
    pub fn at_copied(&mut self, key: &str) -> NodeMut<'_, 'a> {
        let root = self.root;
        NodeMut::lookup(self, root, Cow::Owned(key.to_owned()))
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, 'a>> {
        self.store.contains(id).then(|| NodeRef::new(self, id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<NodeMut<'_, 'a>> {
        if self.store.contains(id) {
            Some(NodeMut::existing(self, id))
        } else {
            None
        }
    }

    /// Number of node slots in the store, including detached ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True when the root has been neither written to nor typed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.data(self.root).is_ok_and(|root| {
            root.ty.kind == NodeKind::Unset && root.val.is_none() && root.num_children == 0
        })
    }

    /// Drops every node and all arena text, leaving a fresh unset root.
    pub fn clear(&mut self) {
        self.store.clear();
        self.arena.clear();
        self.root = self.store.create_root();
    }

    #[must_use]
    pub fn arena(&self) -> &StringArena {
        &self.arena
    }

    pub fn reserve_arena(&mut self, additional: usize) {
        self.arena.reserve(additional);
    }

    #[must_use]
    pub fn store(&self) -> &NodeStore<'a> {
        &self.store
    }

    /// Resolves a text view against this tree's arena.
    #[must_use]
    pub fn resolve(&self, text: Text<'a>) -> &str {
        match text {
            Text::Borrowed(s) => s,
            Text::Arena(span) => self.arena.get(span),
        }
    }

    /// Copies `s` into the arena and returns its view.
    pub fn copy_to_arena(&mut self, s: &str) -> Text<'a> {
        Text::Arena(self.arena.push_str(s))
    }

    /// Renders `value` into the arena and returns its view.
    pub fn format<T: ToChars + ?Sized>(&mut self, value: &T) -> Text<'a> {
        Text::Arena(self.arena.format(value))
    }

    /// Appends an unset child to a map or sequence node.
    pub fn append_child(&mut self, parent: NodeId) -> Result<NodeId> {
        self.store.append_child(parent)
    }

    /// Iterates child ids of `parent` in insertion order.
    pub fn children(&self, parent: NodeId) -> Result<ChildIds<'_, 'a>> {
        self.store.children(parent)
    }

    /// Finds the first child of map `parent` whose key equals `key`.
    ///
    /// Non-map nodes have no keyed children and yield `None`.
    #[must_use]
    pub fn find_child(&self, parent: NodeId, key: &str) -> Option<NodeId> {
        if self.store.kind(parent).ok()? != NodeKind::Map {
            return None;
        }
        self.store.children(parent).ok()?.find(|&child| {
            self.store
                .data(child)
                .ok()
                .and_then(|d| d.key)
                .is_some_and(|k| self.resolve(k) == key)
        })
    }

    /// Returns the child of `parent` keyed `key`, creating it (at the end,
    /// preserving insertion order) when absent. An unset `parent` becomes a
    /// map.
    pub fn find_or_create_child(&mut self, parent: NodeId, key: &'a str) -> Result<NodeId> {
        self.find_or_insert(parent, key, |_| Text::Borrowed(key))
    }

    /// Like [`find_or_create_child`](Self::find_or_create_child), for keys
    /// that do not live as long as the tree. The key is copied into the arena
    /// only when the child has to be created.
    pub fn find_or_create_child_copied(&mut self, parent: NodeId, key: &str) -> Result<NodeId> {
        self.find_or_insert(parent, key, |tree| tree.copy_to_arena(key))
    }

    fn find_or_insert<F>(&mut self, parent: NodeId, key: &str, make_key: F) -> Result<NodeId>
    where
        F: FnOnce(&mut Self) -> Text<'a>,
    {
        match self.store.kind(parent)? {
            NodeKind::Map => {}
            NodeKind::Unset => self.set_kind(parent, NodeKind::Map)?,
            other => return Err(Error::type_mismatch("map", other.name())),
        }
        if let Some(found) = self.find_child(parent, key) {
            return Ok(found);
        }
        let text = make_key(self);
        let child = self.store.append_child(parent)?;
        self.store.data_mut(child)?.key = Some(text);
        trace!("find_or_create_child: created {:?} under {}", key, parent.index());
        Ok(child)
    }

    pub(crate) fn data(&self, id: NodeId) -> Result<&NodeData<'a>> {
        self.store.data(id)
    }

    pub fn node_type(&self, id: NodeId) -> Result<NodeType> {
        Ok(self.store.data(id)?.ty)
    }

    pub fn key(&self, id: NodeId) -> Result<Option<&str>> {
        Ok(self.store.data(id)?.key.map(|k| self.resolve(k)))
    }

    pub fn val(&self, id: NodeId) -> Result<Option<&str>> {
        Ok(self.store.data(id)?.val.map(|v| self.resolve(v)))
    }

    /// Changes the container kind of a node.
    ///
    /// Unset nodes, empty containers and value-less scalars may take any
    /// kind; anything else is a [`Error::TypeMismatch`].
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) -> Result<()> {
        let data = self.store.data_mut(id)?;
        let current = data.ty.kind;
        if current == kind {
            return Ok(());
        }
        let allowed = match current {
            NodeKind::Unset => true,
            NodeKind::Map | NodeKind::Seq => data.num_children == 0,
            NodeKind::Scalar => data.val.is_none(),
        };
        if !allowed {
            return Err(Error::type_mismatch(kind.name(), current.name()));
        }
        data.ty.kind = kind;
        if kind.is_container() {
            data.val = None;
            data.ty.val_quoted = false;
        }
        Ok(())
    }

    pub fn set_style(&mut self, id: NodeId, style: Style) -> Result<()> {
        self.store.data_mut(id)?.ty.style = style;
        Ok(())
    }

    /// Sets a scalar value. Containers refuse with [`Error::TypeMismatch`].
    pub fn set_val_text(&mut self, id: NodeId, val: Text<'a>, quoted: bool) -> Result<()> {
        let data = self.store.data_mut(id)?;
        if data.ty.kind.is_container() {
            return Err(Error::type_mismatch("scalar", data.ty.kind.name()));
        }
        data.ty.kind = NodeKind::Scalar;
        data.ty.val_quoted = quoted;
        data.val = Some(val);
        Ok(())
    }

    /// Sets the key of a map child. Only children of map nodes carry keys.
    pub fn set_key_text(&mut self, id: NodeId, key: Text<'a>, quoted: bool) -> Result<()> {
        let parent = self
            .store
            .data(id)?
            .parent
            .ok_or_else(|| Error::type_mismatch("map child", "root"))?;
        let parent_kind = self.store.kind(parent)?;
        if parent_kind != NodeKind::Map {
            return Err(Error::type_mismatch("map", parent_kind.name()));
        }
        let data = self.store.data_mut(id)?;
        data.key = Some(key);
        data.ty.key_quoted = quoted;
        Ok(())
    }

    /// Renders `value` into the arena and stores it as the node's value,
    /// with VALQUO set for textual types.
    pub fn write_val<T: ToChars + ?Sized>(&mut self, id: NodeId, value: &T) -> Result<()> {
        let kind = self.store.kind(id)?;
        if kind.is_container() {
            return Err(Error::type_mismatch("scalar", kind.name()));
        }
        let text = self.format(value);
        self.set_val_text(id, text, T::QUOTED)
    }

    /// Renders `key` into the arena and stores it as the node's key, with
    /// KEYQUO set for textual types.
    pub fn write_key<T: ToChars + ?Sized>(&mut self, id: NodeId, key: &T) -> Result<()> {
        let text = self.format(key);
        self.set_key_text(id, text, T::QUOTED)
    }

    /// Returns a node to the unset state, detaching its children. The key is
    /// kept.
    pub(crate) fn reset(&mut self, id: NodeId) -> Result<()> {
        self.store.detach_children(id)?;
        let data = self.store.data_mut(id)?;
        data.val = None;
        data.ty = NodeType::default().with_key_quoted(data.ty.key_quoted);
        Ok(())
    }

    /// Copies every borrowed view into the arena, releasing the borrow on
    /// caller memory.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_tree::{emit_json, Tree};
    ///
    /// let owned = {
    ///     let text = String::from("scoped");
    ///     let mut tree = Tree::new();
    ///     tree.at("k").set_val(&text).unwrap();
    ///     tree.into_owned()
    /// };
    /// assert_eq!(emit_json(&owned).unwrap(), r#"{"k": "scoped"}"#);
    /// ```
    #[must_use]
    pub fn into_owned(self) -> Tree<'static> {
        let Tree {
            store,
            mut arena,
            root,
        } = self;
        let mut moved = 0usize;
        let mut own = |text: Option<Text<'a>>| -> Option<Text<'static>> {
            text.map(|t| match t {
                Text::Borrowed(s) => {
                    moved += 1;
                    Text::Arena(arena.push_str(s))
                }
                Text::Arena(span) => Text::Arena(span),
            })
        };
        let nodes: Vec<NodeData<'static>> = store
            .into_nodes()
            .into_iter()
            .map(|n| NodeData {
                ty: n.ty,
                key: own(n.key),
                val: own(n.val),
                parent: n.parent,
                first_child: n.first_child,
                last_child: n.last_child,
                next_sibling: n.next_sibling,
                num_children: n.num_children,
            })
            .collect();
        debug!("into_owned: copied {} borrowed views into the arena", moved);
        Tree {
            store: NodeStore::from_nodes(nodes),
            arena,
            root,
        }
    }

    /// Displays the tree as compact JSON.
    ///
    /// Formatting never fails or panics: the depth limit is lifted and an
    /// unemittable tree is shown as a JSON string holding the error. Use
    /// [`emit_json`](crate::emit_json) to get the [`Error`] instead.
    #[must_use]
    pub fn as_json(&self) -> AsJson<'_, 'a> {
        AsJson { tree: self }
    }

    /// Number of arena bytes held by this tree.
    #[must_use]
    pub fn arena_len(&self) -> usize {
        self.arena.len()
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut NodeStore<'a> {
        &mut self.store
    }
}
