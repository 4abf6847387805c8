//! Flat, index-addressed node table.
//!
//! Nodes link to each other through [`NodeId`]s (parent, first/last child,
//! next sibling), never through references, so a node id stays valid no
//! matter how many nodes are appended elsewhere in the tree. The store is
//! append-only: nodes are never freed individually, only by clearing the
//! whole store.

use crate::arena::Text;
use crate::flags::{NodeKind, NodeType};
use crate::{Error, Result};
use log::trace;

/// Index of a node inside its tree's store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }
}

/// One slot in the store.
#[derive(Debug, Clone)]
pub(crate) struct NodeData<'a> {
    pub(crate) ty: NodeType,
    pub(crate) key: Option<Text<'a>>,
    pub(crate) val: Option<Text<'a>>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    pub(crate) num_children: usize,
}

impl<'a> NodeData<'a> {
    fn new(parent: Option<NodeId>) -> Self {
        NodeData {
            ty: NodeType::default(),
            key: None,
            val: None,
            parent,
            first_child: None,
            last_child: None,
            next_sibling: None,
            num_children: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeStore<'a> {
    nodes: Vec<NodeData<'a>>,
}

impl<'a> NodeStore<'a> {
    #[must_use]
    pub fn new() -> Self {
        NodeStore { nodes: Vec::new() }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        NodeStore {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Creates a parentless node. A tree creates exactly one of these.
    pub fn create_root(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(None));
        id
    }

    /// Appends a new, unset child at the end of `parent`'s children.
    ///
    /// Fails with [`Error::TypeMismatch`] unless `parent` is a map or a
    /// sequence.
    pub fn append_child(&mut self, parent: NodeId) -> Result<NodeId> {
        let kind = self.kind(parent)?;
        if !kind.is_container() {
            return Err(Error::type_mismatch("map or sequence", kind.name()));
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(Some(parent)));
        let last = {
            let p = &mut self.nodes[parent.0];
            let last = p.last_child.replace(id);
            if p.first_child.is_none() {
                p.first_child = Some(id);
            }
            p.num_children += 1;
            last
        };
        if let Some(prev) = last {
            self.nodes[prev.0].next_sibling = Some(id);
        }
        trace!("append_child: parent={} child={}", parent.0, id.0);
        Ok(id)
    }

    /// Iterates the children of `parent` in insertion order.
    ///
    /// An unset node has no children yet and yields nothing; a scalar is a
    /// [`Error::TypeMismatch`].
    pub fn children(&self, parent: NodeId) -> Result<ChildIds<'_, 'a>> {
        let data = self.data(parent)?;
        if data.ty.kind == NodeKind::Scalar {
            return Err(Error::type_mismatch("map or sequence", "scalar"));
        }
        Ok(ChildIds {
            store: self,
            next: data.first_child,
        })
    }

    /// Unlinks every child of `parent`. The detached slots stay in the store
    /// but are no longer reachable from the tree.
    pub fn detach_children(&mut self, parent: NodeId) -> Result<()> {
        let data = self.data_mut(parent)?;
        data.first_child = None;
        data.last_child = None;
        data.num_children = 0;
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn kind(&self, id: NodeId) -> Result<NodeKind> {
        Ok(self.data(id)?.ty.kind)
    }

    pub(crate) fn data(&self, id: NodeId) -> Result<&NodeData<'a>> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| Error::invalid_tree(&format!("no node with index {}", id.0)))
    }

    pub(crate) fn data_mut(&mut self, id: NodeId) -> Result<&mut NodeData<'a>> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| Error::invalid_tree(&format!("no node with index {}", id.0)))
    }

    pub(crate) fn into_nodes(self) -> Vec<NodeData<'a>> {
        self.nodes
    }

    pub(crate) fn from_nodes(nodes: Vec<NodeData<'a>>) -> Self {
        NodeStore { nodes }
    }
}

/// Lazy, restartable iterator over child ids. Cloning it restarts from the
/// same position.
#[derive(Debug, Clone)]
pub struct ChildIds<'s, 'a> {
    store: &'s NodeStore<'a>,
    next: Option<NodeId>,
}

impl Iterator for ChildIds<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.store.nodes.get(current.0).and_then(|n| n.next_sibling);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq_store() -> (NodeStore<'static>, NodeId) {
        let mut store = NodeStore::new();
        let root = store.create_root();
        store.data_mut(root).unwrap().ty = NodeType::seq();
        (store, root)
    }

    #[test]
    fn test_children_in_insertion_order() {
        let (mut store, root) = seq_store();
        let a = store.append_child(root).unwrap();
        let b = store.append_child(root).unwrap();
        let c = store.append_child(root).unwrap();
        let ids: Vec<_> = store.children(root).unwrap().collect();
        assert_eq!(ids, vec![a, b, c]);
        assert_eq!(store.data(root).unwrap().num_children, 3);
        assert_eq!(store.data(b).unwrap().parent, Some(root));
    }

    #[test]
    fn test_children_iterator_restarts() {
        let (mut store, root) = seq_store();
        store.append_child(root).unwrap();
        store.append_child(root).unwrap();
        let iter = store.children(root).unwrap();
        assert_eq!(iter.clone().count(), 2);
        assert_eq!(iter.count(), 2);
    }

    #[test]
    fn test_ids_stable_across_growth() {
        let (mut store, root) = seq_store();
        let first = store.append_child(root).unwrap();
        for _ in 0..1000 {
            store.append_child(root).unwrap();
        }
        assert_eq!(store.children(root).unwrap().next(), Some(first));
        assert_eq!(store.len(), 1002);
    }

    #[test]
    fn test_append_to_scalar_or_unset_fails() {
        let mut store = NodeStore::new();
        let root = store.create_root();
        assert!(matches!(
            store.append_child(root),
            Err(Error::TypeMismatch { .. })
        ));
        store.data_mut(root).unwrap().ty = NodeType::scalar();
        assert!(matches!(
            store.append_child(root),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(store.children(root), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_detach_children() {
        let (mut store, root) = seq_store();
        store.append_child(root).unwrap();
        store.detach_children(root).unwrap();
        assert_eq!(store.children(root).unwrap().count(), 0);
        let fresh = store.append_child(root).unwrap();
        assert_eq!(store.children(root).unwrap().collect::<Vec<_>>(), vec![fresh]);
    }

    #[test]
    fn test_unknown_id_is_invalid_tree() {
        let store = NodeStore::new();
        assert!(matches!(store.kind(NodeId(3)), Err(Error::InvalidTree(_))));
    }
}
