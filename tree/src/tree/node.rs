//! Node arena.
//!
//! Nodes live in an id-keyed arena; tree edges are ids in both directions
//! (owning downward `children`, non-owning upward `parent`). The id doubles
//! as the node's identity on the action stream: it is minted once, never
//! reused within a run, and dies with the node.

use indexmap::IndexMap;
use ternvis_types::{Key, NodeId, NodeInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) keys: Vec<Key>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn leaf(keys: Vec<Key>) -> Self {
        Node {
            keys,
            children: Vec::new(),
            parent: None,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn last_key(&self) -> Key {
        *self
            .keys
            .last()
            .expect("live nodes always hold at least one key")
    }

    /// Snapshot for the action stream.
    pub(crate) fn info(&self) -> NodeInfo {
        NodeInfo {
            keys: self.keys.clone(),
            children: self.children.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Arena {
    nodes: IndexMap<NodeId, Node>,
    last_id: u64,
}

impl Arena {
    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        self.last_id += 1;
        let id = NodeId::new(self.last_id);
        self.nodes.insert(id, node);
        id
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.nodes.get(&id).expect("node id is live")
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes.get_mut(&id).expect("node id is live")
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub(crate) fn remove(&mut self, id: NodeId) -> Node {
        self.nodes
            .swap_remove(&id)
            .expect("removed node id is live")
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
