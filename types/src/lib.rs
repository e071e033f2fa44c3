//! Common type definitions for data exchange over the ternvis tree action
//! protocol.
//!
//! The engine reports every structural event it performs as a [`TreeAction`],
//! grouped into batches that consumers fold into their own replica of the
//! tree. Nodes are referred to by [`NodeId`], an opaque identity that stays
//! stable for the node's whole lifetime and is never reused within a run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key stored in the tree. Only ordering and equality are ever used.
pub type Key = i64;

/// Opaque stable identity of a tree node.
///
/// Receivers must treat it as a map key only; there is nothing to
/// dereference on their side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Wraps a raw id. Minting fresh ids is the engine's job; everyone else
    /// only ever copies ids they received.
    pub const fn new(id: u64) -> Self {
        NodeId(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Snapshot of a node's content at the instant an action was emitted.
///
/// Parents are deliberately absent; a receiver that needs them can rebuild
/// them from the child lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub keys: Vec<Key>,
    pub children: Vec<NodeId>,
}

/// A single structural event.
///
/// `StartQuery`/`EndQuery` bracket every user-facing operation and always
/// travel alone in their batch; the remaining variants only appear in
/// mid-query batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeAction {
    /// Opens a query.
    StartQuery,
    /// Closes a query.
    EndQuery,
    /// The engine traversed into this node.
    Visit(NodeId),
    /// A new node appeared with the given content. Its children must have
    /// been established by earlier actions.
    Create { node: NodeId, info: NodeInfo },
    /// The node no longer exists; its id never appears again.
    Delete(NodeId),
    /// The node's keys and children were replaced by the payload.
    Change { node: NodeId, info: NodeInfo },
    /// The named node is now the root; `None` means the tree is empty.
    MakeRoot(Option<NodeId>),
}

impl TreeAction {
    /// Whether this action is one of the query brackets.
    pub fn is_bracket(&self) -> bool {
        matches!(self, TreeAction::StartQuery | TreeAction::EndQuery)
    }
}

/// A non-empty ordered sequence of actions emitted atomically. Consumers
/// fold a batch as a whole; observing state between two actions of the same
/// batch is out of contract.
pub type ActionsBatch = Vec<TreeAction>;
