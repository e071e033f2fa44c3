//! Structural law checking.

use ternvis_types::{Key, NodeId};

use super::TwoThreeTree;
use crate::error::InvariantError;

impl TwoThreeTree {
    /// Checks every structural law the tree promises on query boundaries:
    /// node key counts, matching child counts, parent back-links, routing
    /// keys equal to subtree maxima, uniform leaf depth, strictly ascending
    /// in-order keys, and an arena free of leaked nodes.
    ///
    /// Mutating operations `debug_assert` this before closing their query;
    /// a violation there is a bug in the engine, not a recoverable state.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let Some(root) = self.root() else {
            return if self.arena().is_empty() {
                Ok(())
            } else {
                Err(InvariantError::Arena("empty tree keeps allocated nodes"))
            };
        };
        let root_node = self
            .arena()
            .get(root)
            .ok_or(InvariantError::Arena("root id is not allocated"))?;
        if root_node.parent.is_some() {
            return Err(InvariantError::ParentLink("root has a parent"));
        }
        let mut walk = Walk {
            tree: self,
            visited: 0,
            previous_key: None,
        };
        walk.check_node(root, true)?;
        if walk.visited != self.arena().len() {
            return Err(InvariantError::Arena("unreachable nodes left allocated"));
        }
        Ok(())
    }
}

struct Walk<'a> {
    tree: &'a TwoThreeTree,
    visited: usize,
    previous_key: Option<Key>,
}

impl Walk<'_> {
    /// Returns the subtree's height and maximum key.
    fn check_node(&mut self, id: NodeId, is_root: bool) -> Result<(usize, Key), InvariantError> {
        let node = self
            .tree
            .arena()
            .get(id)
            .ok_or(InvariantError::Arena("node id is not allocated"))?;
        self.visited += 1;

        let allowed = if is_root { 1..=3 } else { 2..=3 };
        if !allowed.contains(&node.keys.len()) {
            return Err(InvariantError::KeyCount("node key count out of range"));
        }
        if !node.keys.windows(2).all(|pair| pair[0] < pair[1]) {
            return Err(InvariantError::KeyOrdering(
                "keys within a node are not ascending",
            ));
        }

        if node.is_leaf() {
            for key in &node.keys {
                if self.previous_key.is_some_and(|previous| previous >= *key) {
                    return Err(InvariantError::KeyOrdering(
                        "in-order key walk is not strictly ascending",
                    ));
                }
                self.previous_key = Some(*key);
            }
            return Ok((1, node.last_key()));
        }

        if node.children.len() != node.keys.len() {
            return Err(InvariantError::ChildCount(
                "internal node child count differs from key count",
            ));
        }
        let mut height = None;
        for (slot, child) in node.children.iter().enumerate() {
            let child_node = self
                .tree
                .arena()
                .get(*child)
                .ok_or(InvariantError::Arena("child id is not allocated"))?;
            if child_node.parent != Some(id) {
                return Err(InvariantError::ParentLink(
                    "child does not point back at its parent",
                ));
            }
            let (child_height, child_max) = self.check_node(*child, false)?;
            if *height.get_or_insert(child_height) != child_height {
                return Err(InvariantError::LeafDepth("leaves sit at different depths"));
            }
            if node.keys[slot] != child_max {
                return Err(InvariantError::SubtreeMaximum(
                    "routing key differs from the child's subtree maximum",
                ));
            }
        }
        let height = height.expect("internal nodes keep at least two children");
        Ok((height + 1, node.last_key()))
    }
}
