//! In-order key iteration.

use ternvis_types::{Key, NodeId};

use super::node::Arena;

/// Ascending walk over the keys of a tree.
///
/// Only leaf keys are yielded; internal keys are routing copies of leaf
/// maxima and would double-count.
pub struct KeysIter<'a> {
    arena: &'a Arena,
    stack: Vec<NodeId>,
    leaf: Option<(NodeId, usize)>,
}

impl<'a> KeysIter<'a> {
    pub(crate) fn new(arena: &'a Arena, root: Option<NodeId>) -> Self {
        KeysIter {
            arena,
            stack: root.into_iter().collect(),
            leaf: None,
        }
    }
}

impl Iterator for KeysIter<'_> {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        loop {
            if let Some((leaf, index)) = self.leaf {
                let node = self.arena.node(leaf);
                if index < node.keys.len() {
                    self.leaf = Some((leaf, index + 1));
                    return Some(node.keys[index]);
                }
                self.leaf = None;
            }
            let next = self.stack.pop()?;
            let node = self.arena.node(next);
            if node.is_leaf() {
                self.leaf = Some((next, 0));
            } else {
                self.stack.extend(node.children.iter().rev().copied());
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::test_utils::tree_with_keys;
    use crate::TwoThreeTree;

    #[test]
    fn empty_tree_yields_nothing() {
        let tree = TwoThreeTree::new();
        assert_eq!(tree.keys().next(), None);
    }

    #[test]
    fn single_leaf_yields_its_keys() {
        let tree = tree_with_keys([2, 1]);
        assert_eq!(tree.keys().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn deep_tree_yields_leaf_keys_once_each() {
        let tree = tree_with_keys((0..50).rev());
        assert_eq!(tree.keys().collect::<Vec<_>>(), (0..50).collect::<Vec<_>>());
    }
}
