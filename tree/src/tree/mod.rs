// MIT LICENSE
//
// Copyright (c) 2023 Dash Core Group
//
// Permission is hereby granted, free of charge, to any
// person obtaining a copy of this software and associated
// documentation files (the "Software"), to deal in the
// Software without restriction, including without
// limitation the rights to use, copy, modify, merge,
// publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software
// is furnished to do so, subject to the following
// conditions:
//
// The above copyright notice and this permission notice
// shall be included in all copies or substantial portions
// of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF
// ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED
// TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT
// SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY
// CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR
// IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

//! 2-3 trees

mod erase;
mod insert;
mod iter;
pub(crate) mod node;
mod validate;


pub use iter::KeysIter;
use ternvis_observer::{Observable, Observer};
use ternvis_types::{ActionsBatch, Key, NodeId, TreeAction};

use self::node::Arena;

/// A 2-3 search tree over [`Key`]s.
///
/// Every node carries 2 or 3 keys (the root may carry a single one), every
/// internal node has one child per key, each key is the maximum of the
/// corresponding child's subtree, and all leaves sit at the same depth. The
/// key set itself lives in the leaves; internal keys are routing copies.
///
/// Each query is reported to subscribers as `StartQuery`, any number of
/// mid-query action batches, then `EndQuery`, whatever the outcome. A batch
/// is atomic: the tree is only guaranteed consistent on batch boundaries.
pub struct TwoThreeTree {
    arena: Arena,
    root: Option<NodeId>,
    port: Observable<ActionsBatch>,
}

impl Default for TwoThreeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TwoThreeTree {
    pub fn new() -> Self {
        TwoThreeTree {
            arena: Arena::default(),
            root: None,
            port: Observable::new(),
        }
    }

    /// Searches for `key` and reports whether it is present.
    pub fn contains(&self, key: Key) -> bool {
        self.emit([TreeAction::StartQuery]);
        let found = self
            .leaf_for(key)
            .is_some_and(|leaf| self.arena.node(leaf).keys.contains(&key));
        self.emit([TreeAction::EndQuery]);
        found
    }

    /// Attaches `observer` to the action stream. It immediately receives a
    /// snapshot batch rebuilding the current tree, then every batch emitted
    /// from here on, until either side is dropped or it unsubscribes.
    pub fn subscribe(&self, observer: &Observer<ActionsBatch>) {
        self.port.subscribe(observer, self.snapshot_batch());
    }

    /// Number of keys stored.
    pub fn len(&self) -> usize {
        self.keys().count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Walks the stored keys in ascending order.
    pub fn keys(&self) -> KeysIter<'_> {
        KeysIter::new(&self.arena, self.root)
    }

    /// Descends from the root to the leaf holding the first key `>= key`,
    /// announcing every node on the way. Empty tree yields `None`; if all
    /// keys are smaller the rightmost leaf is returned.
    pub(crate) fn leaf_for(&self, key: Key) -> Option<NodeId> {
        let mut current = self.root?;
        self.emit([TreeAction::Visit(current)]);
        loop {
            let node = self.arena.node(current);
            if node.is_leaf() {
                return Some(current);
            }
            let child_index = node
                .keys
                .iter()
                .position(|routing| key <= *routing)
                .unwrap_or(node.keys.len() - 1);
            current = node.children[child_index];
            self.emit([TreeAction::Visit(current)]);
        }
    }

    pub(crate) fn emit(&self, batch: impl Into<ActionsBatch>) {
        let batch = batch.into();
        debug_assert!(!batch.is_empty(), "tried to emit an empty action batch");
        self.port.notify(&batch);
    }

    pub(crate) fn emit_change(&self, id: NodeId) {
        self.emit([TreeAction::Change {
            node: id,
            info: self.arena.node(id).info(),
        }]);
    }

    /// One batch that rebuilds the current tree on a blank consumer:
    /// children are created before their parents, the root announcement
    /// comes last.
    fn snapshot_batch(&self) -> ActionsBatch {
        let mut batch = ActionsBatch::new();
        if let Some(root) = self.root {
            self.push_subtree_creates(root, &mut batch);
        }
        batch.push(TreeAction::MakeRoot(self.root));
        batch
    }

    fn push_subtree_creates(&self, id: NodeId, batch: &mut ActionsBatch) {
        let node = self.arena.node(id);
        for child in &node.children {
            self.push_subtree_creates(*child, batch);
        }
        batch.push(TreeAction::Create {
            node: id,
            info: node.info(),
        });
    }

    pub(crate) fn arena(&self) -> &Arena {
        &self.arena
    }

    pub(crate) fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[cfg(test)]
    pub(crate) fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;
    use ternvis_types::TreeAction;

    use crate::test_utils::{tree_with_keys, RecordingPort};
    use crate::TwoThreeTree;

    #[test]
    fn empty_tree_answers_queries() {
        let mut tree = TwoThreeTree::new();
        assert!(!tree.contains(7));
        assert!(!tree.erase(7));
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn inserts_and_erases() {
        let mut tree = TwoThreeTree::new();
        tree.insert(5);
        tree.insert(2);
        tree.insert(7);
        tree.insert(-221);
        tree.insert(122334);
        assert!(tree.contains(5));
        assert!(!tree.contains(1));
        tree.erase(5);
        assert!(!tree.contains(5));
        assert!(tree.contains(-221));
    }

    #[test]
    fn keys_walk_in_ascending_order() {
        let tree = tree_with_keys([9, 1, 5, 3, 7, 2, 8, 4, 6]);
        let keys: Vec<_> = tree.keys().collect();
        assert_eq!(keys, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(tree.len(), 9);
    }

    #[test]
    fn every_query_is_bracketed() {
        let mut tree = TwoThreeTree::new();
        let port = RecordingPort::new();
        tree.subscribe(port.observer());

        tree.insert(1);
        tree.contains(1);
        tree.erase(1);
        tree.contains(1);

        let batches = port.batches();
        // Skip the subscription snapshot; everything after must be four
        // well-framed queries in submission order.
        let mut queries = 0;
        let mut inside = false;
        for batch in &batches[1..] {
            match batch.first() {
                Some(TreeAction::StartQuery) => {
                    assert_eq!(batch.len(), 1);
                    assert!(!inside, "StartQuery while a query is open");
                    inside = true;
                }
                Some(TreeAction::EndQuery) => {
                    assert_eq!(batch.len(), 1);
                    assert!(inside, "EndQuery without an open query");
                    inside = false;
                    queries += 1;
                }
                _ => {
                    assert!(inside, "mid-query batch outside brackets");
                    assert!(batch
                        .iter()
                        .all(|action| !action.is_bracket()));
                }
            }
        }
        assert!(!inside);
        assert_eq!(queries, 4);
    }

    #[test]
    fn contains_emits_only_visits_between_brackets() {
        let tree = tree_with_keys(0..10);
        let port = RecordingPort::new();
        tree.subscribe(port.observer());

        tree.contains(5);

        let batches = port.batches();
        for batch in &batches[2..batches.len() - 1] {
            assert_eq!(batch.len(), 1);
            assert_matches!(batch[0], TreeAction::Visit(_));
        }
    }

    #[test]
    fn snapshot_rebuilds_children_before_parents() {
        let tree = tree_with_keys(0..10);
        let port = RecordingPort::new();
        tree.subscribe(port.observer());

        let batches = port.batches();
        let snapshot = &batches[0];
        let mut seen = std::collections::HashSet::new();
        for action in snapshot {
            match action {
                TreeAction::Create { node, info } => {
                    for child in &info.children {
                        assert!(seen.contains(child), "child created after its parent");
                    }
                    seen.insert(*node);
                }
                TreeAction::MakeRoot(Some(root)) => assert!(seen.contains(root)),
                other => panic!("unexpected action in snapshot: {other:?}"),
            }
        }
    }

    #[test]
    fn snapshot_of_empty_tree_is_a_bare_root_announcement() {
        let tree = TwoThreeTree::new();
        let port = RecordingPort::new();
        tree.subscribe(port.observer());

        assert_eq!(port.batches(), vec![vec![TreeAction::MakeRoot(None)]]);
    }
}
