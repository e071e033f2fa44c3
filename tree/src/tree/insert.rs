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

//! Insertion, routing-key refresh and the split cascade.

use ternvis_types::{Key, NodeId, TreeAction};

use super::node::Node;
use super::TwoThreeTree;

impl TwoThreeTree {
    /// Inserts `key` unless it is already present. Returns `true` iff the
    /// key was newly added.
    pub fn insert(&mut self, key: Key) -> bool {
        self.emit([TreeAction::StartQuery]);
        let inserted = self.insert_impl(key);
        debug_assert_eq!(self.validate(), Ok(()), "invalid 2-3 tree after insert");
        self.emit([TreeAction::EndQuery]);
        inserted
    }

    fn insert_impl(&mut self, key: Key) -> bool {
        if self.root.is_none() {
            let id = self.arena.alloc(Node::leaf(vec![key]));
            self.root = Some(id);
            self.emit([
                TreeAction::Create {
                    node: id,
                    info: self.arena.node(id).info(),
                },
                TreeAction::MakeRoot(Some(id)),
            ]);
            return true;
        }
        let leaf = self
            .leaf_for(key)
            .expect("descent in a non-empty tree reaches a leaf");
        let node = self.arena.node_mut(leaf);
        debug_assert!(node.is_leaf(), "descent stopped on an internal node");
        if node.keys.contains(&key) {
            return false;
        }
        let position = node
            .keys
            .iter()
            .position(|present| key < *present)
            .unwrap_or(node.keys.len());
        node.keys.insert(position, key);
        self.emit_change(leaf);
        self.update_ancestor_keys(leaf);
        self.split_overfull(leaf);
        true
    }

    /// Walks from `start`'s parent to the root rewriting every routing key
    /// from the owning child's maximum, announcing each rewrite. Cheap
    /// because each child's maximum is just its own last key.
    pub(crate) fn update_ancestor_keys(&mut self, start: NodeId) {
        let mut current = start;
        while let Some(parent) = self.arena.node(current).parent {
            let maxes: Vec<Key> = self
                .arena
                .node(parent)
                .children
                .iter()
                .map(|child| self.arena.node(*child).last_key())
                .collect();
            self.arena.node_mut(parent).keys = maxes;
            self.emit_change(parent);
            current = parent;
        }
    }

    /// Splits `start` in two if it accumulated four keys and repeats on its
    /// parent, which gains a key per split, until the cascade dies out or a
    /// fresh root is made.
    pub(crate) fn split_overfull(&mut self, start: NodeId) {
        let mut current = start;
        while self.arena.node(current).keys.len() > 3 {
            debug_assert_eq!(
                self.arena.node(current).keys.len(),
                4,
                "node grew beyond one key over capacity"
            );
            self.emit([TreeAction::Visit(current)]);

            let node = self.arena.node(current);
            let keys = node.keys.clone();
            let children = node.children.clone();
            let parent = node.parent;
            debug_assert!(
                children.is_empty() || children.len() == 4,
                "child count does not match key count when splitting"
            );

            let left = self.arena.alloc(Node {
                keys: keys[..2].to_vec(),
                children: children.get(..2).map(<[NodeId]>::to_vec).unwrap_or_default(),
                parent: None,
            });
            let right = self.arena.alloc(Node {
                keys: keys[2..].to_vec(),
                children: children.get(2..).map(<[NodeId]>::to_vec).unwrap_or_default(),
                parent: None,
            });
            self.adopt_children(left);
            self.adopt_children(right);

            match parent {
                None => {
                    // Splitting the root grows the tree by one level.
                    debug_assert_eq!(self.root, Some(current), "parentless node is not the root");
                    let new_root = self.arena.alloc(Node {
                        keys: vec![keys[1], keys[3]],
                        children: vec![left, right],
                        parent: None,
                    });
                    self.arena.node_mut(left).parent = Some(new_root);
                    self.arena.node_mut(right).parent = Some(new_root);
                    self.arena.remove(current);
                    self.root = Some(new_root);
                    self.emit([
                        TreeAction::Delete(current),
                        TreeAction::Create {
                            node: left,
                            info: self.arena.node(left).info(),
                        },
                        TreeAction::Create {
                            node: right,
                            info: self.arena.node(right).info(),
                        },
                        TreeAction::Create {
                            node: new_root,
                            info: self.arena.node(new_root).info(),
                        },
                        TreeAction::MakeRoot(Some(new_root)),
                    ]);
                    return;
                }
                Some(parent) => {
                    let slot = self
                        .arena
                        .node(parent)
                        .children
                        .iter()
                        .position(|child| *child == current)
                        .expect("split node is among its parent's children");

                    let parent_node = self.arena.node_mut(parent);
                    parent_node.keys[slot] = keys[1];
                    parent_node.keys.insert(slot + 1, keys[3]);
                    parent_node.children[slot] = left;
                    parent_node.children.insert(slot + 1, right);
                    self.arena.node_mut(left).parent = Some(parent);
                    self.arena.node_mut(right).parent = Some(parent);
                    self.arena.remove(current);
                    self.emit([
                        TreeAction::Delete(current),
                        TreeAction::Create {
                            node: left,
                            info: self.arena.node(left).info(),
                        },
                        TreeAction::Create {
                            node: right,
                            info: self.arena.node(right).info(),
                        },
                        TreeAction::Change {
                            node: parent,
                            info: self.arena.node(parent).info(),
                        },
                    ]);
                    current = parent;
                }
            }
        }
    }

    fn adopt_children(&mut self, parent: NodeId) {
        let children = self.arena.node(parent).children.clone();
        for child in children {
            self.arena.node_mut(child).parent = Some(parent);
        }
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;
    use ternvis_types::TreeAction;

    use crate::test_utils::{structural_actions, tree_with_keys, RecordingPort};
    use crate::TwoThreeTree;

    #[test]
    fn first_insert_creates_a_root() {
        let mut tree = TwoThreeTree::new();
        let port = RecordingPort::new();
        tree.subscribe(port.observer());

        assert!(tree.insert(42));

        let batches = port.batches();
        assert_eq!(batches.len(), 4);
        assert_eq!(batches[1], vec![TreeAction::StartQuery]);
        assert_matches!(
            batches[2].as_slice(),
            [
                TreeAction::Create { node, info },
                TreeAction::MakeRoot(Some(root)),
            ] if node == root && info.keys == vec![42] && info.children.is_empty()
        );
        assert_eq!(batches[3], vec![TreeAction::EndQuery]);
    }

    #[test]
    fn repeat_insert_returns_false_and_changes_nothing() {
        let mut tree = TwoThreeTree::new();
        for x in 0..10 {
            assert!(tree.insert(x));
        }
        let before: Vec<_> = tree.keys().collect();

        let port = RecordingPort::new();
        tree.subscribe(port.observer());
        assert!(!tree.insert(5));
        assert!(!tree.insert(5));

        assert_eq!(tree.keys().collect::<Vec<_>>(), before);
        assert_eq!(structural_actions(&port.batches()[1..]), Vec::new());

        assert!(tree.contains(5));
        assert!(tree.erase(5));
        assert!(!tree.contains(5));
        assert!(tree.insert(5));
    }

    #[test]
    fn ascending_run_builds_a_two_level_tree() {
        let tree = tree_with_keys(1..=5);
        assert_eq!(tree.keys().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);

        let root = tree.root().expect("tree is not empty");
        let root_node = tree.arena().node(root);
        assert_eq!(root_node.keys.len(), 2);
        assert_eq!(root_node.children.len(), 2);
        let leaf_sizes: Vec<_> = root_node
            .children
            .iter()
            .map(|child| {
                let node = tree.arena().node(*child);
                assert!(node.is_leaf());
                node.keys.len()
            })
            .collect();
        assert_eq!(leaf_sizes.iter().sum::<usize>(), 5);
    }

    #[test]
    fn overflow_cascades_to_a_new_root() {
        // 1..=7 settles as a three-key root over three leaves; the eighth
        // key overfills the rightmost leaf and the split chain runs all the
        // way up.
        let mut tree = tree_with_keys(1..=7);
        let depth_before = depth(&tree);

        let port = RecordingPort::new();
        tree.subscribe(port.observer());
        assert!(tree.insert(8));

        assert!(
            structural_actions(&port.batches()[1..])
                .iter()
                .any(|action| matches!(action, TreeAction::MakeRoot(Some(_)))),
            "eighth key must force a fresh root"
        );
        assert_eq!(depth(&tree), depth_before + 1);
        assert_eq!(tree.keys().collect::<Vec<_>>(), (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn split_reparents_moved_children() {
        // Driving 1..=20 through repeatedly splits internal nodes; validate()
        // inside insert already checks parent links, so surviving the run is
        // the assertion.
        let tree = tree_with_keys(1..=20);
        assert_eq!(tree.len(), 20);
        assert_eq!(tree.validate(), Ok(()));
    }

    fn depth(tree: &TwoThreeTree) -> usize {
        let mut depth = 0;
        let mut current = tree.root();
        while let Some(id) = current {
            depth += 1;
            current = tree.arena().node(id).children.first().copied();
        }
        depth
    }
}
