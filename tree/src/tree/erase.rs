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

//! Erasure and the merge cascade.

use ternvis_types::{Key, NodeId, TreeAction};

use super::TwoThreeTree;

impl TwoThreeTree {
    /// Removes `key` if present. Returns `true` iff a key was removed.
    pub fn erase(&mut self, key: Key) -> bool {
        self.emit([TreeAction::StartQuery]);
        let removed = self.erase_impl(key);
        debug_assert_eq!(self.validate(), Ok(()), "invalid 2-3 tree after erase");
        self.emit([TreeAction::EndQuery]);
        removed
    }

    fn erase_impl(&mut self, key: Key) -> bool {
        let Some(leaf) = self.leaf_for(key) else {
            return false;
        };
        let node = self.arena.node_mut(leaf);
        debug_assert!(node.is_leaf(), "descent stopped on an internal node");
        let Some(position) = node.keys.iter().position(|present| *present == key) else {
            return false;
        };
        node.keys.remove(position);
        self.emit_change(leaf);
        // The removed key may have been the leaf's maximum, in which case
        // routing keys all the way up are stale; refresh them before any
        // rebalancing, later merges keep them accurate locally.
        self.update_ancestor_keys(leaf);
        if self.arena.node(leaf).keys.len() < 2 {
            self.merge_underfull(leaf);
        }
        true
    }

    /// Folds an underfull node (a single key left) into a sibling and walks
    /// up: the parent loses a key per merge and may itself fall below two
    /// keys. An overstuffed sibling is split right back, which ends the
    /// cascade; a drained root hands its place to its remaining child.
    fn merge_underfull(&mut self, start: NodeId) {
        let mut current = start;
        loop {
            if self.arena.node(current).keys.len() >= 2 {
                return;
            }
            let Some(parent) = self.arena.node(current).parent else {
                self.collapse_root();
                return;
            };

            let slot = self
                .arena
                .node(parent)
                .children
                .iter()
                .position(|child| *child == current)
                .expect("underfull node is among its parent's children");
            // Left sibling when there is one, right otherwise.
            let merge_left = slot > 0;
            let sibling = self.arena.node(parent).children[if merge_left {
                slot - 1
            } else {
                slot + 1
            }];

            let node = self.arena.node(current);
            debug_assert_eq!(node.keys.len(), 1, "merge candidate keeps a single key");
            let moved_key = node.keys[0];
            let moved_child = node.children.first().copied();

            let sibling_node = self.arena.node_mut(sibling);
            if merge_left {
                sibling_node.keys.push(moved_key);
                if let Some(child) = moved_child {
                    sibling_node.children.push(child);
                }
            } else {
                sibling_node.keys.insert(0, moved_key);
                if let Some(child) = moved_child {
                    sibling_node.children.insert(0, child);
                }
            }
            if let Some(child) = moved_child {
                self.arena.node_mut(child).parent = Some(sibling);
            }

            if merge_left {
                // The left sibling's subtree grew; its routing key must
                // follow before the absorbed slot disappears.
                let sibling_max = self.arena.node(sibling).last_key();
                self.arena.node_mut(parent).keys[slot - 1] = sibling_max;
            }
            let parent_node = self.arena.node_mut(parent);
            parent_node.keys.remove(slot);
            parent_node.children.remove(slot);
            self.arena.remove(current);

            self.emit([
                TreeAction::Change {
                    node: sibling,
                    info: self.arena.node(sibling).info(),
                },
                TreeAction::Change {
                    node: parent,
                    info: self.arena.node(parent).info(),
                },
                TreeAction::Delete(current),
            ]);

            if self.arena.node(sibling).keys.len() == 4 {
                self.split_overfull(sibling);
                return;
            }
            current = parent;
        }
    }

    /// The root dropped below two keys during a merge cascade, or lost its
    /// last key outright.
    fn collapse_root(&mut self) {
        let root = self.root.expect("collapse is only reached from the root");
        let node = self.arena.node(root);
        match (node.keys.len(), node.children.len()) {
            (0, 0) => {
                // Last key of the tree gone.
                self.arena.remove(root);
                self.root = None;
                self.emit([TreeAction::Delete(root), TreeAction::MakeRoot(None)]);
            }
            (1, 1) => {
                // A merge left the root routing a single child; the child
                // takes its place and the tree shrinks by one level.
                let heir = node.children[0];
                self.arena.remove(root);
                self.arena.node_mut(heir).parent = None;
                self.root = Some(heir);
                self.emit([TreeAction::Delete(root), TreeAction::MakeRoot(Some(heir))]);
            }
            // A one-key leaf root is a valid tree; keep it.
            _ => {}
        }
    }
}
