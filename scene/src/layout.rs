//! Deterministic top-down layout.
//!
//! Horizontal space comes from the leaf fan: a subtree spans
//! `keys_in_leaves * CELL_W + (leaves - 1) * H_MARGIN` and every node is
//! centered over its subtree's span. Vertical position is a plain function
//! of depth. Children are placed before their parent so the parent knows
//! where to aim its edges.

use std::collections::HashSet;

use indexmap::IndexMap;
use kurbo::{Line, Point, Rect, Size};
use ternvis_types::NodeId;

use crate::model::DrawNode;
use crate::scene::{KeyCell, Label, Scene};
use crate::{CELL_H, CELL_W, GLYPH_H, GLYPH_W, H_MARGIN, V_MARGIN};

pub(crate) struct Layout<'a> {
    nodes: &'a IndexMap<NodeId, DrawNode>,
    scene: &'a mut Scene,
    drawn: HashSet<NodeId>,
    placed_leaves: usize,
    placed_leaf_keys: usize,
}

impl<'a> Layout<'a> {
    pub(crate) fn new(nodes: &'a IndexMap<NodeId, DrawNode>, scene: &'a mut Scene) -> Self {
        Layout {
            nodes,
            scene,
            drawn: HashSet::new(),
            placed_leaves: 0,
            placed_leaf_keys: 0,
        }
    }

    /// Lays out the whole tree and returns the set of ids it reached.
    pub(crate) fn run(mut self, root: Option<NodeId>) -> HashSet<NodeId> {
        if let Some(root) = root {
            self.place(root, 0);
        }
        self.drawn
    }

    /// Places one node and its subtree; returns the node's top-center
    /// anchor, where edges from the parent attach.
    fn place(&mut self, id: NodeId, depth: usize) -> Point {
        // Taken by value: placing children needs `self` again.
        let node = self.nodes[&id].clone();
        self.drawn.insert(id);

        // Leaf-fan counters before this subtree: everything placed so far
        // sits strictly to our left.
        let leaves_to_the_left = self.placed_leaves;
        let leaf_keys_to_the_left = self.placed_leaf_keys;

        let child_anchors: Vec<Point> = node
            .children
            .iter()
            .map(|child| self.place(*child, depth + 1))
            .collect();
        if node.children.is_empty() {
            self.placed_leaves += 1;
            self.placed_leaf_keys += node.keys.len();
        }

        let left_border =
            leaf_keys_to_the_left as f64 * CELL_W + leaves_to_the_left as f64 * H_MARGIN;
        let right_border = self.placed_leaf_keys as f64 * CELL_W
            + (self.placed_leaves as f64 - 1.0) * H_MARGIN;
        let midpoint = left_border + (right_border - left_border) / 2.0;
        let top_left = Point::new(
            midpoint - node.keys.len() as f64 * CELL_W / 2.0,
            depth as f64 * (CELL_H + V_MARGIN),
        );

        for (slot, key) in node.keys.iter().enumerate() {
            let origin = Point::new(top_left.x + slot as f64 * CELL_W, top_left.y);
            let rect = Rect::from_origin_size(origin, Size::new(CELL_W, CELL_H));
            self.scene.cells.push(KeyCell {
                rect,
                background: node.background,
            });

            let text = key.to_string();
            let scale = (CELL_W / (text.len() as f64 * GLYPH_W)).min(CELL_H / GLYPH_H);
            self.scene.labels.push(Label {
                text,
                center: rect.center(),
                scale,
            });

            if let Some(anchor) = child_anchors.get(slot) {
                self.scene.edges.push(Line::new(
                    Point::new(origin.x + CELL_W / 2.0, origin.y + CELL_H),
                    *anchor,
                ));
            }
        }

        Point::new(midpoint, top_left.y)
    }
}
