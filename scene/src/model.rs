//! Fold of action batches into the shadow tree.

use indexmap::IndexMap;
use ternvis_types::{ActionsBatch, Key, NodeId, TreeAction};

use crate::layout::Layout;
use crate::scene::{Background, Scene};

#[derive(Debug, Clone)]
pub(crate) struct DrawNode {
    pub(crate) keys: Vec<Key>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) background: Background,
}

/// Replica of the engine's tree rebuilt from the action stream alone.
///
/// Feeding it a mid-query batch replays the reported mutations and renders
/// one frame; query brackets render a frame of the unchanged tree, which
/// gives queries a visible start and end. Malformed streams (changing an
/// unknown node, double create) are bugs on the sending side and trip debug
/// assertions here.
#[derive(Debug, Default)]
pub struct TreeDrawingModel {
    nodes: IndexMap<NodeId, DrawNode>,
    root: Option<NodeId>,
    scene: Scene,
    frames: u64,
}

impl TreeDrawingModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one batch into the shadow, then renders one frame.
    pub fn apply(&mut self, batch: &ActionsBatch) {
        for action in batch {
            match action {
                TreeAction::StartQuery | TreeAction::EndQuery => {}
                TreeAction::Create { node, info } => {
                    debug_assert!(
                        !self.nodes.contains_key(node),
                        "creating already known node {node}"
                    );
                    self.nodes.insert(
                        *node,
                        DrawNode {
                            keys: info.keys.clone(),
                            children: info.children.clone(),
                            background: Background::Created,
                        },
                    );
                }
                TreeAction::Change { node, info } => {
                    debug_assert!(
                        self.nodes.contains_key(node),
                        "changing unknown node {node}"
                    );
                    self.nodes.insert(
                        *node,
                        DrawNode {
                            keys: info.keys.clone(),
                            children: info.children.clone(),
                            background: Background::Changed,
                        },
                    );
                }
                TreeAction::Delete(node) => {
                    debug_assert!(
                        self.nodes.contains_key(node),
                        "deleting unknown node {node}"
                    );
                    self.nodes.swap_remove(node);
                }
                TreeAction::MakeRoot(root) => {
                    debug_assert!(
                        root.map_or(true, |id| self.nodes.contains_key(&id)),
                        "making an unknown node the root"
                    );
                    self.root = *root;
                }
                TreeAction::Visit(node) => {
                    debug_assert!(
                        self.nodes.contains_key(node),
                        "visiting unknown node {node}"
                    );
                    if let Some(visited) = self.nodes.get_mut(node) {
                        visited.background = Background::Visited;
                    }
                }
            }
        }
        self.render();
    }

    /// The last rendered frame.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// How many frames have been rendered so far; exactly one per applied
    /// batch.
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Number of nodes currently shadowed; unreachable ones are collected
    /// at each render.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn render(&mut self) {
        self.frames += 1;
        self.scene.clear();
        let drawn = Layout::new(&self.nodes, &mut self.scene).run(self.root);
        // The frame keeps the highlights; the shadow goes back to neutral
        // and sheds whatever the layout could not reach from the root.
        self.nodes.retain(|id, _| drawn.contains(id));
        for node in self.nodes.values_mut() {
            node.background = Background::Neutral;
        }
    }
}
