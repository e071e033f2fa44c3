//! Scene primitives handed to the GUI.

use kurbo::{Line, Point, Rect};

/// Semantic fill of a key cell. The drawing model tracks what happened to a
/// node, not how it looks; mapping to actual colors is the GUI's business.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    #[default]
    Neutral,
    /// Node appeared this frame.
    Created,
    /// Node content was replaced this frame.
    Changed,
    /// The search path went through this node this frame.
    Visited,
}

/// One key cell rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyCell {
    pub rect: Rect,
    pub background: Background,
}

/// A key label, centered in its cell and uniformly scaled to fit.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub center: Point,
    pub scale: f64,
}

/// One rendered frame: rectangles, labels and parent-child edges.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Scene {
    pub cells: Vec<KeyCell>,
    pub labels: Vec<Label>,
    pub edges: Vec<Line>,
}

impl Scene {
    pub(crate) fn clear(&mut self) {
        self.cells.clear();
        self.labels.clear();
        self.edges.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
