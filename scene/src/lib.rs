//! Shadow tree model and deterministic layout.
//!
//! [`TreeDrawingModel`] rebuilds the engine's tree purely from action
//! batches, one frame per batch: fold the batch into an id-keyed shadow,
//! lay the shadow out top-down, publish the resulting [`Scene`], then reset
//! highlight colors and drop shadow entries the layout never reached.
//!
//! The model never dereferences a [`ternvis_types::NodeId`]; ids are map
//! keys and nothing else, which is what lets it run on the far side of any
//! transport.

mod layout;
mod model;
mod scene;


pub use model::TreeDrawingModel;
pub use scene::{Background, KeyCell, Label, Scene};

/// Width of one key cell.
pub const CELL_W: f64 = 50.0;
/// Height of one key cell.
pub const CELL_H: f64 = 30.0;
/// Horizontal gap between adjacent leaves.
pub const H_MARGIN: f64 = 50.0;
/// Vertical gap between tree levels.
pub const V_MARGIN: f64 = 50.0;

/// Nominal glyph box used to scale labels into their cells. A GUI with real
/// font metrics draws the same layout, just with its own label scales.
pub(crate) const GLYPH_W: f64 = 10.0;
pub(crate) const GLYPH_H: f64 = 16.0;
