//! Interactive 2-3 search tree visualizer core.
//!
//! The engine ([`TwoThreeTree`]) answers `insert`/`erase`/`search` queries
//! and reports every structural step over its action stream; the
//! [`AnimationProducer`] queues those reports and paces them into the
//! [`TreeDrawingModel`] one frame per batch, off a one-shot timer; the
//! [`Controller`] turns raw text input into engine calls. [`Visualizer`]
//! wires the four together for a host GUI, which only has to render the
//! published [`Scene`], relay button clicks and run one timer.
//!
//! ```
//! use ternvis::{ManualScheduler, QueryKind, Visualizer};
//! # struct NoUi;
//! # impl ternvis::ControlSurface for NoUi {
//! #     fn set_actions_enabled(&mut self, _: bool) {}
//! #     fn show_input_error(&mut self, _: &ternvis::InputError) {}
//! # }
//!
//! let mut visualizer = Visualizer::new(ManualScheduler::default());
//! let mut surface = NoUi;
//! visualizer.submit(&mut surface, "5", QueryKind::Insert);
//! while visualizer.animation_pending() {
//!     visualizer.tick();
//! }
//! assert!(!visualizer.scene().is_empty());
//! ```

mod animation;
mod controller;

#[cfg(test)]
mod tests;

use std::{cell::RefCell, rc::Rc};

pub use animation::{AnimationProducer, FrameScheduler, ManualScheduler, FRAME_DELAY};
pub use controller::{parse_key, ControlSurface, Controller, InputError, QueryKind};
pub use ternvis_scene::{Background, KeyCell, Label, Scene, TreeDrawingModel};
pub use ternvis_tree::TwoThreeTree;
pub use ternvis_types::{ActionsBatch, Key, NodeId, NodeInfo, TreeAction};

/// The assembled visualizer core: engine, animation pipeline, drawing model
/// and input façade, wired and ready for a GUI shell.
pub struct Visualizer<S: FrameScheduler + 'static> {
    tree: Rc<RefCell<TwoThreeTree>>,
    model: Rc<RefCell<TreeDrawingModel>>,
    producer: AnimationProducer<S>,
    controller: Controller,
}

impl<S: FrameScheduler + 'static> Visualizer<S> {
    /// Builds an empty tree wired to a fresh drawing model. `scheduler` is
    /// the host's one-shot timer; its callback must invoke [`Self::tick`].
    pub fn new(scheduler: S) -> Self {
        let tree = Rc::new(RefCell::new(TwoThreeTree::new()));
        let model = Rc::new(RefCell::new(TreeDrawingModel::new()));
        let producer = AnimationProducer::new(model.clone(), scheduler);
        tree.borrow().subscribe(producer.observer_port());
        let controller = Controller::new(tree.clone());
        Visualizer {
            tree,
            model,
            producer,
            controller,
        }
    }

    /// Runs one user request through the controller. Returns the engine's
    /// answer, or `None` when the input did not parse.
    pub fn submit(
        &mut self,
        surface: &mut dyn ControlSurface,
        input: &str,
        intent: QueryKind,
    ) -> Option<bool> {
        self.controller.submit(surface, input, intent)
    }

    /// Timer callback.
    pub fn tick(&mut self) {
        self.producer.tick();
    }

    /// Whether animation frames are still waiting on the timer.
    pub fn animation_pending(&self) -> bool {
        self.producer.pending_frames() > 0
    }

    /// The last rendered frame.
    pub fn scene(&self) -> Scene {
        self.model.borrow().scene().clone()
    }

    /// Shared handle to the drawing model, for a GUI that wants to observe
    /// frames directly.
    pub fn scene_port(&self) -> Rc<RefCell<TreeDrawingModel>> {
        self.model.clone()
    }

    /// Direct read access to the engine, e.g. for status displays.
    pub fn tree(&self) -> std::cell::Ref<'_, TwoThreeTree> {
        self.tree.borrow()
    }
}
