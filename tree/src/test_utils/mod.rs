//! Test utils

use std::{cell::RefCell, rc::Rc};

use ternvis_observer::Observer;
use ternvis_types::{ActionsBatch, Key, TreeAction};

use crate::TwoThreeTree;

/// Builds a tree holding every key of `keys`, inserted in order.
pub fn tree_with_keys(keys: impl IntoIterator<Item = Key>) -> TwoThreeTree {
    let mut tree = TwoThreeTree::new();
    for key in keys {
        tree.insert(key);
    }
    tree
}

/// Panics with the violation when tree invariants do not hold.
pub fn assert_tree_invariants(tree: &TwoThreeTree) {
    if let Err(violation) = tree.validate() {
        panic!("tree invariants violated: {violation}\n{tree:?}");
    }
}

/// Flattens a run of batches down to its structural actions, dropping query
/// brackets and visit markers.
pub fn structural_actions(batches: &[ActionsBatch]) -> Vec<TreeAction> {
    batches
        .iter()
        .flatten()
        .filter(|action| {
            !matches!(
                action,
                TreeAction::StartQuery | TreeAction::EndQuery | TreeAction::Visit(_)
            )
        })
        .cloned()
        .collect()
}

/// Observer recording every batch it receives, subscription snapshot
/// included.
pub struct RecordingPort {
    batches: Rc<RefCell<Vec<ActionsBatch>>>,
    observer: Observer<ActionsBatch>,
}

impl Default for RecordingPort {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingPort {
    pub fn new() -> Self {
        let batches: Rc<RefCell<Vec<ActionsBatch>>> = Rc::default();
        let on_subscribe = batches.clone();
        let on_notify = batches.clone();
        RecordingPort {
            batches: batches.clone(),
            observer: Observer::new(
                move |batch: &ActionsBatch| on_subscribe.borrow_mut().push(batch.clone()),
                move |batch: &ActionsBatch| on_notify.borrow_mut().push(batch.clone()),
                || {},
            ),
        }
    }

    pub fn observer(&self) -> &Observer<ActionsBatch> {
        &self.observer
    }

    /// Everything received so far, in delivery order.
    pub fn batches(&self) -> Vec<ActionsBatch> {
        self.batches.borrow().clone()
    }

    pub fn clear(&self) {
        self.batches.borrow_mut().clear();
    }
}
