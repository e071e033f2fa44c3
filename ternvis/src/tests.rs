//! End-to-end flows through the assembled visualizer.

use pretty_assertions::assert_eq;

use crate::{ControlSurface, InputError, ManualScheduler, QueryKind, Visualizer};

#[derive(Default)]
struct Surface {
    errors: usize,
}

impl ControlSurface for Surface {
    fn set_actions_enabled(&mut self, _enabled: bool) {}

    fn show_input_error(&mut self, _error: &InputError) {
        self.errors += 1;
    }
}

fn drain(visualizer: &mut Visualizer<ManualScheduler>) {
    while visualizer.animation_pending() {
        visualizer.tick();
    }
}

#[test]
fn a_session_flows_from_text_input_to_scene() {
    let mut visualizer = Visualizer::new(ManualScheduler::default());
    let mut surface = Surface::default();

    for input in ["5", "2", "7", "-221", "122334"] {
        assert_eq!(
            visualizer.submit(&mut surface, input, QueryKind::Insert),
            Some(true)
        );
        drain(&mut visualizer);
    }
    assert_eq!(
        visualizer.submit(&mut surface, "5", QueryKind::Search),
        Some(true)
    );
    assert_eq!(
        visualizer.submit(&mut surface, "1", QueryKind::Search),
        Some(false)
    );
    assert_eq!(
        visualizer.submit(&mut surface, "5", QueryKind::Erase),
        Some(true)
    );
    assert_eq!(
        visualizer.submit(&mut surface, "5", QueryKind::Search),
        Some(false)
    );
    assert_eq!(
        visualizer.submit(&mut surface, "-221", QueryKind::Search),
        Some(true)
    );
    drain(&mut visualizer);

    assert_eq!(surface.errors, 0);
    assert_eq!(
        visualizer.tree().keys().collect::<Vec<_>>(),
        vec![-221, 2, 7, 122334]
    );
    assert!(!visualizer.scene().is_empty());
}

#[test]
fn rapid_queries_collapse_frames_but_land_on_the_final_tree() {
    let mut visualizer = Visualizer::new(ManualScheduler::default());
    let mut surface = Surface::default();

    // Fired back to back, no timer in between: each new query pre-empts
    // the previous animation.
    assert_eq!(
        visualizer.submit(&mut surface, "1", QueryKind::Insert),
        Some(true)
    );
    assert_eq!(
        visualizer.submit(&mut surface, "2", QueryKind::Insert),
        Some(true)
    );
    assert_eq!(
        visualizer.submit(&mut surface, "3", QueryKind::Insert),
        Some(true)
    );
    drain(&mut visualizer);

    // Reference run animating every query to completion.
    let mut reference = Visualizer::new(ManualScheduler::default());
    for input in ["1", "2", "3"] {
        reference.submit(&mut surface, input, QueryKind::Insert);
        drain(&mut reference);
    }

    assert_eq!(visualizer.scene(), reference.scene());
    assert_eq!(visualizer.tree().keys().collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn parse_failure_changes_nothing() {
    let mut visualizer = Visualizer::new(ManualScheduler::default());
    let mut surface = Surface::default();

    let pending_before = visualizer.animation_pending();
    assert_eq!(
        visualizer.submit(&mut surface, "seven", QueryKind::Insert),
        None
    );
    assert_eq!(surface.errors, 1);
    assert!(visualizer.tree().is_empty());
    assert_eq!(visualizer.animation_pending(), pending_before);
}

#[test]
fn erasing_everything_leaves_an_empty_scene() {
    let mut visualizer = Visualizer::new(ManualScheduler::default());
    let mut surface = Surface::default();

    for input in ["1", "2", "3"] {
        visualizer.submit(&mut surface, input, QueryKind::Insert);
    }
    for input in ["1", "2", "3"] {
        assert_eq!(
            visualizer.submit(&mut surface, input, QueryKind::Erase),
            Some(true)
        );
    }
    drain(&mut visualizer);

    assert!(visualizer.tree().is_empty());
    assert!(visualizer.scene().is_empty());
}
