//! User input façade.

use std::{cell::RefCell, rc::Rc};

use ternvis_tree::TwoThreeTree;
use ternvis_types::Key;

/// What the user asked the tree to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Insert,
    Erase,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("input is not a valid key: {0:?}")]
    NotAKey(String),
}

/// GUI collaborators the controller drives. The real application backs this
/// with its buttons and a message box; tests record the calls.
pub trait ControlSurface {
    /// Enables or disables the three action buttons.
    fn set_actions_enabled(&mut self, enabled: bool);
    /// Tells the user their input did not parse. The engine was not
    /// touched.
    fn show_input_error(&mut self, error: &InputError);
}

/// Turns raw text input into engine queries.
///
/// On parse failure the error is surfaced and nothing else happens. On
/// success the action buttons are disabled for the duration of the engine
/// call and re-enabled right after it returns; the engine is synchronous,
/// the animation that follows only needs the timer.
pub struct Controller {
    tree: Rc<RefCell<TwoThreeTree>>,
}

impl Controller {
    pub fn new(tree: Rc<RefCell<TwoThreeTree>>) -> Self {
        Controller { tree }
    }

    /// Runs one user request. Returns the engine's answer, or `None` when
    /// the input did not parse.
    pub fn submit(
        &self,
        surface: &mut dyn ControlSurface,
        input: &str,
        intent: QueryKind,
    ) -> Option<bool> {
        let key = match parse_key(input) {
            Ok(key) => key,
            Err(error) => {
                surface.show_input_error(&error);
                return None;
            }
        };
        surface.set_actions_enabled(false);
        let outcome = {
            let mut tree = self.tree.borrow_mut();
            match intent {
                QueryKind::Insert => tree.insert(key),
                QueryKind::Erase => tree.erase(key),
                QueryKind::Search => tree.contains(key),
            }
        };
        surface.set_actions_enabled(true);
        Some(outcome)
    }
}

pub fn parse_key(input: &str) -> Result<Key, InputError> {
    input
        .trim()
        .parse()
        .map_err(|_| InputError::NotAKey(input.to_string()))
}

#[cfg(test)]
mod test {
    use std::{cell::RefCell, rc::Rc};

    use ternvis_tree::TwoThreeTree;

    use super::{parse_key, ControlSurface, Controller, InputError, QueryKind};

    #[derive(Default)]
    struct TestSurface {
        button_states: Vec<bool>,
        errors: Vec<InputError>,
    }

    impl ControlSurface for TestSurface {
        fn set_actions_enabled(&mut self, enabled: bool) {
            self.button_states.push(enabled);
        }

        fn show_input_error(&mut self, error: &InputError) {
            self.errors.push(error.clone());
        }
    }

    #[test]
    fn parses_plain_and_padded_integers() {
        assert_eq!(parse_key("42"), Ok(42));
        assert_eq!(parse_key("  -221 "), Ok(-221));
        assert_eq!(parse_key("1e5"), Err(InputError::NotAKey("1e5".into())));
        assert_eq!(parse_key(""), Err(InputError::NotAKey("".into())));
    }

    #[test]
    fn bad_input_surfaces_an_error_and_leaves_the_engine_alone() {
        let tree = Rc::new(RefCell::new(TwoThreeTree::new()));
        let controller = Controller::new(tree.clone());
        let mut surface = TestSurface::default();

        assert_eq!(
            controller.submit(&mut surface, "seven", QueryKind::Insert),
            None
        );

        assert_eq!(surface.errors, vec![InputError::NotAKey("seven".into())]);
        assert!(surface.button_states.is_empty(), "buttons never touched");
        assert!(tree.borrow().is_empty());
    }

    #[test]
    fn buttons_are_disabled_around_the_engine_call() {
        let tree = Rc::new(RefCell::new(TwoThreeTree::new()));
        let controller = Controller::new(tree.clone());
        let mut surface = TestSurface::default();

        assert_eq!(
            controller.submit(&mut surface, "5", QueryKind::Insert),
            Some(true)
        );
        assert_eq!(
            controller.submit(&mut surface, "5", QueryKind::Insert),
            Some(false)
        );
        assert_eq!(
            controller.submit(&mut surface, "5", QueryKind::Search),
            Some(true)
        );
        assert_eq!(
            controller.submit(&mut surface, "5", QueryKind::Erase),
            Some(true)
        );
        assert_eq!(
            controller.submit(&mut surface, "5", QueryKind::Erase),
            Some(false)
        );

        assert_eq!(
            surface.button_states,
            vec![false, true, false, true, false, true, false, true, false, true]
        );
        assert!(surface.errors.is_empty());
    }
}
