//! Display mode state machine.
//!
//! | Gesture | Mode |
//! |---|---|
//! | `Fist`  | `Tree` |
//! | `Open`  | `Scatter` |
//! | `Pinch` | `Zoom` |
//! | `None`  | unchanged |
//!
//! Every observation is applied, including re-entry into the current mode.
//! There is no debounce: one stray classification flips the mode.

use std::fmt;

use log::info;
use lumina_formation::Layout;
use lumina_gesture::Gesture;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AppMode {
    #[default]
    Tree,
    Scatter,
    Zoom,
}

impl AppMode {
    pub fn label(self) -> &'static str {
        match self {
            AppMode::Tree    => "TREE",
            AppMode::Scatter => "SCATTER",
            AppMode::Zoom    => "ZOOM",
        }
    }

    /// Zoom reuses the scattered layout; it only changes camera framing.
    pub fn layout(self) -> Layout {
        match self {
            AppMode::Tree                   => Layout::Tree,
            AppMode::Scatter | AppMode::Zoom => Layout::Scatter,
        }
    }

    /// Mode a gesture asks for, if any.
    pub fn for_gesture(gesture: Gesture) -> Option<AppMode> {
        match gesture {
            Gesture::Fist  => Some(AppMode::Tree),
            Gesture::Open  => Some(AppMode::Scatter),
            Gesture::Pinch => Some(AppMode::Zoom),
            Gesture::None  => None,
        }
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sole owner of the current [`AppMode`].
#[derive(Debug, Default)]
pub struct ModeMachine {
    mode:         AppMode,
    last_gesture: Gesture,
}

impl ModeMachine {
    pub fn new() -> Self {
        ModeMachine::default()
    }

    pub fn mode(&self) -> AppMode         { self.mode }
    pub fn last_gesture(&self) -> Gesture { self.last_gesture }

    /// Apply one gesture. Returns the mode entered, or `None` if the gesture
    /// holds the current mode.
    pub fn observe(&mut self, gesture: Gesture) -> Option<AppMode> {
        self.last_gesture = gesture;
        let next = AppMode::for_gesture(gesture)?;
        if next != self.mode {
            info!("mode {} -> {} ({})", self.mode, next, gesture);
        }
        self.mode = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn starts_in_tree() {
        let m = ModeMachine::new();
        assert_eq!(m.mode(), AppMode::Tree);
        assert_eq!(m.last_gesture(), Gesture::None);
    }

    #[test]
    fn open_none_none_fist() {
        let mut m = ModeMachine::new();
        let seen: Vec<AppMode> = [Gesture::Open, Gesture::None, Gesture::None, Gesture::Fist]
            .into_iter()
            .map(|g| {
                m.observe(g);
                m.mode()
            })
            .collect();
        assert_eq!(seen, vec![AppMode::Scatter, AppMode::Scatter, AppMode::Scatter, AppMode::Tree]);
    }

    #[test]
    fn reentry_is_reported() {
        let mut m = ModeMachine::new();
        assert_eq!(m.observe(Gesture::Fist), Some(AppMode::Tree));
        assert_eq!(m.observe(Gesture::Fist), Some(AppMode::Tree));
        assert_eq!(m.observe(Gesture::Pinch), Some(AppMode::Zoom));
        assert_eq!(m.observe(Gesture::None), None);
        assert_eq!(m.last_gesture(), Gesture::None);
        assert_eq!(m.mode(), AppMode::Zoom);
    }

    #[test]
    fn zoom_shares_the_scatter_layout() {
        assert_eq!(AppMode::Tree.layout(), Layout::Tree);
        assert_eq!(AppMode::Scatter.layout(), Layout::Scatter);
        assert_eq!(AppMode::Zoom.layout(), Layout::Scatter);
    }

    fn arb_gesture() -> impl Strategy<Value = Gesture> {
        prop_oneof![
            Just(Gesture::None),
            Just(Gesture::Fist),
            Just(Gesture::Open),
            Just(Gesture::Pinch),
        ]
    }

    proptest! {
        #[test]
        fn none_holds_and_others_always_map(gestures in prop::collection::vec(arb_gesture(), 0..64)) {
            let mut m = ModeMachine::new();
            for g in gestures {
                let before = m.mode();
                let entered = m.observe(g);
                match AppMode::for_gesture(g) {
                    None => {
                        prop_assert_eq!(entered, None);
                        prop_assert_eq!(m.mode(), before);
                    }
                    Some(target) => {
                        prop_assert_eq!(entered, Some(target));
                        prop_assert_eq!(m.mode(), target);
                    }
                }
            }
        }
    }
}
