//! Landmark → [`Gesture`] classification.
//!
//! Stateless and fail-closed: anything that is not a complete hand comes out
//! as [`Gesture::None`].

use std::fmt;

use crate::frame::{index, Landmark, LANDMARK_COUNT};

// ════════════════════════════════════════════════════════════════════════════
// Gesture
// ════════════════════════════════════════════════════════════════════════════

/// A discrete hand gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Gesture {
    #[default]
    None,
    Fist,
    Open,
    Pinch,
}

impl Gesture {
    pub fn label(self) -> &'static str {
        match self {
            Gesture::None  => "NONE",
            Gesture::Fist  => "FIST",
            Gesture::Open  => "OPEN",
            Gesture::Pinch => "PINCH",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Thresholds
// ════════════════════════════════════════════════════════════════════════════

/// Distance thresholds, in normalized landmark units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifierThresholds {
    /// Thumb tip to index tip, strictly below → pinch.
    pub pinch_distance:    f32,
    /// Fingertip to wrist, strictly below → folded.
    pub folded_distance:   f32,
    /// Fingertip to wrist, strictly above → extended.
    pub extended_distance: f32,
    /// How many of the four fingertips must agree.
    pub min_fingers:       usize,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        ClassifierThresholds {
            pinch_distance:    0.05,
            folded_distance:   0.25,
            extended_distance: 0.35,
            min_fingers:       3,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// classify
// ════════════════════════════════════════════════════════════════════════════

/// Classify with the default thresholds.
pub fn classify(landmarks: &[Landmark]) -> Gesture {
    classify_with(landmarks, &ClassifierThresholds::default())
}

/// Classify with explicit thresholds.
///
/// Pinch is tested first so that a pinch is never masked by folded-finger
/// geometry.
pub fn classify_with(landmarks: &[Landmark], t: &ClassifierThresholds) -> Gesture {
    if landmarks.len() < LANDMARK_COUNT {
        return Gesture::None;
    }

    let thumb = &landmarks[index::THUMB_TIP];
    let tip   = &landmarks[index::INDEX_TIP];
    if thumb.distance(tip) < t.pinch_distance {
        return Gesture::Pinch;
    }

    let wrist = &landmarks[index::WRIST];
    let reach = index::FINGER_TIPS.map(|i| landmarks[i].distance(wrist));

    let folded = reach.iter().filter(|&&d| d < t.folded_distance).count();
    if folded >= t.min_fingers {
        return Gesture::Fist;
    }

    let extended = reach.iter().filter(|&&d| d > t.extended_distance).count();
    if extended >= t.min_fingers {
        return Gesture::Open;
    }

    Gesture::None
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// 21 landmarks spread along a diagonal, none of them close together.
    fn spread() -> Vec<Landmark> {
        (0..LANDMARK_COUNT)
            .map(|i| Landmark::new(i as f32 * 0.045, 1.0 - i as f32 * 0.045, 0.0))
            .collect()
    }

    /// Wrist at the centre and all four fingertips `reach` away from it.
    fn hand_with_reach(reach: f32) -> Vec<Landmark> {
        let mut lms = spread();
        lms[index::WRIST]      = Landmark::new(0.5, 0.5, 0.0);
        lms[index::INDEX_TIP]  = Landmark::new(0.5 + reach, 0.5, 0.0);
        lms[index::MIDDLE_TIP] = Landmark::new(0.5, 0.5 + reach, 0.0);
        lms[index::RING_TIP]   = Landmark::new(0.5 - reach, 0.5, 0.0);
        lms[index::PINKY_TIP]  = Landmark::new(0.5, 0.5 - reach, 0.0);
        lms[index::THUMB_TIP]  = Landmark::new(0.5 + reach, 0.5 + reach, 0.3);
        lms
    }

    #[test]
    fn pinch_scenario() {
        let mut lms = spread();
        lms[index::THUMB_TIP] = Landmark::new(0.50, 0.50, 0.0);
        lms[index::INDEX_TIP] = Landmark::new(0.52, 0.50, 0.0);
        assert_eq!(classify(&lms), Gesture::Pinch);
    }

    #[test]
    fn fist_scenario() {
        assert_eq!(classify(&hand_with_reach(0.1)), Gesture::Fist);
    }

    #[test]
    fn open_scenario() {
        assert_eq!(classify(&hand_with_reach(0.5)), Gesture::Open);
    }

    #[test]
    fn in_between_reach_is_none() {
        assert_eq!(classify(&hand_with_reach(0.3)), Gesture::None);
    }

    #[test]
    fn two_folded_fingers_are_not_a_fist() {
        let mut lms = hand_with_reach(0.3);
        lms[index::INDEX_TIP]  = Landmark::new(0.55, 0.5, 0.0);
        lms[index::MIDDLE_TIP] = Landmark::new(0.5, 0.55, 0.0);
        assert_eq!(classify(&lms), Gesture::None);
    }

    #[test]
    fn pinch_wins_over_fist() {
        let mut lms = hand_with_reach(0.1);
        lms[index::THUMB_TIP] = Landmark::new(0.61, 0.5, 0.0);
        assert_eq!(classify(&lms), Gesture::Pinch);
    }

    #[test]
    fn empty_and_short_inputs_are_none() {
        assert_eq!(classify(&[]), Gesture::None);
        assert_eq!(classify(&hand_with_reach(0.1)[..20]), Gesture::None);
    }

    #[test]
    fn custom_thresholds() {
        let strict = ClassifierThresholds { folded_distance: 0.05, ..Default::default() };
        assert_eq!(classify_with(&hand_with_reach(0.1), &strict), Gesture::None);
    }

    #[test]
    fn labels() {
        assert_eq!(Gesture::Pinch.to_string(), "PINCH");
        assert_eq!(Gesture::default(), Gesture::None);
    }

    fn arb_hand() -> impl Strategy<Value = Vec<Landmark>> {
        prop::collection::vec(
            (0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0).prop_map(|(x, y, z)| Landmark::new(x, y, z)),
            LANDMARK_COUNT,
        )
    }

    proptest! {
        #[test]
        fn close_thumb_and_index_always_pinch(
            mut lms in arb_hand(),
            dx in -0.028f32..0.028,
            dy in -0.028f32..0.028,
            dz in -0.028f32..0.028,
        ) {
            let thumb = lms[index::THUMB_TIP];
            lms[index::INDEX_TIP] = Landmark::new(thumb.x + dx, thumb.y + dy, thumb.z + dz);
            prop_assert_eq!(classify(&lms), Gesture::Pinch);
        }

        #[test]
        fn fewer_than_21_points_is_none(lms in arb_hand(), len in 0usize..LANDMARK_COUNT) {
            prop_assert_eq!(classify(&lms[..len]), Gesture::None);
        }
    }
}
