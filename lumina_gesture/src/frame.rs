//! Landmarks and the per-inference [`HandFrame`] record.

use glam::{Vec2, Vec3};
use serde::Deserialize;

/// Number of landmarks in a complete hand.
pub const LANDMARK_COUNT: usize = 21;

/// Palm position reported when no hand is present.
pub const NEUTRAL_PALM: Vec2 = Vec2::new(0.5, 0.5);

/// Landmark indices used by the classifier and palm tracking.
pub mod index {
    pub const WRIST:      usize = 0;
    pub const THUMB_TIP:  usize = 4;
    pub const INDEX_TIP:  usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_TIP:   usize = 16;
    pub const PINKY_TIP:  usize = 20;

    /// The four non-thumb fingertips.
    pub const FINGER_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One tracked point, normalized to `[0, 1]` in image space (z is depth).
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Euclidean distance in normalized units.
    pub fn distance(&self, other: &Landmark) -> f32 {
        self.as_vec3().distance(other.as_vec3())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandFrame
// ════════════════════════════════════════════════════════════════════════════

/// One sample from the landmark source.
///
/// Frames are immutable once built and are replaced wholesale by the next
/// sample; nothing keeps a history.
#[derive(Clone, Debug, PartialEq)]
pub struct HandFrame {
    landmarks: Vec<Landmark>,
    present:   bool,
    palm:      Vec2,
}

impl HandFrame {
    /// The neutral "no hand" frame.
    pub fn absent() -> Self {
        HandFrame {
            landmarks: Vec::new(),
            present:   false,
            palm:      NEUTRAL_PALM,
        }
    }

    /// A frame for a detected hand. An empty landmark list is treated as
    /// "no hand".
    pub fn from_landmarks(landmarks: Vec<Landmark>) -> Self {
        if landmarks.is_empty() {
            return HandFrame::absent();
        }
        let palm = palm_position(&landmarks).unwrap_or(NEUTRAL_PALM);
        HandFrame { landmarks, present: true, palm }
    }

    pub fn landmarks(&self) -> &[Landmark] { &self.landmarks }
    pub fn is_present(&self) -> bool       { self.present }

    /// Mirrored palm position in `[0, 1]²`; `(0.5, 0.5)` without a hand.
    pub fn palm_position(&self) -> Vec2 { self.palm }
}

impl Default for HandFrame {
    fn default() -> Self {
        HandFrame::absent()
    }
}

/// Midpoint of the wrist and middle-finger base, with x flipped to match a
/// mirrored camera preview. `None` if either landmark is missing.
pub fn palm_position(landmarks: &[Landmark]) -> Option<Vec2> {
    let wrist = landmarks.get(index::WRIST)?;
    let base  = landmarks.get(index::MIDDLE_MCP)?;
    Some(Vec2::new(
        1.0 - (wrist.x + base.x) / 2.0,
        (wrist.y + base.y) / 2.0,
    ))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_frame_is_neutral() {
        let f = HandFrame::absent();
        assert!(!f.is_present());
        assert!(f.landmarks().is_empty());
        assert_eq!(f.palm_position(), NEUTRAL_PALM);
        assert_eq!(HandFrame::default(), f);
    }

    #[test]
    fn palm_is_mirrored_midpoint() {
        let mut lms = vec![Landmark::default(); LANDMARK_COUNT];
        lms[index::WRIST]      = Landmark::new(0.2, 0.8, 0.0);
        lms[index::MIDDLE_MCP] = Landmark::new(0.4, 0.6, 0.0);
        let f = HandFrame::from_landmarks(lms);
        assert!(f.is_present());
        let p = f.palm_position();
        assert!((p.x - 0.7).abs() < 1e-6);
        assert!((p.y - 0.7).abs() < 1e-6);
    }

    #[test]
    fn short_landmarks_fall_back_to_neutral_palm() {
        let f = HandFrame::from_landmarks(vec![Landmark::new(0.1, 0.1, 0.0); 5]);
        assert!(f.is_present());
        assert_eq!(f.palm_position(), NEUTRAL_PALM);
    }

    #[test]
    fn empty_landmarks_mean_no_hand() {
        assert!(!HandFrame::from_landmarks(Vec::new()).is_present());
    }

    #[test]
    fn landmark_distance() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(0.3, 0.4, 0.0);
        assert!((a.distance(&b) - 0.5).abs() < 1e-6);
    }
}
