//! Synthetic hand poses.
//!
//! Used by the keyboard simulator and by tests to produce complete landmark
//! sets that go through the real classifier.

use glam::Vec2;

use crate::classify::Gesture;
use crate::frame::{index, Landmark, LANDMARK_COUNT};

/// Finger fan, degrees from straight up (thumb, index, middle, ring, pinky).
const FINGER_ANGLES: [f32; 5] = [-60.0, -20.0, -5.0, 10.0, 25.0];

/// Thumb and index tips are this far apart in a pinch.
const PINCH_GAP: f32 = 0.01;

/// A canonical hand pose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandShape {
    /// Fingers half-curled; classifies as `None`.
    Relaxed,
    Fist,
    Open,
    Pinch,
}

impl HandShape {
    /// The gesture this shape is built to produce.
    pub fn gesture(self) -> Gesture {
        match self {
            HandShape::Relaxed => Gesture::None,
            HandShape::Fist    => Gesture::Fist,
            HandShape::Open    => Gesture::Open,
            HandShape::Pinch   => Gesture::Pinch,
        }
    }

    /// (thumb reach, finger reach) from the wrist.
    fn reach(self) -> (f32, f32) {
        match self {
            HandShape::Relaxed => (0.20, 0.30),
            HandShape::Fist    => (0.15, 0.12),
            HandShape::Open    => (0.30, 0.45),
            HandShape::Pinch   => (0.20, 0.30),
        }
    }

    /// Build 21 landmarks whose mirrored palm position is `palm`.
    pub fn landmarks(self, palm: Vec2) -> Vec<Landmark> {
        let (thumb_reach, finger_reach) = self.reach();
        let mut points = vec![Vec2::ZERO; LANDMARK_COUNT];

        for (finger, angle) in FINGER_ANGLES.iter().enumerate() {
            let reach = if finger == 0 { thumb_reach } else { finger_reach };
            let (sin, cos) = angle.to_radians().sin_cos();
            // image y grows downward
            let dir = Vec2::new(sin, -cos) * reach;
            for joint in 0..4 {
                points[1 + finger * 4 + joint] = dir * (joint + 1) as f32 / 4.0;
            }
        }

        if self == HandShape::Pinch {
            let tip = points[index::INDEX_TIP] + Vec2::new(PINCH_GAP, 0.0);
            for joint in 0..4 {
                points[1 + joint] = tip * (joint + 1) as f32 / 4.0;
            }
        }

        let centre = Vec2::new(1.0 - palm.x, palm.y);
        let offset = centre - (points[index::WRIST] + points[index::MIDDLE_MCP]) * 0.5;
        points
            .into_iter()
            .map(|p| Landmark::new(p.x + offset.x, p.y + offset.y, 0.0))
            .collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classify, HandFrame};

    const SHAPES: [HandShape; 4] =
        [HandShape::Relaxed, HandShape::Fist, HandShape::Open, HandShape::Pinch];

    #[test]
    fn shapes_classify_as_intended() {
        for palm in [Vec2::new(0.5, 0.5), Vec2::new(0.1, 0.9), Vec2::new(0.85, 0.2)] {
            for shape in SHAPES {
                let lms = shape.landmarks(palm);
                assert_eq!(lms.len(), LANDMARK_COUNT);
                assert_eq!(classify(&lms), shape.gesture(), "{:?} at {:?}", shape, palm);
            }
        }
    }

    #[test]
    fn shapes_land_on_requested_palm() {
        let palm = Vec2::new(0.25, 0.7);
        for shape in SHAPES {
            let f = HandFrame::from_landmarks(shape.landmarks(palm));
            assert!(f.palm_position().distance(palm) < 1e-5, "{:?}", shape);
        }
    }
}
