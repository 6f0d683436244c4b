//! # lumina_gesture
//!
//! Turns one hand's 21 normalized landmarks (MediaPipe Hands layout) into a
//! discrete [`Gesture`].
//!
//! ## Landmark layout
//!
//! | Index | Point |
//! |---|---|
//! | 0 | Wrist |
//! | 4 | Thumb tip |
//! | 8 | Index tip |
//! | 9 | Middle-finger base (MCP) |
//! | 12 / 16 / 20 | Middle / ring / pinky tips |
//!
//! ## Classification
//!
//! Rules are evaluated in priority order, first match wins:
//!
//! | Gesture | Rule |
//! |---|---|
//! | `Pinch` | thumb tip to index tip < 0.05 |
//! | `Fist`  | ≥ 3 of the four fingertips within 0.25 of the wrist |
//! | `Open`  | ≥ 3 of the four fingertips farther than 0.35 from the wrist |
//! | `None`  | anything else, including fewer than 21 landmarks |
//!
//! Distances are in the landmark source's normalized coordinate space; no
//! hand-size normalization is applied.
//!
//! ```rust
//! use glam::Vec2;
//! use lumina_gesture::{classify, Gesture, HandFrame, HandShape};
//!
//! let frame = HandFrame::from_landmarks(HandShape::Open.landmarks(Vec2::new(0.3, 0.6)));
//! assert_eq!(classify(frame.landmarks()), Gesture::Open);
//! assert!((frame.palm_position().x - 0.3).abs() < 1e-5);
//! ```

pub mod classify;
pub mod frame;
pub mod shape;

pub use classify::{classify, classify_with, ClassifierThresholds, Gesture};
pub use frame::{index, palm_position, HandFrame, Landmark, LANDMARK_COUNT, NEUTRAL_PALM};
pub use shape::HandShape;
