//! # lumina_noel
//!
//! A particle Christmas tree steered by hand gestures. Ornament particles and
//! photo cards hold a spiral cone; open the hand and they scatter into a
//! floating cloud, pinch to fly the camera in, close the hand to gather the
//! tree again.
//!
//! ## Gesture → Mode mapping
//!
//! | Gesture | Mode | Layout | Camera |
//! |---|---|---|---|
//! | Fist (3+ tips near the wrist) | `TREE` | spiral cone | `(0, 0, 25)` |
//! | Open (3+ tips far from the wrist) | `SCATTER` | cloud | sways, follows the palm |
//! | Pinch (thumb touches index) | `ZOOM` | cloud | `(0, 0, 8)` |
//! | anything else / no hand | unchanged | | |
//!
//! ## Landmark sources
//!
//! * (default) **Simulation**: keys in the viewer window pose a synthetic
//!   hand that goes through the real classifier.
//! * `--landmarks-stdin`: MediaPipe-style JSON lines on stdin.
//! * `--landmark-cmd "<detector>"`: start a detector and read its stdout.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Action |
//! |---|---|
//! | `F` | Fist |
//! | `O` | Open hand |
//! | `P` | Pinch |
//! | `R` | Relaxed hand (no gesture) |
//! | `H` | Show / hide the hand |
//! | mouse | Palm position |
//! | `A` | Add a photo card |
//! | `Tab` | Hover the next photo card |
//! | `Q` / `Escape` | Quit |

pub mod app;
pub mod camera;
pub mod error;
pub mod mailbox;
pub mod mode;
pub mod source;
pub mod visualizer;

pub use error::{AppError, SourceError};
