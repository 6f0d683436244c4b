//! # lumina_formation
//!
//! Owns every visual element of the scene (ornament particles and photo
//! cards), knows where each one belongs in the two layouts, and eases the
//! whole population toward the active layout one frame at a time.
//!
//! ## Layouts
//!
//! | Layout | Particles | Photo cards |
//! |---|---|---|
//! | `Tree` | spiral cone, narrowing upward | golden-angle spiral just outside the cone, facing out |
//! | `Scatter` | uniform ball of radius 12 | random box in front of the tree, facing the camera |
//!
//! Both target poses are fixed when an element is created. Each frame only
//! the current pose moves, by a fixed fraction of the remaining distance
//! (see [`Smoothing`]).
//!
//! ## Output
//!
//! After [`FormationEngine::advance`] the engine exposes one
//! [`InstanceBatch`] per [`ElementKind`]: a flat list of model matrices plus a
//! parallel color list, in creation order, ready for instanced submission.
//!
//! ```rust
//! use glam::Vec3;
//! use lumina_formation::{ElementKind, FormationConfig, FormationEngine, FrameInput, Layout, PhotoRef};
//!
//! let mut engine = FormationEngine::new(FormationConfig { particle_count: 100, ..Default::default() })?;
//! engine.append_photo(PhotoRef::new("holiday.jpg"));
//! engine.advance(&FrameInput {
//!     layout:     Layout::Scatter,
//!     time:       0.0,
//!     dt:         1.0 / 60.0,
//!     camera_eye: Vec3::new(0.0, 0.0, 25.0),
//! });
//! assert_eq!(engine.batch(ElementKind::Photo).len(), 1);
//! # Ok::<(), lumina_formation::FormationError>(())
//! ```

pub mod config;
pub mod element;
pub mod engine;
pub mod error;
pub mod layout;
pub mod palette;
pub mod smoothing;

pub use config::{FormationConfig, PhotoScatterBox};
pub use element::{ElementId, ElementKind, PhotoRef, Pose, VisualElement};
pub use engine::{FormationEngine, FrameInput, InstanceBatch, Layout, PhotoCard};
pub use error::{FormationError, Result};
pub use palette::Color;
pub use smoothing::Smoothing;
