//! Formation geometry and motion parameters.

use glam::Vec3;

use crate::error::{FormationError, Result};
use crate::smoothing::Smoothing;

/// Box that photo cards scatter into.
///
/// `x ∈ [-half_width, half_width]`, `y ∈ [-half_height, half_height]`,
/// `z ∈ forward ± depth / 2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhotoScatterBox {
    pub half_width:  f32,
    pub half_height: f32,
    pub depth:       f32,
    pub forward:     f32,
}

impl Default for PhotoScatterBox {
    fn default() -> Self {
        PhotoScatterBox {
            half_width:  7.5,
            half_height: 7.5,
            depth:       10.0,
            forward:     5.0,
        }
    }
}

/// Configuration for a [`FormationEngine`](crate::FormationEngine).
#[derive(Clone, Debug, PartialEq)]
pub struct FormationConfig {
    /// Ambient particles, fixed for the engine's lifetime.
    pub particle_count:  usize,
    pub tree_height:     f32,
    /// Radius of the cone at its base.
    pub tree_radius:     f32,
    /// Radius of the ball particles scatter into.
    pub scatter_radius:  f32,
    pub photo_scatter:   PhotoScatterBox,
    /// Position easing.
    pub smoothing:       Smoothing,
    /// Hover scale easing.
    pub hover_smoothing: Smoothing,
    /// Scale multiplier of the hovered element.
    pub hover_scale:     f32,
    /// Amplitude of the floating bob, per kind.
    pub particle_float:  f32,
    pub photo_float:     f32,
    /// World offset of the whole formation; applied to exported transforms.
    pub anchor:          Vec3,
    pub seed:            u64,
}

impl Default for FormationConfig {
    fn default() -> Self {
        FormationConfig {
            particle_count:  1500,
            tree_height:     15.0,
            tree_radius:     6.0,
            scatter_radius:  12.0,
            photo_scatter:   PhotoScatterBox::default(),
            smoothing:       Smoothing::per_frame(0.05),
            hover_smoothing: Smoothing::per_frame(0.1),
            hover_scale:     1.5,
            particle_float:  0.02,
            photo_float:     0.005,
            anchor:          Vec3::new(0.0, -5.0, 0.0),
            seed:            0x4C55_4D49_4E41, // "LUMINA"
        }
    }
}

impl FormationConfig {
    pub fn validate(&self) -> Result<()> {
        positive("tree_height",    self.tree_height)?;
        positive("tree_radius",    self.tree_radius)?;
        positive("scatter_radius", self.scatter_radius)?;
        positive("photo_scatter.half_width",  self.photo_scatter.half_width)?;
        positive("photo_scatter.half_height", self.photo_scatter.half_height)?;
        positive("photo_scatter.depth",       self.photo_scatter.depth)?;
        finite("photo_scatter.forward", self.photo_scatter.forward)?;
        positive("hover_scale", self.hover_scale)?;
        non_negative("particle_float", self.particle_float)?;
        non_negative("photo_float",    self.photo_float)?;
        if !self.anchor.is_finite() {
            return Err(invalid("anchor", format!("must be finite, got {}", self.anchor)));
        }
        self.smoothing.check().map_err(|r| invalid("smoothing", r))?;
        self.hover_smoothing.check().map_err(|r| invalid("hover_smoothing", r))?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> FormationError {
    FormationError::InvalidConfig { field, reason }
}

fn finite(field: &'static str, v: f32) -> Result<()> {
    if v.is_finite() { Ok(()) } else { Err(invalid(field, format!("must be finite, got {}", v))) }
}

fn positive(field: &'static str, v: f32) -> Result<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {}", v)))
    }
}

fn non_negative(field: &'static str, v: f32) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be non-negative, got {}", v)))
    }
}
