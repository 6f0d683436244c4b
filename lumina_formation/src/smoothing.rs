//! Fixed-fraction easing toward a target.
//!
//! The default moves every value `alpha` of the remaining gap per frame,
//! regardless of how long the frame took: after `k` frames the residual is
//! `(1 - alpha)^k` of the initial gap. That couples convergence speed to the
//! frame rate. [`Smoothing::TimeScaled`] removes the coupling by stretching
//! the exponent with the elapsed time; at `reference_hz` the two agree.

use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Smoothing {
    /// Constant factor per call.
    PerFrame { alpha: f32 },
    /// `1 - (1 - alpha)^(dt * reference_hz)`.
    TimeScaled { alpha: f32, reference_hz: f32 },
}

impl Smoothing {
    pub const fn per_frame(alpha: f32) -> Self {
        Smoothing::PerFrame { alpha }
    }

    pub fn alpha(&self) -> f32 {
        match *self {
            Smoothing::PerFrame { alpha } | Smoothing::TimeScaled { alpha, .. } => alpha,
        }
    }

    /// Interpolation factor for a frame lasting `dt` seconds, in `[0, 1]`.
    pub fn factor(&self, dt: f32) -> f32 {
        match *self {
            Smoothing::PerFrame { alpha } => alpha.clamp(0.0, 1.0),
            Smoothing::TimeScaled { alpha, reference_hz } => {
                let frames = (dt * reference_hz).max(0.0);
                (1.0 - (1.0 - alpha.clamp(0.0, 1.0)).powf(frames)).clamp(0.0, 1.0)
            }
        }
    }

    pub fn approach(&self, current: Vec3, target: Vec3, dt: f32) -> Vec3 {
        current.lerp(target, self.factor(dt))
    }

    pub fn approach_scalar(&self, current: f32, target: f32, dt: f32) -> f32 {
        current + (target - current) * self.factor(dt)
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        let alpha = self.alpha();
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(format!("alpha must be in (0, 1], got {}", alpha));
        }
        if let Smoothing::TimeScaled { reference_hz, .. } = *self {
            if !(reference_hz.is_finite() && reference_hz > 0.0) {
                return Err(format!("reference_hz must be positive, got {}", reference_hz));
            }
        }
        Ok(())
    }
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::per_frame(0.05)
    }
}
