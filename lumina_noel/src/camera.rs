//! Camera framing per mode.
//!
//! The controller only computes where the camera should be and eases toward
//! it; the rendering host owns the actual camera.

use glam::{Mat4, Vec3};
use lumina_formation::Smoothing;
use lumina_gesture::HandFrame;

use crate::mode::AppMode;

pub const TREE_EYE: Vec3 = Vec3::new(0.0, 0.0, 25.0);
pub const ZOOM_EYE: Vec3 = Vec3::new(0.0, 0.0, 8.0);
const SCATTER_DISTANCE: f32 = 20.0;
const SWAY_AMPLITUDE:   f32 = 10.0;
const SWAY_RATE:        f32 = 0.1;
/// Camera travel for a palm moving across the full frame.
const PALM_SWING_X:     f32 = 20.0;
const PALM_SWING_Y:     f32 = 10.0;

/// Live camera pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRig {
    pub eye:     Vec3,
    pub look_at: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        CameraRig { eye: TREE_EYE, look_at: Vec3::ZERO }
    }
}

impl CameraRig {
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.look_at, Vec3::Y)
    }
}

#[derive(Debug)]
pub struct CameraController {
    smoothing: Smoothing,
    rig:       CameraRig,
}

impl CameraController {
    pub fn new(smoothing: Smoothing) -> Self {
        CameraController { smoothing, rig: CameraRig::default() }
    }

    pub fn rig(&self) -> CameraRig { self.rig }

    /// Where the camera wants to be this frame.
    pub fn target(mode: AppMode, hand: &HandFrame, time: f32) -> Vec3 {
        match mode {
            AppMode::Tree => TREE_EYE,
            AppMode::Zoom => ZOOM_EYE,
            AppMode::Scatter => {
                let sway = (time * SWAY_RATE).sin() * SWAY_AMPLITUDE;
                let (rot_x, rot_y) = if hand.is_present() {
                    let palm = hand.palm_position();
                    ((palm.x - 0.5) * PALM_SWING_X, (palm.y - 0.5) * PALM_SWING_Y)
                } else {
                    (0.0, 0.0)
                };
                Vec3::new(sway + rot_x, rot_y, SCATTER_DISTANCE)
            }
        }
    }

    /// Ease toward this frame's target; always looks at the origin.
    pub fn update(&mut self, mode: AppMode, hand: &HandFrame, time: f32, dt: f32) -> CameraRig {
        let target = Self::target(mode, hand, time);
        self.rig.eye = self.smoothing.approach(self.rig.eye, target, dt);
        self.rig.look_at = Vec3::ZERO;
        self.rig
    }
}
