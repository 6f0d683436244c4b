//! Visual elements and their poses.

use std::fmt;

use glam::{Mat3, Mat4, Quat, Vec3};

use crate::palette::Color;

// ════════════════════════════════════════════════════════════════════════════
// Identity and kind
// ════════════════════════════════════════════════════════════════════════════

/// Index of an element in the engine's arena. Stable for the engine's
/// lifetime; elements are never removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Sphere,
    Cube,
    Photo,
}

impl ElementKind {
    pub const ALL: [ElementKind; 3] = [ElementKind::Sphere, ElementKind::Cube, ElementKind::Photo];

    /// Position in [`ElementKind::ALL`].
    pub fn slot(self) -> usize {
        match self {
            ElementKind::Sphere => 0,
            ElementKind::Cube   => 1,
            ElementKind::Photo  => 2,
        }
    }
}

/// Opaque reference to a user photo (URL or path). The engine never loads it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PhotoRef(String);

impl PhotoRef {
    pub fn new(reference: impl Into<String>) -> Self {
        PhotoRef(reference.into())
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Pose
// ════════════════════════════════════════════════════════════════════════════

/// Position and orientation, relative to the formation anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position:    Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub fn at(position: Vec3) -> Self {
        Pose { position, orientation: Quat::IDENTITY }
    }
}

/// Rotation taking local +Z onto `dir` with +Y kept as close to up as
/// possible. `None` when `dir` is zero or vertical.
pub fn facing(dir: Vec3) -> Option<Quat> {
    let z = dir.try_normalize()?;
    let x = Vec3::Y.cross(z).try_normalize()?;
    let y = z.cross(x);
    Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize())
}

/// Front turned away from the vertical axis at the same height. `None` on
/// the axis itself.
pub fn facing_outward(position: Vec3) -> Option<Quat> {
    facing(Vec3::new(position.x, 0.0, position.z))
}

// ════════════════════════════════════════════════════════════════════════════
// VisualElement
// ════════════════════════════════════════════════════════════════════════════

/// One particle or photo card.
///
/// `tree` and `scatter` are fixed at creation; only `current` and the hover
/// scale factor move.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualElement {
    pub(crate) id:           ElementId,
    pub(crate) kind:         ElementKind,
    pub(crate) tree:         Pose,
    pub(crate) scatter:      Pose,
    pub(crate) current:      Pose,
    pub(crate) base_scale:   Vec3,
    pub(crate) hover_factor: f32,
    pub(crate) color:        Color,
    /// Phase of the floating bob (the element's index within its group).
    pub(crate) phase:        f32,
    pub(crate) float_amp:    f32,
}

impl VisualElement {
    pub fn id(&self) -> ElementId        { self.id }
    pub fn kind(&self) -> ElementKind    { self.kind }
    pub fn tree_pose(&self) -> &Pose     { &self.tree }
    pub fn scatter_pose(&self) -> &Pose  { &self.scatter }
    pub fn current_pose(&self) -> &Pose  { &self.current }
    pub fn color(&self) -> Color         { self.color }
    pub fn base_scale(&self) -> Vec3     { self.base_scale }

    /// Current scale including any hover growth.
    pub fn scale(&self) -> Vec3 {
        self.base_scale * self.hover_factor
    }

    /// Vertical offset layered on top of the interpolated position.
    pub fn bob(&self, time: f32) -> Vec3 {
        Vec3::Y * ((time + self.phase).sin() * self.float_amp)
    }

    /// World-space model matrix.
    pub fn transform(&self, anchor: Vec3, time: f32) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale(),
            self.current.orientation,
            anchor + self.current.position + self.bob(time),
        )
    }
}
