//! Static target poses for both layouts.
//!
//! Everything here is computed once per element, at creation.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::Rng;

use crate::config::PhotoScatterBox;
use crate::element::{facing_outward, Pose};

/// φ, the golden ratio.
pub const GOLDEN_RATIO: f32 = 1.618_034;

/// Angular step between consecutive photo cards.
pub const GOLDEN_ANGLE: f32 = TAU / GOLDEN_RATIO;

/// Extra clearance between the photo spiral and the ornament cone.
const PHOTO_CLEARANCE: f32 = 1.5;

/// Photo spiral only spans this share of the tree height.
const PHOTO_HEIGHT_SHARE: f32 = 0.8;

/// Spiral cone position of particle `i` out of `n`.
///
/// `yNorm = i / n` climbs from the base; the radius shrinks linearly to zero
/// at the top and the angle winds `0.15` rad per particle plus five extra
/// turns over the full height.
pub fn particle_tree_position(i: usize, n: usize, height: f32, radius: f32) -> Vec3 {
    if n == 0 {
        return Vec3::ZERO;
    }
    let y_norm = i as f32 / n as f32;
    let y      = (y_norm - 0.5) * height;
    let r      = (1.0 - y_norm) * radius;
    let angle  = i as f32 * 0.15 + y_norm * PI * 10.0;
    Vec3::new(angle.cos() * r, y, angle.sin() * r)
}

/// Uniform point inside a ball (cube-root radius, arccos latitude).
pub fn ball_point<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let theta = rng.random::<f32>() * TAU;
    let phi   = (rng.random::<f32>() * 2.0 - 1.0).clamp(-1.0, 1.0).acos();
    let r     = rng.random::<f32>().cbrt() * radius;
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Tree pose of photo `i` when `m` photos exist, facing out from the axis.
///
/// `m` is clamped to at least `i + 1`.
pub fn photo_tree_pose(i: usize, m: usize, height: f32, radius: f32) -> Pose {
    let m      = m.max(i + 1);
    let y_norm = (i + 1) as f32 / (m + 1) as f32;
    let y      = (y_norm - 0.5) * height * PHOTO_HEIGHT_SHARE;
    let r      = (1.0 - y_norm) * radius + PHOTO_CLEARANCE;
    let angle  = i as f32 * GOLDEN_ANGLE;
    let position = Vec3::new(angle.cos() * r, y, angle.sin() * r);
    Pose {
        position,
        // r >= PHOTO_CLEARANCE, so never on the axis
        orientation: facing_outward(position).unwrap_or_default(),
    }
}

/// Random point in the photo scatter box.
pub fn photo_scatter_position<R: Rng + ?Sized>(rng: &mut R, b: &PhotoScatterBox) -> Vec3 {
    Vec3::new(
        (rng.random::<f32>() - 0.5) * 2.0 * b.half_width,
        (rng.random::<f32>() - 0.5) * 2.0 * b.half_height,
        (rng.random::<f32>() - 0.5) * b.depth + b.forward,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn first_particle_sits_on_the_base_rim() {
        let p = particle_tree_position(0, 100, 15.0, 6.0);
        assert!((p.y + 7.5).abs() < 1e-6);
        assert!((Vec3::new(p.x, 0.0, p.z).length() - 6.0).abs() < 1e-5);
    }

    #[test]
    fn cone_narrows_upward() {
        let n = 500;
        let radius_at = |i| {
            let p = particle_tree_position(i, n, 15.0, 6.0);
            Vec3::new(p.x, 0.0, p.z).length()
        };
        assert!(radius_at(400) < radius_at(100));
        let top = particle_tree_position(n - 1, n, 15.0, 6.0);
        assert!(top.y < 7.5 && top.y > 7.0);
    }

    #[test]
    fn empty_population_does_not_divide_by_zero() {
        assert_eq!(particle_tree_position(0, 0, 15.0, 6.0), Vec3::ZERO);
        let pose = photo_tree_pose(0, 0, 15.0, 6.0);
        assert!(pose.position.is_finite());
    }

    #[test]
    fn ball_points_stay_inside() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            assert!(ball_point(&mut rng, 12.0).length() <= 12.0 + 1e-4);
        }
    }

    #[test]
    fn ball_is_volumetric_not_surface_biased() {
        // half the volume of a ball lies within radius R * 0.5^(1/3)
        let mut rng = StdRng::seed_from_u64(11);
        let inner = 12.0 * 0.5f32.cbrt();
        let total = 4000;
        let inside = (0..total).filter(|_| ball_point(&mut rng, 12.0).length() < inner).count();
        let share = inside as f32 / total as f32;
        assert!((share - 0.5).abs() < 0.05, "share {}", share);
    }

    #[test]
    fn first_photo_is_mid_height() {
        let pose = photo_tree_pose(0, 1, 15.0, 6.0);
        assert!(pose.position.y.abs() < 1e-6);
        let r = Vec3::new(pose.position.x, 0.0, pose.position.z).length();
        assert!((r - 4.5).abs() < 1e-5);
        // front faces away from the axis
        assert!((pose.orientation * Vec3::Z).distance(Vec3::X) < 1e-5);
    }

    #[test]
    fn photos_follow_the_golden_angle() {
        let a = photo_tree_pose(1, 3, 15.0, 6.0).position;
        let angle = a.z.atan2(a.x).rem_euclid(TAU);
        assert!((angle - GOLDEN_ANGLE.rem_euclid(TAU)).abs() < 1e-4);
    }

    #[test]
    fn photo_scatter_stays_in_box() {
        let b = PhotoScatterBox::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let p = photo_scatter_position(&mut rng, &b);
            assert!(p.x.abs() <= 7.5 && p.y.abs() <= 7.5);
            assert!((0.0..=10.0).contains(&p.z));
        }
    }
}
