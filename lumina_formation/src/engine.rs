//! The formation engine: element arena, per-frame advance and instance export.

use glam::{Mat4, Vec3};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::FormationConfig;
use crate::element::{facing, facing_outward, ElementId, ElementKind, PhotoRef, Pose, VisualElement};
use crate::error::{FormationError, Result};
use crate::layout;
use crate::palette::Color;

/// Share of particles that are gold cubes.
const CUBE_SHARE: f64 = 0.3;
/// Share of spheres that are red (the rest are green).
const RED_SHARE: f64 = 0.4;
/// Photo cards are 2×2 planes.
const PHOTO_SCALE: Vec3 = Vec3::new(2.0, 2.0, 1.0);
/// Salt for per-photo random streams.
const PHOTO_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

// ════════════════════════════════════════════════════════════════════════════
// Inputs and outputs
// ════════════════════════════════════════════════════════════════════════════

/// Which target pose is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Layout {
    #[default]
    Tree,
    Scatter,
}

/// Everything one frame of [`FormationEngine::advance`] needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    pub layout:     Layout,
    /// Seconds since start; drives the floating bob.
    pub time:       f32,
    /// Seconds since the previous frame.
    pub dt:         f32,
    /// World-space camera position, for camera-facing cards.
    pub camera_eye: Vec3,
}

/// Flat per-kind buffers for instanced rendering.
///
/// `transforms[i]` and `colors[i]` describe the same element; order is
/// creation order and never changes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstanceBatch {
    pub transforms: Vec<Mat4>,
    pub colors:     Vec<Color>,
}

impl InstanceBatch {
    pub fn len(&self) -> usize     { self.transforms.len() }
    pub fn is_empty(&self) -> bool { self.transforms.is_empty() }
}

/// A photo card and the picture it shows.
#[derive(Clone, Debug, PartialEq)]
pub struct PhotoCard {
    pub element: ElementId,
    pub source:  PhotoRef,
}

// ════════════════════════════════════════════════════════════════════════════
// FormationEngine
// ════════════════════════════════════════════════════════════════════════════

pub struct FormationEngine {
    config:   FormationConfig,
    elements: Vec<VisualElement>,
    /// Arena ids per kind, in export order.
    by_kind:  [Vec<ElementId>; 3],
    photos:   Vec<PhotoCard>,
    hovered:  Option<ElementId>,
    batches:  [InstanceBatch; 3],
}

impl FormationEngine {
    /// Build the particle population. Photo cards are added later.
    pub fn new(config: FormationConfig) -> Result<Self> {
        config.validate()?;

        let mut engine = FormationEngine {
            elements: Vec::with_capacity(config.particle_count),
            by_kind:  Default::default(),
            photos:   Vec::new(),
            hovered:  None,
            batches:  Default::default(),
            config,
        };

        let n = engine.config.particle_count;
        let mut rng = StdRng::seed_from_u64(engine.config.seed);
        for i in 0..n {
            let tree = Pose::at(layout::particle_tree_position(
                i, n, engine.config.tree_height, engine.config.tree_radius,
            ));
            let scatter = Pose::at(layout::ball_point(&mut rng, engine.config.scatter_radius));

            let (kind, color) = if rng.random_bool(CUBE_SHARE) {
                (ElementKind::Cube, Color::GOLD)
            } else if rng.random_bool(RED_SHARE) {
                (ElementKind::Sphere, Color::RED)
            } else {
                (ElementKind::Sphere, Color::GREEN)
            };
            let scale = rng.random_range(0.1f32..0.4);

            engine.insert(VisualElement {
                id:           ElementId(engine.elements.len()),
                kind,
                tree,
                scatter,
                current:      tree,
                base_scale:   Vec3::splat(scale),
                hover_factor: 1.0,
                color,
                phase:        i as f32,
                float_amp:    engine.config.particle_float,
            });
        }

        debug!(
            "formation: {} particles ({} cubes, {} spheres)",
            n,
            engine.by_kind[ElementKind::Cube.slot()].len(),
            engine.by_kind[ElementKind::Sphere.slot()].len(),
        );
        Ok(engine)
    }

    /// Add one photo card, spread as the last of `photo_count() + 1`.
    pub fn append_photo(&mut self, source: PhotoRef) -> ElementId {
        let total = self.photos.len() + 1;
        self.push_photo(source, total)
    }

    /// Add a batch of photo cards, spread evenly over the photo count the
    /// batch ends with.
    ///
    /// Tree poses only depend on the card's index and that count, and scatter
    /// poses come from a random stream derived from `(seed, photo index)`, so
    /// the result is deterministic and no existing card moves.
    pub fn append_photos<I>(&mut self, sources: I) -> Vec<ElementId>
    where
        I: IntoIterator<Item = PhotoRef>,
    {
        let sources: Vec<PhotoRef> = sources.into_iter().collect();
        let total = self.photos.len() + sources.len();
        sources.into_iter().map(|s| self.push_photo(s, total)).collect()
    }

    fn push_photo(&mut self, source: PhotoRef, total: usize) -> ElementId {
        let i = self.photos.len();
        let tree = layout::photo_tree_pose(
            i, total, self.config.tree_height, self.config.tree_radius,
        );

        let stream = self.config.seed ^ (i as u64 + 1).wrapping_mul(PHOTO_STREAM);
        let mut rng = StdRng::seed_from_u64(stream);
        let scatter = Pose {
            position:    layout::photo_scatter_position(&mut rng, &self.config.photo_scatter),
            orientation: tree.orientation,
        };

        let id = ElementId(self.elements.len());
        self.insert(VisualElement {
            id,
            kind:         ElementKind::Photo,
            tree,
            scatter,
            current:      tree,
            base_scale:   PHOTO_SCALE,
            hover_factor: 1.0,
            color:        Color::GOLD,
            phase:        i as f32,
            float_amp:    self.config.photo_float,
        });
        debug!("photo {} appended as {} ({})", i, id, source);
        self.photos.push(PhotoCard { element: id, source });
        id
    }

    fn insert(&mut self, element: VisualElement) {
        let slot = element.kind.slot();
        let batch = &mut self.batches[slot];
        batch.transforms.push(element.transform(self.config.anchor, 0.0));
        batch.colors.push(element.color);
        self.by_kind[slot].push(element.id);
        self.elements.push(element);
    }

    /// Grow `id` toward the hover scale; everything else relaxes to 1×.
    pub fn set_hovered(&mut self, id: Option<ElementId>) -> Result<()> {
        if let Some(id) = id {
            if id.0 >= self.elements.len() {
                return Err(FormationError::UnknownElement(id));
            }
        }
        self.hovered = id;
        Ok(())
    }

    pub fn hovered(&self) -> Option<ElementId> { self.hovered }

    // ── Per-frame advance ────────────────────────────────────────────────

    /// Move every element one step toward its active target and refresh the
    /// instance batches.
    pub fn advance(&mut self, input: &FrameInput) {
        let FormationEngine { config, elements, by_kind, hovered, batches, .. } = self;

        let anchor = config.anchor;

        for (ids, batch) in by_kind.iter().zip(batches.iter_mut()) {
            for (slot, id) in ids.iter().enumerate() {
                let el = &mut elements[id.0];

                let target = match input.layout {
                    Layout::Tree    => el.tree.position,
                    Layout::Scatter => el.scatter.position,
                };
                el.current.position = config.smoothing.approach(el.current.position, target, input.dt);

                let world = anchor + el.current.position + el.bob(input.time);
                let facing_now = match input.layout {
                    Layout::Scatter => facing(input.camera_eye - world),
                    Layout::Tree    => facing_outward(el.current.position),
                };
                if let Some(q) = facing_now {
                    el.current.orientation = q;
                }

                let grow = if *hovered == Some(el.id) { config.hover_scale } else { 1.0 };
                el.hover_factor = config.hover_smoothing.approach_scalar(el.hover_factor, grow, input.dt);

                batch.transforms[slot] = el.transform(anchor, input.time);
            }
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &FormationConfig      { &self.config }
    pub fn elements(&self) -> &[VisualElement]    { &self.elements }
    pub fn photos(&self) -> &[PhotoCard]          { &self.photos }
    pub fn len(&self) -> usize                    { self.elements.len() }
    pub fn is_empty(&self) -> bool                { self.elements.is_empty() }
    pub fn particle_count(&self) -> usize         { self.config.particle_count }
    pub fn photo_count(&self) -> usize            { self.photos.len() }

    pub fn element(&self, id: ElementId) -> Option<&VisualElement> {
        self.elements.get(id.0)
    }

    pub fn batch(&self, kind: ElementKind) -> &InstanceBatch {
        &self.batches[kind.slot()]
    }

    /// Ids of one kind, in export order.
    pub fn ids(&self, kind: ElementKind) -> &[ElementId] {
        &self.by_kind[kind.slot()]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smoothing::Smoothing;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const EYE: Vec3 = Vec3::new(0.0, 0.0, 25.0);

    fn engine(particles: usize) -> FormationEngine {
        FormationEngine::new(FormationConfig { particle_count: particles, ..Default::default() })
            .unwrap()
    }

    fn frame(layout: Layout, time: f32) -> FrameInput {
        FrameInput { layout, time, dt: 1.0 / 60.0, camera_eye: EYE }
    }

    fn run(e: &mut FormationEngine, layout: Layout, frames: usize) {
        for f in 0..frames {
            e.advance(&frame(layout, f as f32 / 60.0));
        }
    }

    #[test]
    fn empty_engine_exports_nothing_every_frame() {
        let mut e = engine(0);
        for layout in [Layout::Tree, Layout::Scatter, Layout::Tree] {
            run(&mut e, layout, 5);
            for kind in ElementKind::ALL {
                assert!(e.batch(kind).is_empty());
                assert!(e.batch(kind).colors.is_empty());
            }
        }
        assert!(e.is_empty());
    }

    #[test]
    fn batches_match_live_counts() {
        let mut e = engine(300);
        e.append_photos((0..4).map(|i| PhotoRef::new(format!("p{}.jpg", i))));
        run(&mut e, Layout::Tree, 2);
        let spheres = e.batch(ElementKind::Sphere).len();
        let cubes   = e.batch(ElementKind::Cube).len();
        assert_eq!(spheres + cubes, 300);
        assert_eq!(e.batch(ElementKind::Photo).len(), 4);
        for kind in ElementKind::ALL {
            assert_eq!(e.batch(kind).colors.len(), e.ids(kind).len());
        }
    }

    #[test]
    fn kind_and_color_mix() {
        let e = engine(4000);
        let cubes = e.ids(ElementKind::Cube).len() as f32 / 4000.0;
        assert!((cubes - 0.3).abs() < 0.03, "cube share {}", cubes);

        let spheres = e.ids(ElementKind::Sphere);
        let red = spheres
            .iter()
            .filter(|id| e.element(**id).unwrap().color() == Color::RED)
            .count() as f32 / spheres.len() as f32;
        assert!((red - 0.4).abs() < 0.04, "red share {}", red);

        for id in e.ids(ElementKind::Cube) {
            assert_eq!(e.element(*id).unwrap().color(), Color::GOLD);
        }
    }

    #[test]
    fn elements_start_at_their_tree_pose() {
        let e = engine(50);
        for el in e.elements() {
            assert_eq!(el.current_pose().position, el.tree_pose().position);
        }
    }

    #[test]
    fn scatter_then_tree_converges() {
        let mut e = engine(200);
        e.append_photo(PhotoRef::new("a.jpg"));
        run(&mut e, Layout::Scatter, 400);
        for el in e.elements() {
            assert!(el.current_pose().position.distance(el.scatter_pose().position) < 0.01);
        }
        run(&mut e, Layout::Tree, 400);
        for el in e.elements() {
            assert!(el.current_pose().position.distance(el.tree_pose().position) < 0.01);
        }
    }

    #[test]
    fn one_frame_moves_five_percent() {
        let mut e = engine(20);
        let el = &e.elements()[3];
        let (start, goal) = (el.tree_pose().position, el.scatter_pose().position);
        e.advance(&frame(Layout::Scatter, 0.0));
        let expected = start + (goal - start) * 0.05;
        assert!(e.elements()[3].current_pose().position.distance(expected) < 1e-5);
    }

    #[test]
    fn bob_does_not_accumulate_into_the_pose() {
        let mut e = engine(10);
        run(&mut e, Layout::Tree, 120);
        for el in e.elements() {
            assert!(el.current_pose().position.distance(el.tree_pose().position) < 1e-5);
        }
    }

    #[test]
    fn exported_translation_includes_anchor_and_bob() {
        let mut e = engine(5);
        let t = 1.3;
        e.advance(&frame(Layout::Tree, t));
        let el = &e.elements()[2];
        let slot = e.ids(el.kind()).iter().position(|id| *id == el.id()).unwrap();
        let m = e.batch(el.kind()).transforms[slot];
        let expected = Vec3::new(0.0, -5.0, 0.0)
            + el.tree_pose().position
            + Vec3::Y * (t + 2.0).sin() * 0.02;
        assert!(m.w_axis.truncate().distance(expected) < 1e-5);
    }

    #[test]
    fn photos_face_camera_when_scattered_and_outward_on_the_tree() {
        let mut e = engine(0);
        let id = e.append_photo(PhotoRef::new("a.jpg"));

        run(&mut e, Layout::Tree, 3);
        let el = e.element(id).unwrap();
        let p = el.current_pose().position;
        let out = Vec3::new(p.x, 0.0, p.z).normalize();
        assert!((el.current_pose().orientation * Vec3::Z).distance(out) < 1e-4);

        run(&mut e, Layout::Scatter, 3);
        let el = e.element(id).unwrap();
        let m = e.batch(ElementKind::Photo).transforms[0];
        let to_eye = (EYE - m.w_axis.truncate()).normalize();
        assert!((el.current_pose().orientation * Vec3::Z).distance(to_eye) < 1e-4);
    }

    #[test]
    fn hover_grows_and_relaxes() {
        let mut e = engine(0);
        let id = e.append_photo(PhotoRef::new("a.jpg"));
        e.set_hovered(Some(id)).unwrap();
        run(&mut e, Layout::Tree, 200);
        let s = e.element(id).unwrap().scale();
        assert!((s.x - 3.0).abs() < 1e-3, "hovered scale {}", s);

        e.set_hovered(None).unwrap();
        run(&mut e, Layout::Tree, 200);
        assert!((e.element(id).unwrap().scale().x - 2.0).abs() < 1e-3);
    }

    #[test]
    fn initial_photo_batch_spans_the_tree() {
        let mut e = engine(0);
        let ids = e.append_photos((0..4).map(|i| PhotoRef::new(format!("p{}.jpg", i))));
        let ys: Vec<f32> = ids
            .iter()
            .map(|id| e.element(*id).unwrap().tree_pose().position.y)
            .collect();
        for (y, want) in ys.iter().zip([-3.6, -1.2, 1.2, 3.6]) {
            assert!((y - want).abs() < 1e-4, "photo heights {:?}", ys);
        }
        assert!(ys[0] < 0.0 && ys[3] > 0.0);
    }

    #[test]
    fn single_append_is_last_of_the_new_total() {
        let mut e = engine(0);
        e.append_photos((0..3).map(|i| PhotoRef::new(format!("p{}.jpg", i))));
        let id = e.append_photo(PhotoRef::new("late.jpg"));
        let expected = layout::photo_tree_pose(3, 4, 15.0, 6.0);
        assert_eq!(*e.element(id).unwrap().tree_pose(), expected);
    }

    #[test]
    fn frame_step_follows_the_configured_smoothing() {
        let cfg = FormationConfig {
            particle_count:  20,
            smoothing:       Smoothing::TimeScaled { alpha: 0.05, reference_hz: 60.0 },
            ..Default::default()
        };
        let mut e = FormationEngine::new(cfg).unwrap();
        let el = &e.elements()[5];
        let (start, goal) = (el.tree_pose().position, el.scatter_pose().position);
        // two reference frames in one step
        e.advance(&FrameInput { layout: Layout::Scatter, time: 0.0, dt: 2.0 / 60.0, camera_eye: EYE });
        let expected = start + (goal - start) * (1.0 - 0.95f32 * 0.95);
        assert!(e.elements()[5].current_pose().position.distance(expected) < 1e-4);
    }

    #[test]
    fn hover_never_overshoots() {
        let mut e = engine(0);
        let id = e.append_photo(PhotoRef::new("a.jpg"));
        e.set_hovered(Some(id)).unwrap();
        let mut last = e.element(id).unwrap().scale().x;
        for f in 0..300 {
            e.advance(&frame(Layout::Tree, f as f32 / 60.0));
            let s = e.element(id).unwrap().scale().x;
            assert!(s >= last - 1e-6 && s <= 3.0 + 1e-5, "scale {} after {}", s, last);
            last = s;
        }
    }

    #[test]
    fn hovering_unknown_element_is_an_error() {
        let mut e = engine(3);
        assert_eq!(
            e.set_hovered(Some(ElementId(99))),
            Err(FormationError::UnknownElement(ElementId(99)))
        );
        assert_eq!(e.hovered(), None);
    }

    #[test]
    fn same_seed_same_population() {
        let a = engine(100);
        let b = engine(100);
        assert_eq!(a.elements(), b.elements());
    }

    #[test]
    fn photo_poses_do_not_depend_on_particles() {
        let mut a = engine(0);
        let mut b = engine(250);
        let pa = a.append_photo(PhotoRef::new("x"));
        let pb = b.append_photo(PhotoRef::new("x"));
        let (ea, eb) = (a.element(pa).unwrap(), b.element(pb).unwrap());
        assert_eq!(ea.tree_pose(), eb.tree_pose());
        assert_eq!(ea.scatter_pose(), eb.scatter_pose());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = FormationConfig { scatter_radius: -1.0, ..Default::default() };
        assert!(matches!(
            FormationEngine::new(cfg),
            Err(FormationError::InvalidConfig { field: "scatter_radius", .. })
        ));
    }

    proptest! {
        #[test]
        fn appending_never_moves_existing_cards(existing in 0usize..12, more in 1usize..6) {
            let mut e = engine(0);
            let ids = e.append_photos((0..existing).map(|i| PhotoRef::new(format!("{}", i))));
            let before: Vec<(Pose, Pose)> = ids
                .iter()
                .map(|id| {
                    let el = e.element(*id).unwrap();
                    (*el.tree_pose(), *el.scatter_pose())
                })
                .collect();

            e.append_photos((0..more).map(|i| PhotoRef::new(format!("new{}", i))));

            for (id, (tree, scatter)) in ids.iter().zip(before) {
                let el = e.element(*id).unwrap();
                prop_assert_eq!(*el.tree_pose(), tree);
                prop_assert_eq!(*el.scatter_pose(), scatter);
            }
            prop_assert_eq!(e.photo_count(), existing + more);
        }
    }
}
