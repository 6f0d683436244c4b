//! Software-rendered viewer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                                                          │
//! │            particles + photo cards, projected            │
//! │            through the camera rig, far to near           │
//! │                                                          │
//! ├──────────────────────────────────────────────────────────┤
//! │  status bar: mode, gesture, hand, photos                 │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Each instance is drawn as a flat sprite sized by its transform's scale:
//! spheres as discs, cubes as squares, photo cards as gold-framed tiles.

use std::cmp::Ordering;
use std::sync::mpsc::Sender;

use glam::{Mat4, Vec2};
use lumina_formation::{Color, ElementKind, FormationEngine};
use lumina_gesture::HandShape;
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use crate::camera::CameraRig;
use crate::error::AppError;
use crate::source::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:    usize = 960;
pub const WIN_H:    usize = 640;
const STATUS_Y:     usize = WIN_H - 36;
const VIEW_H:       usize = STATUS_Y;
const BG_COLOR:     u32   = 0xFF050505;
const TEXT_BG:      u32   = 0xFF101C14;
const PHOTO_FILL:   u32   = 0xFFEDE6D6;
const FOV_Y:        f32   = std::f32::consts::FRAC_PI_4;
const NEAR:         f32   = 0.1;
const FAR:          f32   = 200.0;
/// Depth at which sprites start fading into the background.
const FOG_START:    f32   = 12.0;
const FOG_RANGE:    f32   = 40.0;
const FOG_MAX:      f32   = 0.7;
/// Photo frame thickness as a share of the card's half-width.
const FRAME_SHARE:  f32   = 0.12;

const LEGEND: &str =
    "F=fist  O=open  P=pinch  R=relax  H=hand  mouse=palm  A=add photo  Tab=hover  Q=quit";

/// Non-gesture commands from the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerAction {
    AddPhoto,
    CycleHover,
    Quit,
}

/// One projected instance.
struct Sprite {
    x:     f32,
    y:     f32,
    depth: f32,
    half:  f32,
    color: u32,
    kind:  ElementKind,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:     Window,
    buf:        Vec<u32>,
    sim_tx:     Sender<SimInput>,
    last_mouse: Option<(f32, f32)>,
    sprites:    Vec<Sprite>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, AppError> {
        let mut window = Window::new(
            "Lumina Noel",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
            last_mouse: None,
            sprites: Vec::new(),
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard and mouse. Hand keys go to the simulator; everything
    /// else comes back as [`ViewerAction`]s.
    pub fn poll_input(&mut self) -> Vec<ViewerAction> {
        let mut actions = Vec::new();
        if !self.window.is_open() {
            actions.push(ViewerAction::Quit);
            return actions;
        }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            actions.push(ViewerAction::Quit);
            return actions;
        }

        for (key, shape) in [
            (Key::F, HandShape::Fist),
            (Key::O, HandShape::Open),
            (Key::P, HandShape::Pinch),
            (Key::R, HandShape::Relaxed),
        ] {
            if one_shot(key) {
                let _ = self.sim_tx.send(SimInput::Shape(shape));
            }
        }
        if one_shot(Key::H) {
            let _ = self.sim_tx.send(SimInput::ToggleHand);
        }
        if one_shot(Key::A) {
            actions.push(ViewerAction::AddPhoto);
        }
        if one_shot(Key::Tab) {
            actions.push(ViewerAction::CycleHover);
        }

        // Mouse over the scene steers the palm (already in mirrored space)
        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let moved = self
                .last_mouse
                .map_or(true, |(lx, ly)| (lx - mx).abs() >= 1.0 || (ly - my).abs() >= 1.0);
            if moved {
                self.last_mouse = Some((mx, my));
                let palm = Vec2::new(mx / WIN_W as f32, (my / VIEW_H as f32).min(1.0));
                let _ = self.sim_tx.send(SimInput::Palm(palm));
            }
        }

        actions
    }

    /// Render one frame.
    pub fn render(&mut self, engine: &FormationEngine, rig: &CameraRig, status: &str) {
        // Clear
        self.buf.fill(BG_COLOR);

        // ── Scene ─────────────────────────────────────────────────────────
        self.project(engine, rig);
        let mut sprites = std::mem::take(&mut self.sprites);
        // far to near
        sprites.sort_by(|a, b| b.depth.partial_cmp(&a.depth).unwrap_or(Ordering::Equal));
        for s in &sprites {
            self.draw_sprite(s);
        }
        self.sprites = sprites;

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, WIN_H - STATUS_Y, TEXT_BG);
        self.draw_label(status, 10, STATUS_Y + 10, 0xFFEEEEEE);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(LEGEND, 10, WIN_H - 16, 0xFF888888);

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Projection ────────────────────────────────────────────────────────

    fn project(&mut self, engine: &FormationEngine, rig: &CameraRig) {
        let aspect = WIN_W as f32 / VIEW_H as f32;
        let view_proj = Mat4::perspective_rh(FOV_Y, aspect, NEAR, FAR) * rig.view();
        // pixels per world unit at distance 1
        let focal = VIEW_H as f32 * 0.5 / (FOV_Y * 0.5).tan();

        self.sprites.clear();
        for kind in ElementKind::ALL {
            let batch = engine.batch(kind);
            for (m, color) in batch.transforms.iter().zip(&batch.colors) {
                let clip = view_proj * m.w_axis;
                if clip.w <= NEAR {
                    continue;
                }
                let ndc = clip.truncate() / clip.w;
                if ndc.x.abs() > 1.2 || ndc.y.abs() > 1.2 {
                    continue;
                }
                let fog = ((clip.w - FOG_START) / FOG_RANGE).clamp(0.0, FOG_MAX);
                self.sprites.push(Sprite {
                    x:     (ndc.x + 1.0) * 0.5 * WIN_W as f32,
                    y:     (1.0 - ndc.y) * 0.5 * VIEW_H as f32,
                    depth: clip.w,
                    half:  (m.x_axis.truncate().length() * 0.5 * focal / clip.w).max(1.0),
                    color: color.blend(Color(BG_COLOR & 0x00FF_FFFF), fog).to_argb(),
                    kind,
                });
            }
        }
    }

    fn draw_sprite(&mut self, s: &Sprite) {
        let (cx, cy) = (s.x as isize, s.y as isize);
        let half = s.half.round() as isize;
        match s.kind {
            ElementKind::Sphere => fill_disc(&mut self.buf, cx, cy, half, s.color),
            ElementKind::Cube   => self.fill_square(cx, cy, half, s.color),
            ElementKind::Photo  => {
                let inner = half - ((s.half * FRAME_SHARE).ceil() as isize).max(1);
                self.fill_square(cx, cy, half, s.color);
                self.fill_square(cx, cy, inner, PHOTO_FILL);
            }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    /// Square centred on `(cx, cy)`, clipped to the scene area.
    fn fill_square(&mut self, cx: isize, cy: isize, half: isize, color: u32) {
        if half < 0 { return; }
        let x0 = (cx - half).max(0);
        let y0 = (cy - half).max(0);
        let x1 = (cx + half).min(WIN_W as isize - 1);
        let y1 = (cy + half).min(VIEW_H as isize - 1);
        for row in y0..=y1 {
            for col in x0..=x1 {
                self.buf[row as usize * WIN_W + col as usize] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    /// Minimal bitmap font, 3×5 per character.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > WIN_W { break; }
        }
    }
}

/// Disc centred on `(cx, cy)`, clipped to the scene area. Only visible rows
/// and chord spans are visited, so huge near-camera sprites stay cheap.
fn fill_disc(buf: &mut [u32], cx: isize, cy: isize, r: isize, color: u32) {
    if r < 0 { return; }
    let y0 = (cy - r).max(0);
    let y1 = (cy + r).min(VIEW_H as isize - 1);
    for y in y0..=y1 {
        let dy = y - cy;
        let span = ((r * r - dy * dy) as f64).sqrt() as isize;
        let x0 = (cx - span).max(0);
        let x1 = (cx + span).min(WIN_W as isize - 1);
        for x in x0..=x1 {
            buf[y as usize * WIN_W + x as usize] = color;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}
