//! Top-level application state.
//!
//! `AppState` owns the formation engine, the mode machine, the camera and the
//! reading end of the hand mailbox. Each frame it picks up the latest hand,
//! classifies it if it is new, moves the camera and advances the formation.

use std::io::{self, BufReader};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, error, info, warn};
use lumina_formation::{
    ElementId, ElementKind, FormationConfig, FormationEngine, FrameInput, PhotoRef, Smoothing,
};
use lumina_gesture::{classify_with, ClassifierThresholds, Gesture, HandFrame};

use crate::camera::{CameraController, CameraRig};
use crate::error::AppError;
use crate::mailbox::{hand_slot, HandReader};
use crate::mode::{AppMode, ModeMachine};
use crate::source::{
    spawn_detector_process, spawn_landmark_source, JsonLinesSource, SimHandSource, SimInput,
    SourceHandle,
};
use crate::visualizer::{ViewerAction, Visualizer};

/// Photos shown when the user supplies none.
pub const DEFAULT_PHOTOS: [&str; 4] = [
    "https://picsum.photos/id/102/300/300",
    "https://picsum.photos/id/106/300/300",
    "https://picsum.photos/id/235/300/300",
    "https://picsum.photos/id/238/300/300",
];

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Where hand landmarks come from.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceKind {
    /// Keyboard and mouse in the viewer window.
    Simulated,
    /// JSON lines on our own stdin.
    Stdin,
    /// JSON lines from a detector process we start.
    Command(Vec<String>),
}

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub formation:        FormationConfig,
    pub thresholds:       ClassifierThresholds,
    pub camera_smoothing: Smoothing,
    pub photos:           Vec<PhotoRef>,
    pub source:           SourceKind,
    /// Detector hands scoring below this are ignored.
    pub min_confidence:   f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            formation:        FormationConfig::default(),
            thresholds:       ClassifierThresholds::default(),
            camera_smoothing: Smoothing::per_frame(0.05),
            photos:           DEFAULT_PHOTOS.iter().map(|p| PhotoRef::new(*p)).collect(),
            source:           SourceKind::Simulated,
            min_confidence:   0.5,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── scene ─────────────────────────────────────────────────────────────
    formation:  FormationEngine,
    camera:     CameraController,

    // ── hand input ────────────────────────────────────────────────────────
    hand:       HandReader,
    last_seq:   u64,
    frame:      Arc<HandFrame>,
    thresholds: ClassifierThresholds,
    modes:      ModeMachine,

    /// Demo photos appended from the keyboard so far.
    added:      usize,

    pub status: String,
}

impl AppState {
    pub fn new(cfg: &AppConfig, hand: HandReader) -> Result<Self, AppError> {
        let mut formation = FormationEngine::new(cfg.formation.clone())?;
        formation.append_photos(cfg.photos.iter().cloned());

        let mut app = AppState {
            formation,
            camera:     CameraController::new(cfg.camera_smoothing),
            hand,
            last_seq:   0,
            frame:      Arc::new(HandFrame::absent()),
            thresholds: cfg.thresholds,
            modes:      ModeMachine::new(),
            added:      0,
            status:     String::new(),
        };
        app.refresh_status();
        Ok(app)
    }

    /// Advance one frame. `time` is seconds since start, `dt` the frame length.
    pub fn tick(&mut self, time: f32, dt: f32) {
        let sample = self.hand.latest();
        if sample.seq != self.last_seq {
            self.last_seq = sample.seq;
            let gesture = classify_with(sample.frame.landmarks(), &self.thresholds);
            self.modes.observe(gesture);
            self.frame = sample.frame;
        }

        let mode = self.modes.mode();
        let rig = self.camera.update(mode, &self.frame, time, dt);
        self.formation.advance(&FrameInput {
            layout:     mode.layout(),
            time,
            dt,
            camera_eye: rig.eye,
        });
        self.refresh_status();
    }

    pub fn handle_action(&mut self, action: ViewerAction) {
        match action {
            ViewerAction::AddPhoto => {
                let source = DEFAULT_PHOTOS[self.added % DEFAULT_PHOTOS.len()];
                self.added += 1;
                self.append_photo(PhotoRef::new(source));
            }
            ViewerAction::CycleHover => self.cycle_hover(),
            ViewerAction::Quit => {}
        }
    }

    pub fn append_photo(&mut self, source: PhotoRef) -> ElementId {
        let id = self.formation.append_photo(source);
        info!("photo {} added ({} total)", id, self.formation.photo_count());
        id
    }

    /// Hover the next photo card; past the last one, hover nothing.
    pub fn cycle_hover(&mut self) {
        let ids = self.formation.ids(ElementKind::Photo);
        let next = match self.formation.hovered() {
            None      => ids.first().copied(),
            Some(cur) => ids
                .iter()
                .position(|&id| id == cur)
                .and_then(|p| ids.get(p + 1))
                .copied(),
        };
        if let Err(e) = self.formation.set_hovered(next) {
            warn!("hover: {}", e);
        }
        debug!("hover {:?}", next);
    }

    fn refresh_status(&mut self) {
        self.status = format!(
            "{}   gesture {}   hand {}   photos {}",
            self.modes.mode(),
            self.modes.last_gesture(),
            if self.frame.is_present() { "on" } else { "off" },
            self.formation.photo_count(),
        );
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn mode(&self) -> AppMode                 { self.modes.mode() }
    pub fn gesture(&self) -> Gesture              { self.modes.last_gesture() }
    pub fn hand(&self) -> &HandFrame              { &self.frame }
    pub fn formation(&self) -> &FormationEngine   { &self.formation }
    pub fn camera_rig(&self) -> CameraRig         { self.camera.rig() }
}

// ════════════════════════════════════════════════════════════════════════════
// run: main entry point
// ════════════════════════════════════════════════════════════════════════════

pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    let (publisher, reader) = hand_slot();

    // ── Landmark source ──────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let source: Option<SourceHandle> = match &cfg.source {
        SourceKind::Simulated => Some(spawn_landmark_source(SimHandSource { rx: sim_rx }, publisher)),
        SourceKind::Stdin => Some(spawn_landmark_source(
            JsonLinesSource::new(BufReader::new(io::stdin()), cfg.min_confidence),
            publisher,
        )),
        SourceKind::Command(argv) => match spawn_detector_process(argv, cfg.min_confidence, publisher) {
            Ok(handle) => Some(handle),
            Err(e) => {
                // keep running without a hand; the tree stays up
                error!("{}", e);
                None
            }
        },
    };

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(sim_tx)?;

    // ── App state ─────────────────────────────────────────────────────────
    let mut app = AppState::new(&cfg, reader)?;

    // ── Main loop ─────────────────────────────────────────────────────────
    let start = Instant::now();
    let mut last = start;
    'frames: while vis.is_open() {
        for action in vis.poll_input() {
            if action == ViewerAction::Quit {
                break 'frames;
            }
            app.handle_action(action);
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;
        app.tick(now.duration_since(start).as_secs_f32(), dt);

        vis.render(app.formation(), &app.camera_rig(), &app.status);
    }

    // closing the window hangs up the simulator channel
    drop(vis);
    if let Some(source) = source {
        source.stop();
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
