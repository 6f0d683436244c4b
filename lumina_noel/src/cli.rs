//! Command line for lumina_noel

use clap::{ArgAction, Parser};
use log::LevelFilter;
use lumina_formation::{PhotoRef, Smoothing};

use lumina_noel::app::{AppConfig, SourceKind};

/// Frame rate the time-scaled smoothing is tuned against.
const REFERENCE_HZ: f32 = 60.0;

#[derive(Parser, Debug)]
#[command(name = "lumina_noel")]
#[command(about = "Gesture-controlled particle Christmas tree", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Number of ornament particles
    #[arg(long, default_value_t = 1500)]
    pub particles: usize,

    /// Seed for particle and photo placement
    #[arg(long)]
    pub seed: Option<u64>,

    /// Photo URL or path to hang on the tree (repeatable)
    #[arg(long = "photo", value_name = "REF")]
    pub photos: Vec<String>,

    /// Start without the built-in demo photos
    #[arg(long)]
    pub no_default_photos: bool,

    /// Ease by elapsed time instead of a fixed share per frame
    #[arg(long)]
    pub time_scaled_smoothing: bool,

    /// Read JSON-lines hand detections from stdin
    #[arg(long, conflicts_with = "landmark_cmd")]
    pub landmarks_stdin: bool,

    /// Start this detector and read JSON-lines hand detections from its stdout
    #[arg(long, value_name = "COMMAND")]
    pub landmark_cmd: Option<String>,

    /// Ignore detected hands scoring below this (0 to 1)
    #[arg(long, default_value_t = 0.5, value_parser = parse_confidence)]
    pub min_confidence: f32,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Detector scores live in `[0, 1]`; NaN would silently drop every hand.
fn parse_confidence(raw: &str) -> Result<f32, String> {
    let value: f32 = raw.parse().map_err(|e| format!("`{}` is not a number: {}", raw, e))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("`{}` is outside 0..=1", raw))
    }
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Error,
            (_, 0)    => LevelFilter::Warn,
            (_, 1)    => LevelFilter::Info,
            (_, 2)    => LevelFilter::Debug,
            _         => LevelFilter::Trace,
        }
    }

    pub fn into_config(self) -> AppConfig {
        let mut cfg = AppConfig::default();

        cfg.formation.particle_count = self.particles;
        if let Some(seed) = self.seed {
            cfg.formation.seed = seed;
        }

        if self.time_scaled_smoothing {
            let scaled = |s: Smoothing| Smoothing::TimeScaled {
                alpha:        s.alpha(),
                reference_hz: REFERENCE_HZ,
            };
            cfg.formation.smoothing = scaled(cfg.formation.smoothing);
            cfg.formation.hover_smoothing = scaled(cfg.formation.hover_smoothing);
            cfg.camera_smoothing = scaled(cfg.camera_smoothing);
        }

        if self.no_default_photos {
            cfg.photos.clear();
        }
        cfg.photos.extend(self.photos.into_iter().map(PhotoRef::new));

        cfg.min_confidence = self.min_confidence;
        cfg.source = match self.landmark_cmd {
            Some(cmd) => SourceKind::Command(cmd.split_whitespace().map(str::to_string).collect()),
            None if self.landmarks_stdin => SourceKind::Stdin,
            None => SourceKind::Simulated,
        };
        cfg
    }
}
