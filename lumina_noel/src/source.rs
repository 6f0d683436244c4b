//! Landmark sources: keyboard/mouse simulation and external detectors.
//!
//! Every source runs on its own thread and publishes [`HandFrame`]s into the
//! hand mailbox. The frame loop does not know which kind is running.
//!
//! External detectors speak JSON lines on stdout, one detection per line:
//!
//! ```text
//! READY
//! {"hands":[{"score":0.93,"handedness":"Right","landmarks":[{"x":0.5,"y":0.5,"z":0.0}, ...]}]}
//! {"hands":[]}
//! {"hands":[],"error":"camera unplugged"}
//! ```
//!
//! Lines that are not JSON objects (handshakes like `READY`) are skipped.

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};

use glam::Vec2;
use log::{debug, info, warn};
use lumina_gesture::{HandFrame, HandShape, Landmark, LANDMARK_COUNT, NEUTRAL_PALM};
use serde::Deserialize;

use crate::error::SourceError;
use crate::mailbox::HandPublisher;

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can publish hand frames from its own thread.
pub trait LandmarkSource: Send + 'static {
    fn name(&self) -> &'static str;
    fn run(self: Box<Self>, publisher: HandPublisher);
}

/// Owns a running source. Stopping (or dropping) closes the mailbox, kills the
/// detector process if there is one, and joins the thread when it can finish.
pub struct SourceHandle {
    name:      &'static str,
    publisher: HandPublisher,
    thread:    Option<JoinHandle<()>>,
    child:     Option<Child>,
}

/// Spawn a source on its own thread.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S, publisher: HandPublisher) -> SourceHandle {
    let name = source.name();
    let thread_publisher = publisher.clone();
    let thread = thread::spawn(move || Box::new(source).run(thread_publisher));
    info!("landmark source `{}` started", name);
    SourceHandle { name, publisher, thread: Some(thread), child: None }
}

impl SourceHandle {
    pub fn name(&self) -> &'static str { self.name }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.publisher.close();

        let had_child = match self.child.take() {
            Some(mut child) => {
                if let Err(e) = child.kill() {
                    debug!("detector already gone: {}", e);
                }
                if let Err(e) = child.wait() {
                    warn!("failed to reap detector: {}", e);
                }
                true
            }
            None => false,
        };

        if let Some(thread) = self.thread.take() {
            // a thread blocked on our own stdin cannot be woken; leave it
            if had_child || thread.is_finished() {
                if thread.join().is_err() {
                    warn!("landmark source `{}` panicked", self.name);
                }
            } else {
                debug!("landmark source `{}` detached", self.name);
            }
            info!("landmark source `{}` stopped", self.name);
        }
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource: keyboard/mouse simulation
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the viewer window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Hold this hand shape (also shows the hand).
    Shape(HandShape),
    /// Palm position in mirrored image coordinates.
    Palm(Vec2),
    /// Show or hide the hand.
    ToggleHand,
}

/// Synthesizes landmark frames from [`SimInput`] so the real classifier runs.
pub struct SimHandSource {
    pub rx: Receiver<SimInput>,
}

/// Simulated hand state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimHand {
    pub visible: bool,
    pub shape:   HandShape,
    pub palm:    Vec2,
}

impl Default for SimHand {
    fn default() -> Self {
        SimHand { visible: false, shape: HandShape::Relaxed, palm: NEUTRAL_PALM }
    }
}

impl SimHand {
    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Shape(shape) => {
                self.shape = shape;
                self.visible = true;
            }
            SimInput::Palm(palm)   => self.palm = palm,
            SimInput::ToggleHand   => self.visible = !self.visible,
        }
    }

    pub fn frame(&self) -> HandFrame {
        if self.visible {
            HandFrame::from_landmarks(self.shape.landmarks(self.palm))
        } else {
            HandFrame::absent()
        }
    }
}

impl LandmarkSource for SimHandSource {
    fn name(&self) -> &'static str { "simulated" }

    fn run(self: Box<Self>, publisher: HandPublisher) {
        let mut hand = SimHand::default();
        for input in self.rx {
            hand.apply(input);
            if !publisher.publish(hand.frame()) {
                return;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// JSON-lines detector protocol
// ════════════════════════════════════════════════════════════════════════════

#[derive(Deserialize)]
struct DetectionLine {
    #[serde(default)]
    hands: Vec<DetectedHand>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct DetectedHand {
    #[serde(default = "full_confidence")]
    score:      f32,
    #[serde(default)]
    handedness: Option<String>,
    landmarks:  Vec<Landmark>,
}

fn full_confidence() -> f32 { 1.0 }

/// Parse one detector line.
///
/// * `Ok(None)`: not a detection (blank or handshake line).
/// * `Ok(Some(frame))`: the first hand scoring at least `min_confidence`, or
///   the absent frame when there is none or the detector reported an error.
/// * `Err(_)`: a JSON object that does not match the protocol.
pub fn parse_detection_line(line: &str, min_confidence: f32) -> Result<Option<HandFrame>, SourceError> {
    let line = line.trim();
    if !line.starts_with('{') {
        return Ok(None);
    }
    let detection: DetectionLine = serde_json::from_str(line)?;
    if let Some(err) = detection.error {
        warn!("detector error: {}", err);
        return Ok(Some(HandFrame::absent()));
    }
    let Some(hand) = detection.hands.into_iter().find(|h| h.score >= min_confidence) else {
        return Ok(Some(HandFrame::absent()));
    };
    if hand.landmarks.len() < LANDMARK_COUNT {
        debug!("short hand ({} landmarks)", hand.landmarks.len());
    }
    debug!(
        "hand {} score {:.2}",
        hand.handedness.as_deref().unwrap_or("?"),
        hand.score,
    );
    Ok(Some(HandFrame::from_landmarks(hand.landmarks)))
}

/// Reads detector output from any buffered reader, such as stdin or a child's
/// stdout. End of input publishes an absent hand.
pub struct JsonLinesSource<R> {
    reader:         R,
    min_confidence: f32,
}

impl<R: BufRead + Send + 'static> JsonLinesSource<R> {
    pub fn new(reader: R, min_confidence: f32) -> Self {
        JsonLinesSource { reader, min_confidence }
    }
}

impl<R: BufRead + Send + 'static> LandmarkSource for JsonLinesSource<R> {
    fn name(&self) -> &'static str { "json-lines" }

    fn run(self: Box<Self>, publisher: HandPublisher) {
        let JsonLinesSource { reader, min_confidence } = *self;
        for line in reader.lines() {
            let line = match line {
                Ok(l)  => l,
                Err(e) => {
                    warn!("detector read failed: {}", e);
                    break;
                }
            };
            match parse_detection_line(&line, min_confidence) {
                Ok(frame) => {
                    if !publisher.deliver(frame) {
                        return;
                    }
                }
                Err(e) => warn!("{}", e),
            }
        }
        info!("detector stream ended");
        publisher.publish(HandFrame::absent());
    }
}

/// Start an external detector and read its stdout as JSON lines.
pub fn spawn_detector_process(
    command:        &[String],
    min_confidence: f32,
    publisher:      HandPublisher,
) -> Result<SourceHandle, SourceError> {
    let (program, args) = command.split_first().ok_or(SourceError::EmptyCommand)?;
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| SourceError::Spawn { command: command.join(" "), source })?;

    let Some(stdout) = child.stdout.take() else {
        // Piped stdout is always present; clean up regardless.
        let _ = child.kill();
        let _ = child.wait();
        return Err(SourceError::NoStdout(program.clone()));
    };

    info!("detector `{}` running as pid {}", program, child.id());
    let mut handle = spawn_landmark_source(
        JsonLinesSource::new(BufReader::new(stdout), min_confidence),
        publisher,
    );
    handle.child = Some(child);
    Ok(handle)
}
