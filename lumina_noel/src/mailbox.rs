//! Latest-wins hand mailbox between a landmark source thread and the frame loop.
//!
//! One slot, overwritten on every publish. The reader never queues and never
//! blocks on the producer; stale frames are simply replaced. Each publish bumps
//! a sequence number so the frame loop can tell a fresh detection from the one
//! it already classified.

use std::sync::Arc;

use log::trace;
use lumina_gesture::HandFrame;
use parking_lot::Mutex;

struct Slot {
    seq:    u64,
    frame:  Arc<HandFrame>,
    closed: bool,
}

/// What the frame loop sees: the most recent frame and its sequence number.
/// `seq == 0` means nothing has been published yet.
#[derive(Clone, Debug)]
pub struct HandSample {
    pub seq:   u64,
    pub frame: Arc<HandFrame>,
}

/// Producer half, moved onto the source thread.
#[derive(Clone)]
pub struct HandPublisher {
    slot: Arc<Mutex<Slot>>,
}

/// Consumer half, owned by the frame loop.
#[derive(Clone)]
pub struct HandReader {
    slot: Arc<Mutex<Slot>>,
}

/// Create a connected publisher/reader pair. The slot starts with an absent hand.
pub fn hand_slot() -> (HandPublisher, HandReader) {
    let slot = Arc::new(Mutex::new(Slot {
        seq:    0,
        frame:  Arc::new(HandFrame::absent()),
        closed: false,
    }));
    (HandPublisher { slot: Arc::clone(&slot) }, HandReader { slot })
}

impl HandPublisher {
    /// Overwrite the slot. Returns `false` once the slot is closed; the frame
    /// is dropped in that case.
    pub fn publish(&self, frame: HandFrame) -> bool {
        let mut slot = self.slot.lock();
        if slot.closed {
            trace!("hand slot closed, dropping frame");
            return false;
        }
        slot.seq += 1;
        slot.frame = Arc::new(frame);
        true
    }

    /// Publish a detector result. `None` means the detector had nothing to
    /// say (not ready yet) and leaves the slot untouched.
    pub fn deliver(&self, frame: Option<HandFrame>) -> bool {
        match frame {
            Some(frame) => self.publish(frame),
            None        => !self.is_closed(),
        }
    }

    /// Stop accepting frames. Idempotent.
    pub fn close(&self) {
        self.slot.lock().closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.slot.lock().closed
    }
}

impl HandReader {
    pub fn latest(&self) -> HandSample {
        let slot = self.slot.lock();
        HandSample { seq: slot.seq, frame: Arc::clone(&slot.frame) }
    }

    pub fn is_closed(&self) -> bool {
        self.slot.lock().closed
    }
}
