//! Per-subject state machines deriving discrete lifecycle and calibration
//! events from continuous tracking data.
//!
//! Both trackers keep their state in a pre-sized table indexed by the dense
//! subject identifier; a subject id at or beyond the configured bound is a
//! fatal misconfiguration, never a silent out-of-bounds write.

use thiserror::Error;

mod calibration;
mod lifecycle;

pub use calibration::{CalibrationOutcome, SkeletonCalibrationTracker};
pub use lifecycle::{UserLifecycleTracker, UserState};

// ── Subject tables ─────────────────────────────────────────

/// Raised when the feed hands out a subject id the engine was not
/// configured for.
#[derive(Debug, Error)]
#[error("subject id {id} exceeds the configured maximum of {max} tracked subjects")]
pub struct SubjectOutOfRange {
    pub id: u32,
    pub max: usize,
}

/// Fixed-size per-subject state table.
pub(crate) struct SubjectTable<T> {
    slots: Vec<T>,
}

impl<T: Default> SubjectTable<T> {
    pub(crate) fn new(max_subjects: usize) -> Self {
        Self {
            slots: (0..max_subjects).map(|_| T::default()).collect(),
        }
    }

    pub(crate) fn get_mut(&mut self, id: u32) -> Result<&mut T, SubjectOutOfRange> {
        let max = self.slots.len();
        self.slots
            .get_mut(id as usize)
            .ok_or(SubjectOutOfRange { id, max })
    }
}

// ── Tests ──────────────────────────────────────────────────
