//! Skeleton calibration state machine — raw feed status into discrete
//! calibration events.
//!
//! Unlike the lifecycle tracker, the guard here is a raw-value change: any
//! change in the reported calibration status is mapped through an exhaustive
//! table to one output symbol, which dispatches only when it differs from
//! the last dispatched one.

use tracing::debug;

use crate::events::Event;
use crate::feed::{CalibrationStatus, SubjectData};

use super::{SubjectOutOfRange, SubjectTable};

// ── Outcome mapping ────────────────────────────────────────

/// Discrete calibration outcome dispatched to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationOutcome {
    StoppedTracking,
    Calibrating,
    Tracking,
    /// Any of the feed's calibration-error reasons; the specific reason is
    /// intentionally collapsed.
    CalibrationFailed,
}

impl CalibrationOutcome {
    /// Exhaustive raw-status mapping table.
    pub fn from_status(status: CalibrationStatus) -> Self {
        match status {
            CalibrationStatus::None => Self::StoppedTracking,
            CalibrationStatus::Calibrating => Self::Calibrating,
            CalibrationStatus::Tracked => Self::Tracking,
            CalibrationStatus::ErrorNotInPose
            | CalibrationStatus::ErrorHands
            | CalibrationStatus::ErrorLegs
            | CalibrationStatus::ErrorHead
            | CalibrationStatus::ErrorTorso => Self::CalibrationFailed,
        }
    }

    fn event(&self) -> Event {
        match self {
            Self::StoppedTracking => Event::SkeletonStoppedTracking,
            Self::Calibrating => Event::SkeletonCalibrating,
            Self::Tracking => Event::SkeletonTracking,
            Self::CalibrationFailed => Event::SkeletonCalibrationFailed,
        }
    }
}

// ── Tracker ────────────────────────────────────────────────

#[derive(Default)]
struct Slot {
    raw: CalibrationStatus,
    /// Outcome computed from the last raw change; `None` until the raw
    /// status changes for the first time.
    current: Option<CalibrationOutcome>,
    last_dispatched: Option<CalibrationOutcome>,
}

/// Per-subject calibration tracker.
pub struct SkeletonCalibrationTracker {
    subjects: SubjectTable<Slot>,
}

impl SkeletonCalibrationTracker {
    pub fn new(max_subjects: usize) -> Self {
        Self {
            subjects: SubjectTable::new(max_subjects),
        }
    }

    /// Advance one subject by one frame.
    pub fn update(&mut self, subject: &SubjectData) -> Result<Option<Event>, SubjectOutOfRange> {
        let slot = self.subjects.get_mut(subject.id)?;

        if slot.raw != subject.calibration {
            slot.raw = subject.calibration;
            slot.current = Some(CalibrationOutcome::from_status(subject.calibration));
        }

        let Some(current) = slot.current else {
            return Ok(None);
        };
        if slot.last_dispatched == Some(current) {
            return Ok(None);
        }
        slot.last_dispatched = Some(current);
        debug!(subject = subject.id, outcome = ?current, "calibration transition");
        Ok(Some(current.event()))
    }
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
fn subject_with_status(id: u32, status: CalibrationStatus) -> SubjectData {
    SubjectData {
        calibration: status,
        ..SubjectData::new(id)
    }
}

// ── Tests ──────────────────────────────────────────────────
