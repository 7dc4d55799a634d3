//! Sensor feed boundary — the opaque upstream body-tracking SDK.
//!
//! The engine never touches a sensor API directly; it drives a `SensorFeed`
//! implementation.  Frame types here mirror what the upstream feed reports:
//! per-subject presence flags and calibration status, raw joint readings
//! while tracked, and a separate hand channel of completed gesture
//! detections.

use thiserror::Error;

use crate::skeleton::{JointKind, JOINT_COUNT};

pub mod synthetic;

// ── Raw joint readings ─────────────────────────────────────

/// One raw joint sample from the feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointReading {
    /// Position in sensor-space millimeters.
    pub position: [f32; 3],
    /// Orientation as a unit quaternion (x, y, z, w).
    pub orientation: [f32; 4],
    /// Tracking confidence, 0.0-1.0.
    pub confidence: f32,
}

impl Default for JointReading {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            orientation: [0.0, 0.0, 0.0, 1.0],
            confidence: 0.0,
        }
    }
}

/// Raw readings for all ten joints of one tracked subject.
#[derive(Debug, Clone)]
pub struct SkeletonReading {
    joints: [JointReading; JOINT_COUNT],
}

impl SkeletonReading {
    /// The same reading for every joint (test and scenario convenience).
    pub fn uniform(reading: JointReading) -> Self {
        Self {
            joints: [reading; JOINT_COUNT],
        }
    }

    pub fn get(&self, kind: JointKind) -> &JointReading {
        &self.joints[kind.index()]
    }

    pub fn set(&mut self, kind: JointKind, reading: JointReading) {
        self.joints[kind.index()] = reading;
    }
}

impl Default for SkeletonReading {
    fn default() -> Self {
        Self::uniform(JointReading::default())
    }
}

// ── Calibration status ─────────────────────────────────────

/// Raw skeleton calibration status as reported by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationStatus {
    /// No skeleton is being tracked for the subject.
    #[default]
    None,
    /// Calibration is in progress.
    Calibrating,
    /// Calibrated; joint readings are available.
    Tracked,
    /// Calibration failed: subject not in the expected pose.
    ErrorNotInPose,
    /// Calibration failed on the hands.
    ErrorHands,
    /// Calibration failed on the legs.
    ErrorLegs,
    /// Calibration failed on the head.
    ErrorHead,
    /// Calibration failed on the torso.
    ErrorTorso,
}

// ── Frames ─────────────────────────────────────────────────

/// One subject as reported in a body-tracking frame.
#[derive(Debug, Clone)]
pub struct SubjectData {
    /// Dense zero-based subject identifier, bounded by the engine's
    /// configured maximum.
    pub id: u32,
    pub is_new: bool,
    pub is_visible: bool,
    pub is_lost: bool,
    pub calibration: CalibrationStatus,
    /// Joint readings, present while the skeleton is tracked.
    pub skeleton: Option<SkeletonReading>,
}

impl SubjectData {
    /// A subject with all flags cleared (scenario convenience).
    pub fn new(id: u32) -> Self {
        Self {
            id,
            is_new: false,
            is_visible: false,
            is_lost: false,
            calibration: CalibrationStatus::None,
            skeleton: None,
        }
    }
}

/// One body-tracking frame: zero or more subjects.
#[derive(Debug, Clone, Default)]
pub struct BodyFrame {
    /// Frame timestamp in milliseconds.
    pub timestamp_ms: u64,
    pub subjects: Vec<SubjectData>,
}

/// Built-in gestures the feed can detect on the hand channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandGestureKind {
    Wave,
    Click,
    HandRaise,
}

/// One gesture detection from the hand channel.
#[derive(Debug, Clone, Copy)]
pub struct GestureDetection {
    pub kind: HandGestureKind,
    /// True once the detector considers the gesture finished.
    pub complete: bool,
}

/// One hand/gesture frame: zero or more detections.
#[derive(Debug, Clone, Default)]
pub struct HandFrame {
    pub gestures: Vec<GestureDetection>,
}

// ── Errors ─────────────────────────────────────────────────

/// Errors surfaced by a sensor feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Device or session initialization failed.  Fatal to startup.
    #[error("sensor initialization failed: {0}")]
    Init(String),
    /// A per-frame pull failed.  Transient; the loop retries next iteration.
    #[error("frame read failed: {0}")]
    FrameRead(String),
    /// A tracker command (start tracking / start detection) failed.
    #[error("tracker command failed: {0}")]
    Command(String),
}

// ── Feed trait ─────────────────────────────────────────────

/// The upstream sensor feed.  The engine only ever talks to this trait.
///
/// The two frame pulls are the only calls the background loop blocks in;
/// their timing is bounded by the feed's own frame pacing.
pub trait SensorFeed {
    /// Bring up the device/session.  Failure is fatal to startup.
    fn initialize(&mut self) -> Result<(), FeedError>;

    /// Pull one body-tracking frame.
    fn read_body_frame(&mut self) -> Result<BodyFrame, FeedError>;

    /// Pull one hand/gesture frame.
    fn read_hand_frame(&mut self) -> Result<HandFrame, FeedError>;

    /// Begin body-skeleton tracking for a subject.
    fn start_skeleton_tracking(&mut self, subject: u32) -> Result<(), FeedError>;

    /// Enable built-in detection for a gesture type on the hand channel.
    fn start_gesture_detection(&mut self, kind: HandGestureKind) -> Result<(), FeedError>;

    /// Release sensor resources.  Called by the frame loop after its final
    /// iteration.
    fn shutdown(&mut self);
}
