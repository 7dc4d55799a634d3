//! Discrete event symbols emitted by the tracking pipeline.
//!
//! Every state machine and recognizer in the crate funnels into this one
//! enum; the foreground consumer receives exactly one `Event` per dispatch.
//! `as_str` yields the stable wire names the embedding layer forwards to
//! external handlers.

// ── Event symbols ──────────────────────────────────────────

/// A single discrete event produced by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Sensor subsystem came up and the frame loop is starting.
    DeviceInitialized,
    /// Sensor subsystem failed fatally (startup or confirmed misuse).
    DeviceError,

    /// A subject was detected for the first time.
    NewUser,
    /// A known subject became visible.
    UserVisible,
    /// A known subject left the scene.
    UserOutOfScene,
    /// The feed gave up on a subject entirely.
    UserLost,

    /// Skeleton tracking stopped for the subject.
    SkeletonStoppedTracking,
    /// Skeleton calibration is in progress.
    SkeletonCalibrating,
    /// Skeleton is calibrated and joints are being tracked.
    SkeletonTracking,
    /// Calibration failed (the specific reason is collapsed).
    SkeletonCalibrationFailed,

    /// Directional hand swipes from the local recognizer.
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
    /// Wave reported as complete by the feed's own gesture detector.
    Wave,
}

impl Event {
    /// Stable wire name forwarded to external handlers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeviceInitialized => "DEVICE_INITIALIZED",
            Self::DeviceError => "DEVICE_ERROR",
            Self::NewUser => "NEW_USER",
            Self::UserVisible => "USER_IS_VISIBLE",
            Self::UserOutOfScene => "USER_IS_OUT_OF_SCENE",
            Self::UserLost => "USER_IS_LOST",
            Self::SkeletonStoppedTracking => "SKELETON_STOPPED_TRACKING",
            Self::SkeletonCalibrating => "SKELETON_CALIBRATING",
            Self::SkeletonTracking => "SKELETON_TRACKING",
            Self::SkeletonCalibrationFailed => "SKELETON_CALIBRATION_FAILED",
            Self::SwipeLeft => "GESTURE_SWIPE_LEFT",
            Self::SwipeRight => "GESTURE_SWIPE_RIGHT",
            Self::SwipeUp => "GESTURE_SWIPE_UP",
            Self::SwipeDown => "GESTURE_SWIPE_DOWN",
            Self::Wave => "GESTURE_WAVE",
        }
    }
}

// ── Tests ──────────────────────────────────────────────────
