//! The motion engine — background frame loop plus the host-facing surface.
//!
//! `MotionEngine::initialize` brings up the sensor feed, creates the event
//! bridge, and spawns the frame worker thread; the caller keeps the returned
//! `EventPump` on its own thread.  The worker owns the feed, the state
//! trackers, and the gesture recognizer outright; the skeleton alone is
//! shared (behind a mutex) so the host can answer joint queries while frames
//! are processed.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::bridge::{self, EventPump, EventSender};
use crate::events::Event;
use crate::feed::{CalibrationStatus, FeedError, HandGestureKind, SensorFeed};
use crate::geometry;
use crate::gesture::{GestureRecognizer, SwipeConfig};
use crate::skeleton::{JointKind, JointSnapshot, Skeleton};
use crate::tracking::{
    SkeletonCalibrationTracker, SubjectOutOfRange, UserLifecycleTracker,
};

// ── Config & errors ────────────────────────────────────────

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on concurrently tracked subjects; subject identifiers
    /// are dense zero-based indexes below this bound.
    pub max_subjects: usize,
    /// Swipe recognizer thresholds.
    pub swipe: SwipeConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_subjects: 1,
            swipe: SwipeConfig::default(),
        }
    }
}

/// Errors surfaced to the embedding layer.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("sensor feed error: {0}")]
    Feed(#[from] FeedError),
    #[error("event bridge error: {0}")]
    Bridge(#[from] calloop::Error),
    #[error("failed to spawn frame worker: {0}")]
    Spawn(#[from] std::io::Error),
    #[error(transparent)]
    SubjectBound(#[from] SubjectOutOfRange),
}

// ── Engine ─────────────────────────────────────────────────

/// Host-facing engine handle.
pub struct MotionEngine {
    skeleton: Arc<Mutex<Skeleton>>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl MotionEngine {
    /// Bring up the feed and start the background frame loop.
    ///
    /// On success the bridge already carries `DeviceInitialized` as its
    /// first event.  On failure no loop is started and the error maps to a
    /// single `DEVICE_ERROR` report in the embedding layer.
    pub fn initialize<F>(
        mut feed: F,
        config: EngineConfig,
    ) -> Result<(Self, EventPump), EngineError>
    where
        F: SensorFeed + Send + 'static,
    {
        info!("initializing sensor feed");
        feed.initialize()?;
        feed.start_gesture_detection(HandGestureKind::Wave)?;

        let (sender, pump) = bridge::bridge()?;
        sender.publish(Event::DeviceInitialized);

        let skeleton = Arc::new(Mutex::new(Skeleton::new()));
        let stop = Arc::new(AtomicBool::new(false));

        let worker = {
            let skeleton = skeleton.clone();
            let stop = stop.clone();
            thread::Builder::new()
                .name("bodytrack-frames".into())
                .spawn(move || FrameLoop::new(feed, config, skeleton, sender, stop).run())?
        };

        Ok((
            Self {
                skeleton,
                stop,
                worker: Some(worker),
            },
            pump,
        ))
    }

    /// Current snapshot for each requested joint name.
    ///
    /// Unknown names yield an inactive, zero-valued snapshot rather than an
    /// error.
    pub fn joints(&self, names: &[&str]) -> BTreeMap<String, JointSnapshot> {
        let skeleton = self.skeleton.lock().unwrap();
        names
            .iter()
            .map(|name| {
                let snapshot = JointKind::from_name(name)
                    .map(|kind| JointSnapshot::from(skeleton.joint(kind)))
                    .unwrap_or_default();
                ((*name).to_string(), snapshot)
            })
            .collect()
    }

    /// Flip the stop flag and wait for the frame worker to exit.
    ///
    /// The worker observes the flag at its next iteration boundary, shuts
    /// the feed down, and drops its bridge sender; shutdown latency is
    /// bounded by one pull-and-process cycle.  Idempotent.
    pub fn close(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        info!("stopping frame worker");
        self.stop.store(true, Ordering::SeqCst);
        if worker.join().is_err() {
            error!("frame worker panicked during shutdown");
        }
    }
}

impl Drop for MotionEngine {
    fn drop(&mut self) {
        self.close();
    }
}

// ── Frame loop ─────────────────────────────────────────────

/// The background frame-processing loop.  Owns the feed and all per-frame
/// state; runs until the stop flag is observed or a fatal misuse occurs.
struct FrameLoop<F> {
    feed: F,
    skeleton: Arc<Mutex<Skeleton>>,
    events: EventSender,
    stop: Arc<AtomicBool>,
    lifecycle: UserLifecycleTracker,
    calibration: SkeletonCalibrationTracker,
    gestures: GestureRecognizer,
}

impl<F: SensorFeed> FrameLoop<F> {
    fn new(
        feed: F,
        config: EngineConfig,
        skeleton: Arc<Mutex<Skeleton>>,
        events: EventSender,
        stop: Arc<AtomicBool>,
    ) -> Self {
        Self {
            feed,
            skeleton,
            events,
            stop,
            lifecycle: UserLifecycleTracker::new(config.max_subjects),
            calibration: SkeletonCalibrationTracker::new(config.max_subjects),
            gestures: GestureRecognizer::new(config.swipe),
        }
    }

    fn run(mut self) {
        info!("frame worker running");
        while !self.stop.load(Ordering::SeqCst) {
            if let Err(err) = self.iterate() {
                error!("fatal subject bound violation: {err}");
                self.events.publish(Event::DeviceError);
                break;
            }
        }
        self.feed.shutdown();
        info!("frame worker stopped");
        // Dropping self here releases the bridge sender; the pump observes
        // closure only after this final iteration.
    }

    /// One loop iteration: pull both frames, drive the state machines, map
    /// geometry, recognize gestures.  A failed pull skips the iteration
    /// entirely; nothing is mutated and no event is emitted.
    fn iterate(&mut self) -> Result<(), SubjectOutOfRange> {
        let body = match self.feed.read_body_frame() {
            Ok(frame) => frame,
            Err(err) => {
                warn!("body frame read failed: {err}");
                return Ok(());
            }
        };
        let hand = match self.feed.read_hand_frame() {
            Ok(frame) => frame,
            Err(err) => {
                warn!("hand frame read failed: {err}");
                return Ok(());
            }
        };

        for subject in &body.subjects {
            if let Some(event) = self.lifecycle.update(subject)? {
                self.events.publish(event);
            }
            if let Some(event) = self.calibration.update(subject)? {
                self.events.publish(event);
            }

            if subject.is_new {
                self.skeleton.lock().unwrap().reset_active();
                if let Err(err) = self.feed.start_skeleton_tracking(subject.id) {
                    warn!(subject = subject.id, "failed to restart skeleton tracking: {err}");
                }
            } else if subject.calibration == CalibrationStatus::Tracked {
                if let Some(reading) = &subject.skeleton {
                    let mut skeleton = self.skeleton.lock().unwrap();
                    geometry::map_skeleton(&mut skeleton, reading);
                    if let Some(event) = self.gestures.update(&skeleton, body.timestamp_ms) {
                        self.events.publish(event);
                    }
                }
            }
        }

        for detection in &hand.gestures {
            if detection.complete && detection.kind == HandGestureKind::Wave {
                self.events.publish(Event::Wave);
            }
        }

        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────
