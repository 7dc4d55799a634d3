//! Scripted in-process sensor feed for tests and the demo binary.
//!
//! Plays back a fixed list of `ScriptStep`s, one per loop iteration, then
//! idles on empty frames (or restarts when cycling).  Frame pacing and the
//! synthetic clock are independent so tests can use realistic timestamps
//! without realtime waits.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::info;

use super::{
    BodyFrame, FeedError, GestureDetection, HandFrame, HandGestureKind, SensorFeed, SubjectData,
};

// ── Script steps ───────────────────────────────────────────

/// One scripted loop iteration: what the body and hand pulls return.
#[derive(Debug, Clone, Default)]
pub struct ScriptStep {
    pub subjects: Vec<SubjectData>,
    pub gestures: Vec<GestureDetection>,
    pub fail_body: bool,
    pub fail_hand: bool,
}

impl ScriptStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, subject: SubjectData) -> Self {
        self.subjects.push(subject);
        self
    }

    pub fn with_gesture(mut self, kind: HandGestureKind, complete: bool) -> Self {
        self.gestures.push(GestureDetection { kind, complete });
        self
    }

    /// Make this step's body pull fail (transient).
    pub fn failing_body(mut self) -> Self {
        self.fail_body = true;
        self
    }

    /// Make this step's hand pull fail (transient).
    pub fn failing_hand(mut self) -> Self {
        self.fail_hand = true;
        self
    }
}

// ── Feed ───────────────────────────────────────────────────

/// Scripted `SensorFeed` implementation.
pub struct SyntheticFeed {
    script: Vec<ScriptStep>,
    cursor: usize,
    cycle: bool,
    /// Synthetic clock advance per body pull (frame timestamps).
    frame_interval_ms: u64,
    /// Real blocking per body pull, emulating sensor pacing.
    pacing_ms: u64,
    clock_ms: u64,
    pending_hand: Option<Result<HandFrame, FeedError>>,
    tracking_requests: Arc<AtomicU32>,
}

impl SyntheticFeed {
    pub fn new(script: Vec<ScriptStep>) -> Self {
        Self {
            script,
            cursor: 0,
            cycle: false,
            frame_interval_ms: 100,
            pacing_ms: 5,
            clock_ms: 0,
            pending_hand: None,
            tracking_requests: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Synthetic clock advance per frame.
    pub fn with_frame_interval(mut self, ms: u64) -> Self {
        self.frame_interval_ms = ms;
        self
    }

    /// Real blocking time per body pull.
    pub fn with_pacing(mut self, ms: u64) -> Self {
        self.pacing_ms = ms;
        self
    }

    /// Restart the script from the top once exhausted.
    pub fn cycling(mut self) -> Self {
        self.cycle = true;
        self
    }

    /// Shared counter of `start_skeleton_tracking` calls, for assertions
    /// after the feed has moved into the engine.
    pub fn tracking_requests(&self) -> Arc<AtomicU32> {
        self.tracking_requests.clone()
    }

    fn next_step(&mut self) -> Option<ScriptStep> {
        if self.cursor >= self.script.len() {
            if !self.cycle || self.script.is_empty() {
                return None;
            }
            self.cursor = 0;
        }
        let step = self.script[self.cursor].clone();
        self.cursor += 1;
        Some(step)
    }
}

impl SensorFeed for SyntheticFeed {
    fn initialize(&mut self) -> Result<(), FeedError> {
        info!(steps = self.script.len(), "synthetic feed initialized");
        Ok(())
    }

    fn read_body_frame(&mut self) -> Result<BodyFrame, FeedError> {
        if self.pacing_ms > 0 {
            thread::sleep(Duration::from_millis(self.pacing_ms));
        }
        self.clock_ms += self.frame_interval_ms;

        let Some(step) = self.next_step() else {
            self.pending_hand = Some(Ok(HandFrame::default()));
            return Ok(BodyFrame {
                timestamp_ms: self.clock_ms,
                subjects: Vec::new(),
            });
        };

        self.pending_hand = Some(if step.fail_hand {
            Err(FeedError::FrameRead("scripted hand failure".into()))
        } else {
            Ok(HandFrame {
                gestures: step.gestures,
            })
        });

        if step.fail_body {
            return Err(FeedError::FrameRead("scripted body failure".into()));
        }
        Ok(BodyFrame {
            timestamp_ms: self.clock_ms,
            subjects: step.subjects,
        })
    }

    fn read_hand_frame(&mut self) -> Result<HandFrame, FeedError> {
        self.pending_hand
            .take()
            .unwrap_or_else(|| Ok(HandFrame::default()))
    }

    fn start_skeleton_tracking(&mut self, subject: u32) -> Result<(), FeedError> {
        info!(subject, "skeleton tracking restarted");
        self.tracking_requests.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn start_gesture_detection(&mut self, kind: HandGestureKind) -> Result<(), FeedError> {
        info!(?kind, "gesture detection enabled");
        Ok(())
    }

    fn shutdown(&mut self) {
        info!("synthetic feed shut down");
    }
}

// ── Tests ──────────────────────────────────────────────────
