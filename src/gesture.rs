//! Swipe recognition from short-term hand motion history.
//!
//! Keeps one rolling window of timestamped hand positions per hand and fires
//! a directional swipe when the dominant-axis displacement across the window
//! reaches the configured distance.  After a swipe the recognizer enters a
//! refractory period during which no swipe of any direction fires.  The wave
//! gesture is not computed here; it arrives on the feed's own completed
//! gesture channel and is published by the frame loop.

use std::collections::VecDeque;

use tracing::debug;

use crate::events::Event;
use crate::skeleton::{JointKind, Skeleton};

// ── Config ─────────────────────────────────────────────────

/// Swipe detection thresholds.
#[derive(Debug, Clone)]
pub struct SwipeConfig {
    /// Minimum dominant-axis displacement (sensor millimeters).
    pub min_distance_mm: f32,
    /// How far back hand positions are considered.
    pub window_ms: u64,
    /// Cooldown after an emitted swipe.
    pub refractory_ms: u64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            min_distance_mm: 250.0,
            window_ms: 500,
            refractory_ms: 1000,
        }
    }
}

// ── Recognizer ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct TrackPoint {
    timestamp_ms: u64,
    x: f32,
    y: f32,
}

const TRACKED_HANDS: [JointKind; 2] = [JointKind::LeftHand, JointKind::RightHand];

/// Swipe recognizer over a freshly mapped skeleton.
pub struct GestureRecognizer {
    config: SwipeConfig,
    windows: [VecDeque<TrackPoint>; 2],
    refractory_until_ms: u64,
}

impl GestureRecognizer {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            windows: [VecDeque::new(), VecDeque::new()],
            refractory_until_ms: 0,
        }
    }

    /// Consume one mapped skeleton.  Called once per frame, only while the
    /// subject's skeleton is tracked (gating is the caller's concern).
    /// Emits at most one symbol per call.
    pub fn update(&mut self, skeleton: &Skeleton, timestamp_ms: u64) -> Option<Event> {
        for (i, hand) in TRACKED_HANDS.iter().enumerate() {
            let joint = skeleton.joint(*hand);
            let window = &mut self.windows[i];

            if !joint.active {
                // Tracking dropout invalidates the motion history.
                window.clear();
                continue;
            }

            window.push_back(TrackPoint {
                timestamp_ms,
                x: joint.x,
                y: joint.y,
            });
            while let Some(front) = window.front() {
                if timestamp_ms.saturating_sub(front.timestamp_ms) > self.config.window_ms {
                    window.pop_front();
                } else {
                    break;
                }
            }

            if timestamp_ms < self.refractory_until_ms {
                continue;
            }

            let (oldest, newest) = match (window.front(), window.back()) {
                (Some(a), Some(b)) => (*a, *b),
                _ => continue,
            };
            let dx = newest.x - oldest.x;
            let dy = newest.y - oldest.y;
            if dx.abs() < self.config.min_distance_mm && dy.abs() < self.config.min_distance_mm {
                continue;
            }

            let event = if dx.abs() >= dy.abs() {
                if dx > 0.0 {
                    Event::SwipeRight
                } else {
                    Event::SwipeLeft
                }
            } else if dy > 0.0 {
                Event::SwipeUp
            } else {
                Event::SwipeDown
            };

            debug!(hand = hand.as_str(), dx, dy, "swipe detected");
            self.refractory_until_ms = timestamp_ms + self.config.refractory_ms;
            for window in &mut self.windows {
                window.clear();
            }
            return Some(event);
        }

        None
    }
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
fn skeleton_with_hand(hand: JointKind, x: f32, y: f32) -> Skeleton {
    let mut skel = Skeleton::new();
    let joint = skel.joint_mut(hand);
    joint.x = x;
    joint.y = y;
    joint.active = true;
    skel
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn recognizer() -> GestureRecognizer {
        GestureRecognizer::new(SwipeConfig::default())
    }

    #[test]
    fn test_swipe_left_fires_once() {
        let mut rec = recognizer();

        assert_eq!(
            rec.update(&skeleton_with_hand(JointKind::RightHand, 0.0, 0.0), 0),
            None
        );
        assert_eq!(
            rec.update(&skeleton_with_hand(JointKind::RightHand, -150.0, 0.0), 100),
            None
        );
        assert_eq!(
            rec.update(&skeleton_with_hand(JointKind::RightHand, -300.0, 0.0), 200),
            Some(Event::SwipeLeft)
        );
    }

    #[test]
    fn test_refractory_suppresses_second_swipe() {
        let mut rec = recognizer();
        rec.update(&skeleton_with_hand(JointKind::RightHand, 0.0, 0.0), 0);
        rec.update(&skeleton_with_hand(JointKind::RightHand, -300.0, 0.0), 100);
        assert_eq!(
            rec.update(&skeleton_with_hand(JointKind::RightHand, -600.0, 0.0), 200),
            Some(Event::SwipeLeft)
        );

        // A second full sweep inside the refractory period emits nothing,
        // in any direction.
        rec.update(&skeleton_with_hand(JointKind::RightHand, -600.0, 0.0), 300);
        assert_eq!(
            rec.update(&skeleton_with_hand(JointKind::RightHand, -200.0, 0.0), 400),
            None
        );
        assert_eq!(
            rec.update(&skeleton_with_hand(JointKind::RightHand, 100.0, 0.0), 500),
            None
        );
    }

    #[test]
    fn test_swipe_after_refractory_expires() {
        let mut rec = recognizer();
        rec.update(&skeleton_with_hand(JointKind::RightHand, 0.0, 0.0), 0);
        assert_eq!(
            rec.update(&skeleton_with_hand(JointKind::RightHand, 300.0, 0.0), 100),
            Some(Event::SwipeRight)
        );

        // Well past the refractory period a fresh sweep fires again.
        rec.update(&skeleton_with_hand(JointKind::RightHand, 0.0, 0.0), 2000);
        assert_eq!(
            rec.update(&skeleton_with_hand(JointKind::RightHand, 300.0, 0.0), 2100),
            Some(Event::SwipeRight)
        );
    }

    #[test]
    fn test_vertical_swipes() {
        let mut rec = recognizer();
        rec.update(&skeleton_with_hand(JointKind::LeftHand, 0.0, 0.0), 0);
        assert_eq!(
            rec.update(&skeleton_with_hand(JointKind::LeftHand, 0.0, 300.0), 100),
            Some(Event::SwipeUp)
        );

        let mut rec = recognizer();
        rec.update(&skeleton_with_hand(JointKind::LeftHand, 0.0, 0.0), 0);
        assert_eq!(
            rec.update(&skeleton_with_hand(JointKind::LeftHand, 0.0, -300.0), 100),
            Some(Event::SwipeDown)
        );
    }

    #[test]
    fn test_slow_drift_outside_window_does_not_fire() {
        let mut rec = recognizer();
        // 100mm per 600ms: each point expires before the displacement
        // across the window can reach the threshold.
        let mut x = 0.0;
        for step in 0..10u64 {
            let ev = rec.update(
                &skeleton_with_hand(JointKind::RightHand, x, 0.0),
                step * 600,
            );
            assert_eq!(ev, None, "fired at step {}", step);
            x -= 100.0;
        }
    }

    #[test]
    fn test_inactive_hand_clears_history() {
        let mut rec = recognizer();
        rec.update(&skeleton_with_hand(JointKind::RightHand, 0.0, 0.0), 0);

        // Dropout: right hand loses confidence for a frame.
        let skel = Skeleton::new();
        rec.update(&skel, 100);

        // The pre-dropout origin must not count toward a swipe.
        assert_eq!(
            rec.update(&skeleton_with_hand(JointKind::RightHand, -300.0, 0.0), 200),
            None
        );
    }

    #[test]
    fn test_either_hand_can_swipe() {
        let mut rec = recognizer();
        rec.update(&skeleton_with_hand(JointKind::LeftHand, 0.0, 0.0), 0);
        assert_eq!(
            rec.update(&skeleton_with_hand(JointKind::LeftHand, 300.0, 0.0), 100),
            Some(Event::SwipeRight)
        );
    }
}
