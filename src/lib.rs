//! bodytrack — skeletal-tracking event engine.
//!
//! Continuously consumes body-tracking frames from a sensor feed and turns
//! them into a stream of discrete, de-duplicated events (user presence and
//! loss, skeleton calibration state, named gestures) that a single
//! foreground consumer reacts to without touching the sensor API.
//!
//! The pipeline runs on a dedicated background thread: frame pull, joint
//! geometry mapping, lifecycle/calibration state machines, swipe
//! recognition, and an ordered cross-thread bridge to the consumer.  See
//! `MotionEngine` for the host-facing surface and `feed::SensorFeed` for
//! the sensor boundary.

pub mod bridge;
pub mod engine;
pub mod events;
pub mod feed;
pub mod geometry;
pub mod gesture;
pub mod skeleton;
pub mod tracking;

pub use bridge::{EventPump, EventSender};
pub use engine::{EngineConfig, EngineError, MotionEngine};
pub use events::Event;
pub use feed::{
    BodyFrame, CalibrationStatus, FeedError, GestureDetection, HandFrame, HandGestureKind,
    JointReading, SensorFeed, SkeletonReading, SubjectData,
};
pub use gesture::SwipeConfig;
pub use skeleton::{Joint, JointKind, JointSnapshot, Skeleton, JOINT_COUNT};
