//! Joint geometry mapping — raw feed readings into skeleton joints.
//!
//! Positions are rounded to whole sensor-space millimeters; orientations are
//! converted from the feed's unit quaternion to Euler degrees; the activity
//! flag is a strict confidence comparison with no hysteresis.  After a full
//! snapshot is mapped, the limb-extension percentage is derived for each arm.

use crate::feed::{JointReading, SkeletonReading};
use crate::skeleton::{Joint, JointKind, Skeleton};

/// A joint is active strictly above this confidence.
pub const ACTIVE_CONFIDENCE: f32 = 0.5;

// ── Per-joint mapping ──────────────────────────────────────

/// Overwrite one joint from a raw reading.
///
/// Hand joints get their extension metric recomputed by `map_skeleton` once
/// all ten joints are in place; here it is cleared.
pub fn map_joint(joint: &mut Joint, reading: &JointReading) {
    joint.x = reading.position[0].round();
    joint.y = reading.position[1].round();
    joint.z = reading.position[2].round();

    let (x_rot, y_rot, z_rot) = euler_degrees(&reading.orientation);
    joint.x_rotation = x_rot;
    joint.y_rotation = y_rot;
    joint.z_rotation = z_rot;

    joint.active = reading.confidence > ACTIVE_CONFIDENCE;
    joint.percent_extended = None;
}

/// Euler angles in degrees from a unit quaternion (x, y, z, w).
fn euler_degrees(q: &[f32; 4]) -> (f32, f32, f32) {
    let (qx, qy, qz, qw) = (q[0], q[1], q[2], q[3]);

    let x_rot = (2.0 * qy * qw - 2.0 * qx * qz)
        .atan2(1.0 - 2.0 * qy * qy - 2.0 * qz * qz)
        .to_degrees();
    // Clamped so a slightly denormalized quaternion cannot yield NaN.
    let y_rot = (2.0 * qx * qy + 2.0 * qz * qw)
        .clamp(-1.0, 1.0)
        .asin()
        .to_degrees();
    let z_rot = (2.0 * qx * qw - 2.0 * qy * qz)
        .atan2(1.0 - 2.0 * qx * qx - 2.0 * qz * qz)
        .to_degrees();

    (x_rot, y_rot, z_rot)
}

// ── Snapshot mapping ───────────────────────────────────────

/// Map all ten joints of a snapshot, then derive per-arm extension.
pub fn map_skeleton(skeleton: &mut Skeleton, reading: &SkeletonReading) {
    for kind in JointKind::ALL {
        map_joint(skeleton.joint_mut(kind), reading.get(kind));
    }

    let left = arm_extension(
        skeleton,
        JointKind::LeftHand,
        JointKind::LeftElbow,
        JointKind::LeftShoulder,
    );
    skeleton.joint_mut(JointKind::LeftHand).percent_extended = left;

    let right = arm_extension(
        skeleton,
        JointKind::RightHand,
        JointKind::RightElbow,
        JointKind::RightShoulder,
    );
    skeleton.joint_mut(JointKind::RightHand).percent_extended = right;
}

/// How straight an arm is, 0-100.
///
/// `100 * d(hand, shoulder) / (d(elbow, shoulder) + d(hand, elbow))`:
/// approximately 100 when hand, elbow and shoulder are collinear, lower when
/// the arm is bent.  A zero denominator (degenerate tracking) yields `None`
/// rather than NaN.
fn arm_extension(
    skeleton: &Skeleton,
    hand: JointKind,
    elbow: JointKind,
    shoulder: JointKind,
) -> Option<u8> {
    let hand = skeleton.joint(hand);
    let elbow = skeleton.joint(elbow);
    let shoulder = skeleton.joint(shoulder);

    let upper = joint_distance(elbow, shoulder);
    let fore = joint_distance(hand, elbow);
    let denom = upper + fore;
    if denom == 0.0 {
        return None;
    }

    let percent = 100.0 * joint_distance(hand, shoulder) / denom;
    // The triangle inequality keeps this at or below 100 up to rounding.
    Some(percent.round().min(100.0) as u8)
}

/// Euclidean distance between two joints' mapped positions.
fn joint_distance(a: &Joint, b: &Joint) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let dz = b.z - a.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
fn reading_at(x: f32, y: f32, z: f32, confidence: f32) -> JointReading {
    JointReading {
        position: [x, y, z],
        confidence,
        ..JointReading::default()
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_quaternion_zero_rotation() {
        let mut joint = Joint::new(JointKind::Head);
        map_joint(&mut joint, &JointReading::default());
        assert_eq!(joint.x_rotation, 0.0);
        assert_eq!(joint.y_rotation, 0.0);
        assert_eq!(joint.z_rotation, 0.0);
    }

    #[test]
    fn test_y_axis_quarter_turn() {
        let mut joint = Joint::new(JointKind::Head);
        let half = std::f32::consts::FRAC_1_SQRT_2;
        let reading = JointReading {
            orientation: [0.0, half, 0.0, half],
            ..JointReading::default()
        };
        map_joint(&mut joint, &reading);
        assert!((joint.x_rotation - 90.0).abs() < 0.01, "{}", joint.x_rotation);
        assert!(joint.y_rotation.abs() < 0.01);
        assert!(joint.z_rotation.abs() < 0.01);
    }

    #[test]
    fn test_positions_rounded() {
        let mut joint = Joint::new(JointKind::Torso);
        map_joint(&mut joint, &reading_at(1.4, 1.6, -2.5, 0.9));
        assert_eq!(joint.x, 1.0);
        assert_eq!(joint.y, 2.0);
        assert_eq!(joint.z, -3.0);
    }

    #[test]
    fn test_active_strictly_above_threshold() {
        let mut joint = Joint::new(JointKind::Head);

        map_joint(&mut joint, &reading_at(0.0, 0.0, 0.0, 0.5));
        assert!(!joint.active, "confidence exactly at threshold is inactive");

        map_joint(&mut joint, &reading_at(0.0, 0.0, 0.0, 0.51));
        assert!(joint.active);

        map_joint(&mut joint, &reading_at(0.0, 0.0, 0.0, 0.0));
        assert!(!joint.active);
    }

    #[test]
    fn test_collinear_arm_fully_extended() {
        let mut skel = Skeleton::new();
        let mut reading = SkeletonReading::default();
        reading.set(JointKind::RightShoulder, reading_at(0.0, 0.0, 0.0, 0.9));
        reading.set(JointKind::RightElbow, reading_at(100.0, 0.0, 0.0, 0.9));
        reading.set(JointKind::RightHand, reading_at(200.0, 0.0, 0.0, 0.9));

        map_skeleton(&mut skel, &reading);
        assert_eq!(
            skel.joint(JointKind::RightHand).percent_extended,
            Some(100)
        );
    }

    #[test]
    fn test_bent_arm_below_full_extension() {
        let mut skel = Skeleton::new();
        let mut reading = SkeletonReading::default();
        reading.set(JointKind::LeftShoulder, reading_at(0.0, 0.0, 0.0, 0.9));
        reading.set(JointKind::LeftElbow, reading_at(100.0, 0.0, 0.0, 0.9));
        reading.set(JointKind::LeftHand, reading_at(100.0, 100.0, 0.0, 0.9));

        map_skeleton(&mut skel, &reading);
        let percent = skel.joint(JointKind::LeftHand).percent_extended.unwrap();
        assert!(percent < 100, "bent arm reported {}", percent);
        assert_eq!(percent, 71);
    }

    #[test]
    fn test_degenerate_arm_is_unavailable() {
        let mut skel = Skeleton::new();
        // All arm joints collapsed onto the origin: zero-length segments.
        map_skeleton(&mut skel, &SkeletonReading::default());
        assert_eq!(skel.joint(JointKind::LeftHand).percent_extended, None);
        assert_eq!(skel.joint(JointKind::RightHand).percent_extended, None);
    }

    #[test]
    fn test_extension_only_on_hands() {
        let mut skel = Skeleton::new();
        let reading = SkeletonReading::uniform(reading_at(50.0, 60.0, 70.0, 0.9));
        map_skeleton(&mut skel, &reading);
        for kind in JointKind::ALL {
            if !kind.is_hand() {
                assert!(
                    skel.joint(kind).percent_extended.is_none(),
                    "{:?} carries an extension metric",
                    kind
                );
            }
        }
    }
}
