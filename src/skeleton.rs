//! Skeleton data model — the ten tracked joints of one subject.
//!
//! The `Skeleton` is allocated once at engine startup with every joint typed
//! and inactive, mutated in place each frame by the geometry mapper, and
//! never reconstructed mid-session.  `JointSnapshot` is the plain value
//! handed out by the host query surface.

// ── Joint kinds ────────────────────────────────────────────

/// The ten tracked joints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointKind {
    Head,
    Torso,
    LeftHand,
    LeftElbow,
    LeftShoulder,
    LeftHip,
    RightHand,
    RightElbow,
    RightShoulder,
    RightHip,
}

/// Total number of joints per skeleton.
pub const JOINT_COUNT: usize = 10;

impl JointKind {
    /// All joint kinds in index order.
    pub const ALL: [JointKind; JOINT_COUNT] = [
        Self::Head,
        Self::Torso,
        Self::LeftHand,
        Self::LeftElbow,
        Self::LeftShoulder,
        Self::LeftHip,
        Self::RightHand,
        Self::RightElbow,
        Self::RightShoulder,
        Self::RightHip,
    ];

    /// Convert joint enum to array index (0-9).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// String representation for the query surface.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Torso => "torso",
            Self::LeftHand => "left_hand",
            Self::LeftElbow => "left_elbow",
            Self::LeftShoulder => "left_shoulder",
            Self::LeftHip => "left_hip",
            Self::RightHand => "right_hand",
            Self::RightElbow => "right_elbow",
            Self::RightShoulder => "right_shoulder",
            Self::RightHip => "right_hip",
        }
    }

    /// Parse a joint name as used by the query surface.
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "head" => Some(Self::Head),
            "torso" => Some(Self::Torso),
            "left_hand" => Some(Self::LeftHand),
            "left_elbow" => Some(Self::LeftElbow),
            "left_shoulder" => Some(Self::LeftShoulder),
            "left_hip" => Some(Self::LeftHip),
            "right_hand" => Some(Self::RightHand),
            "right_elbow" => Some(Self::RightElbow),
            "right_shoulder" => Some(Self::RightShoulder),
            "right_hip" => Some(Self::RightHip),
            _ => None,
        }
    }

    /// Whether this is one of the two hand joints.
    pub fn is_hand(&self) -> bool {
        matches!(self, Self::LeftHand | Self::RightHand)
    }
}

// ── Joint ──────────────────────────────────────────────────

/// One tracked joint of the skeleton.
///
/// Positions are sensor-space millimeters, rounded to whole numbers on
/// mapping; rotations are Euler degrees derived from the feed's orientation
/// quaternion.  `percent_extended` is populated only for the two hand joints
/// (how straight the arm is, 0-100); every other joint carries `None`.
#[derive(Debug, Clone, Copy)]
pub struct Joint {
    pub kind: JointKind,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub x_rotation: f32,
    pub y_rotation: f32,
    pub z_rotation: f32,
    /// True when tracking confidence exceeds the activity threshold.
    pub active: bool,
    /// Arm extension percentage, hand joints only.
    pub percent_extended: Option<u8>,
}

impl Joint {
    /// A typed, inactive joint with zeroed pose.
    pub fn new(kind: JointKind) -> Self {
        Self {
            kind,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            x_rotation: 0.0,
            y_rotation: 0.0,
            z_rotation: 0.0,
            active: false,
            percent_extended: None,
        }
    }
}

// ── Skeleton ───────────────────────────────────────────────

/// The full set of ten tracked joints for one subject.
#[derive(Debug, Clone)]
pub struct Skeleton {
    joints: [Joint; JOINT_COUNT],
}

impl Skeleton {
    /// Allocate the skeleton with every joint typed and inactive.
    pub fn new() -> Self {
        Self {
            joints: JointKind::ALL.map(Joint::new),
        }
    }

    /// Immutable access to one joint.
    pub fn joint(&self, kind: JointKind) -> &Joint {
        &self.joints[kind.index()]
    }

    /// Mutable access to one joint.
    pub fn joint_mut(&mut self, kind: JointKind) -> &mut Joint {
        &mut self.joints[kind.index()]
    }

    /// Mark every joint inactive and drop derived metrics.  Positions are
    /// left in place; they are overwritten on the next mapped frame.
    pub fn reset_active(&mut self) {
        for joint in &mut self.joints {
            joint.active = false;
            joint.percent_extended = None;
        }
    }
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::new()
    }
}

// ── Query snapshot ─────────────────────────────────────────

/// Joint fields as handed out by the host query surface.
///
/// Unknown joint names yield `JointSnapshot::default()` — an inactive,
/// zero-valued joint — rather than an error.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointSnapshot {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub x_rotation: f32,
    pub y_rotation: f32,
    pub z_rotation: f32,
    /// Only meaningful for the two hand joints.
    pub percent_extended: Option<u8>,
    pub active: bool,
}

impl From<&Joint> for JointSnapshot {
    fn from(joint: &Joint) -> Self {
        Self {
            x: joint.x,
            y: joint.y,
            z: joint.z,
            x_rotation: joint.x_rotation,
            y_rotation: joint.y_rotation,
            z_rotation: joint.z_rotation,
            percent_extended: joint.percent_extended,
            active: joint.active,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────
