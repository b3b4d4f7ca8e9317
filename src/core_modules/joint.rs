// THEORY:
// The `joint` module is the data layer of the posture system. It mirrors the
// contract of the external inference engine: a detected body is an ordered list
// of landmarks, and the meaning of each position in that list is fixed by the
// model's topology.
//
// Key architectural principles:
// 1.  **Dumb Data**: `Joint` and `Pose` are plain containers. They are produced
//     once per frame, never mutated, and dropped when the frame is done.
// 2.  **Named Lookup**: Nothing downstream indexes a `Pose` with a bare number.
//     `JointIndexTable` maps a semantic `JointName` to the index the engine uses,
//     so swapping to a model with a different ordering only touches the table.
// 3.  **Safe Access**: `Pose::joint` returns `Option`, so a short or partial
//     detection can never cause an out-of-bounds panic.

use std::collections::HashMap;

/// The 33 anatomical landmarks of the BlazePose topology, in model order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointName {
    Nose,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

impl JointName {
    pub const ALL: [JointName; 33] = [
        JointName::Nose,
        JointName::LeftEyeInner,
        JointName::LeftEye,
        JointName::LeftEyeOuter,
        JointName::RightEyeInner,
        JointName::RightEye,
        JointName::RightEyeOuter,
        JointName::LeftEar,
        JointName::RightEar,
        JointName::MouthLeft,
        JointName::MouthRight,
        JointName::LeftShoulder,
        JointName::RightShoulder,
        JointName::LeftElbow,
        JointName::RightElbow,
        JointName::LeftWrist,
        JointName::RightWrist,
        JointName::LeftPinky,
        JointName::RightPinky,
        JointName::LeftIndex,
        JointName::RightIndex,
        JointName::LeftThumb,
        JointName::RightThumb,
        JointName::LeftHip,
        JointName::RightHip,
        JointName::LeftKnee,
        JointName::RightKnee,
        JointName::LeftAnkle,
        JointName::RightAnkle,
        JointName::LeftHeel,
        JointName::RightHeel,
        JointName::LeftFootIndex,
        JointName::RightFootIndex,
    ];
}

/// A single detected landmark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    /// Horizontal position, normalized to [0,1] of the frame width.
    pub x: f32,
    /// Vertical position, normalized to [0,1] of the frame height.
    pub y: f32,
    /// Depth relative to the hips; smaller is closer to the camera.
    pub z: f32,
    /// Confidence that the joint is visible, in [0,1].
    pub visibility: f32,
}

impl Joint {
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self { x, y, z, visibility }
    }

    /// A fully visible joint on the image plane.
    pub fn planar(x: f32, y: f32) -> Self {
        Self::new(x, y, 0.0, 1.0)
    }
}

/// All joints detected for one body, ordered by the engine's topology.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    pub joints: Vec<Joint>,
}

impl Pose {
    pub fn new(joints: Vec<Joint>) -> Self {
        Self { joints }
    }

    /// Looks up a joint by name, returning `None` if the pose is too short.
    pub fn joint(&self, name: JointName, table: &JointIndexTable) -> Option<&Joint> {
        table.index_of(name).and_then(|i| self.joints.get(i))
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

/// Maps semantic joint names to the positions used by an inference engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointIndexTable {
    indices: HashMap<JointName, usize>,
}

impl JointIndexTable {
    /// The ordering produced by BlazePose / MediaPipe pose landmarkers.
    pub fn blazepose() -> Self {
        Self::from_order(&JointName::ALL)
    }

    /// Builds a table where each name's index is its position in `order`.
    pub fn from_order(order: &[JointName]) -> Self {
        let indices = order.iter().enumerate().map(|(i, name)| (*name, i)).collect();
        Self { indices }
    }

    pub fn index_of(&self, name: JointName) -> Option<usize> {
        self.indices.get(&name).copied()
    }
}

impl Default for JointIndexTable {
    fn default() -> Self {
        Self::blazepose()
    }
}

/// The skeleton graph used when drawing a pose.
pub const POSE_CONNECTIONS: [(JointName, JointName); 35] = [
    (JointName::Nose, JointName::LeftEyeInner),
    (JointName::LeftEyeInner, JointName::LeftEye),
    (JointName::LeftEye, JointName::LeftEyeOuter),
    (JointName::LeftEyeOuter, JointName::LeftEar),
    (JointName::Nose, JointName::RightEyeInner),
    (JointName::RightEyeInner, JointName::RightEye),
    (JointName::RightEye, JointName::RightEyeOuter),
    (JointName::RightEyeOuter, JointName::RightEar),
    (JointName::MouthLeft, JointName::MouthRight),
    (JointName::LeftShoulder, JointName::RightShoulder),
    (JointName::LeftShoulder, JointName::LeftElbow),
    (JointName::LeftElbow, JointName::LeftWrist),
    (JointName::LeftWrist, JointName::LeftPinky),
    (JointName::LeftWrist, JointName::LeftIndex),
    (JointName::LeftWrist, JointName::LeftThumb),
    (JointName::LeftPinky, JointName::LeftIndex),
    (JointName::RightShoulder, JointName::RightElbow),
    (JointName::RightElbow, JointName::RightWrist),
    (JointName::RightWrist, JointName::RightPinky),
    (JointName::RightWrist, JointName::RightIndex),
    (JointName::RightWrist, JointName::RightThumb),
    (JointName::RightPinky, JointName::RightIndex),
    (JointName::LeftShoulder, JointName::LeftHip),
    (JointName::RightShoulder, JointName::RightHip),
    (JointName::LeftHip, JointName::RightHip),
    (JointName::LeftHip, JointName::LeftKnee),
    (JointName::RightHip, JointName::RightKnee),
    (JointName::LeftKnee, JointName::LeftAnkle),
    (JointName::RightKnee, JointName::RightAnkle),
    (JointName::LeftAnkle, JointName::LeftHeel),
    (JointName::RightAnkle, JointName::RightHeel),
    (JointName::LeftHeel, JointName::LeftFootIndex),
    (JointName::RightHeel, JointName::RightFootIndex),
    (JointName::LeftAnkle, JointName::LeftFootIndex),
    (JointName::RightAnkle, JointName::RightFootIndex),
];
