// THEORY:
// The `back_angle` module turns a detected `Pose` into the one number the
// classifier cares about: the angle at the hip between the shoulder and the knee.
// A straight back and thigh line up at roughly 180 degrees; bending forward or
// leaning back closes the angle.
//
// Key architectural principles:
// 1.  **Undetermined over wrong**: Any missing, low-confidence or degenerate
//     input yields `None` rather than a fabricated angle. The extractor never
//     assumes that a body or a joint exists.
// 2.  **Explicit side selection**: Which side of the body is measured is a named
//     `BodySide` setting. `Left` is the default; `Average` measures the midline.
// 3.  **Named joints**: Joints are looked up through a `JointIndexTable`, never
//     by raw index.

use crate::core_modules::angle::{Point2, calculate_angle};
use crate::core_modules::joint::{JointIndexTable, JointName, Pose};
use serde::{Deserialize, Serialize};

/// Which side of the body supplies the shoulder, hip and knee joints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodySide {
    #[default]
    Left,
    Right,
    /// Midpoints of the left and right joints.
    Average,
}

impl BodySide {
    fn chain(self) -> [JointName; 3] {
        match self {
            BodySide::Right => {
                [JointName::RightShoulder, JointName::RightHip, JointName::RightKnee]
            }
            BodySide::Left | BodySide::Average => {
                [JointName::LeftShoulder, JointName::LeftHip, JointName::LeftKnee]
            }
        }
    }
}

impl std::str::FromStr for BodySide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(BodySide::Left),
            "right" => Ok(BodySide::Right),
            "average" => Ok(BodySide::Average),
            other => Err(format!("unknown body side '{other}', expected left, right or average")),
        }
    }
}

/// A back angle in degrees, within [0, 180] for any finite input.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct AngleMeasurement(f64);

impl AngleMeasurement {
    /// Wraps a raw angle, folding it into [0, 180].
    pub fn from_degrees(degrees: f64) -> Self {
        let d = degrees.abs() % 360.0;
        Self(if d > 180.0 { 360.0 - d } else { d })
    }

    pub fn degrees(&self) -> f64 {
        self.0
    }

    /// The whole-degree value shown on screen.
    pub fn rounded(&self) -> i32 {
        self.0.trunc() as i32
    }
}

/// Extracts the hip angle from a pose.
#[derive(Debug, Clone)]
pub struct BackAngleExtractor {
    side: BodySide,
    min_visibility: f32,
    table: JointIndexTable,
}

impl BackAngleExtractor {
    pub fn new(side: BodySide, min_visibility: f32) -> Self {
        Self::with_table(side, min_visibility, JointIndexTable::blazepose())
    }

    pub fn with_table(side: BodySide, min_visibility: f32, table: JointIndexTable) -> Self {
        Self {
            side,
            min_visibility,
            table,
        }
    }

    pub fn side(&self) -> BodySide {
        self.side
    }

    /// Measures the first detected body only; zero bodies is undetermined.
    pub fn extract_first(&self, poses: &[Pose]) -> Option<AngleMeasurement> {
        poses.first().and_then(|pose| self.extract(pose))
    }

    /// Angle at the hip between the shoulder and the knee.
    pub fn extract(&self, pose: &Pose) -> Option<AngleMeasurement> {
        let [shoulder, hip, knee] = match self.side {
            BodySide::Left | BodySide::Right => self.chain_points(pose, self.side)?,
            BodySide::Average => {
                let left = self.chain_points(pose, BodySide::Left)?;
                let right = self.chain_points(pose, BodySide::Right)?;
                [
                    left[0].midpoint(right[0]),
                    left[1].midpoint(right[1]),
                    left[2].midpoint(right[2]),
                ]
            }
        };

        if hip == shoulder || hip == knee {
            tracing::trace!("hip coincides with a ray endpoint; angle undetermined");
            return None;
        }

        Some(AngleMeasurement::from_degrees(calculate_angle(shoulder, hip, knee)))
    }

    fn chain_points(&self, pose: &Pose, side: BodySide) -> Option<[Point2; 3]> {
        let mut points = [Point2::new(0.0, 0.0); 3];
        for (slot, name) in points.iter_mut().zip(side.chain()) {
            let joint = pose.joint(name, &self.table)?;
            if joint.visibility.is_nan() || joint.visibility < self.min_visibility {
                return None;
            }
            let point = Point2::new(joint.x as f64, joint.y as f64);
            if !point.is_finite() {
                return None;
            }
            *slot = point;
        }
        Some(points)
    }
}

impl Default for BackAngleExtractor {
    fn default() -> Self {
        Self::new(BodySide::Left, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::joint::Joint;

    fn pose_with(entries: &[(JointName, Joint)]) -> Pose {
        let table = JointIndexTable::blazepose();
        let mut joints = vec![Joint::new(0.0, 0.0, 0.0, 0.0); JointName::ALL.len()];
        for (name, joint) in entries {
            joints[table.index_of(*name).unwrap()] = *joint;
        }
        Pose::new(joints)
    }

    fn left_chain(shoulder: (f32, f32), hip: (f32, f32), knee: (f32, f32)) -> Pose {
        pose_with(&[
            (JointName::LeftShoulder, Joint::planar(shoulder.0, shoulder.1)),
            (JointName::LeftHip, Joint::planar(hip.0, hip.1)),
            (JointName::LeftKnee, Joint::planar(knee.0, knee.1)),
        ])
    }

    #[test]
    fn straight_vertical_chain_measures_180() {
        let pose = left_chain((0.5, 0.2), (0.5, 0.5), (0.5, 0.8));
        let angle = BackAngleExtractor::default().extract(&pose).unwrap();
        assert!((angle.degrees() - 180.0).abs() < 1e-6);
        assert_eq!(angle.rounded(), 180);
    }

    #[test]
    fn offset_shoulder_measures_a_bent_hip() {
        let pose = left_chain((0.3, 0.2), (0.5, 0.5), (0.5, 0.8));
        let angle = BackAngleExtractor::default().extract(&pose).unwrap();
        assert!(angle.degrees() < 170.0, "got {}", angle.degrees());
    }

    #[test]
    fn no_bodies_is_undetermined() {
        assert!(BackAngleExtractor::default().extract_first(&[]).is_none());
    }

    #[test]
    fn only_first_body_is_measured() {
        let straight = left_chain((0.5, 0.2), (0.5, 0.5), (0.5, 0.8));
        let bent = left_chain((0.3, 0.2), (0.5, 0.5), (0.5, 0.8));
        let angle = BackAngleExtractor::default()
            .extract_first(&[straight, bent])
            .unwrap();
        assert!((angle.degrees() - 180.0).abs() < 1e-6);
    }

    #[test]
    fn truncated_pose_is_undetermined() {
        let pose = Pose::new(vec![Joint::planar(0.5, 0.5); 20]);
        assert!(BackAngleExtractor::default().extract(&pose).is_none());
    }

    #[test]
    fn low_visibility_joint_is_undetermined() {
        let pose = pose_with(&[
            (JointName::LeftShoulder, Joint::planar(0.5, 0.2)),
            (JointName::LeftHip, Joint::new(0.5, 0.5, 0.0, 0.1)),
            (JointName::LeftKnee, Joint::planar(0.5, 0.8)),
        ]);
        assert!(BackAngleExtractor::default().extract(&pose).is_none());
        assert!(BackAngleExtractor::new(BodySide::Left, 0.0).extract(&pose).is_some());
    }

    #[test]
    fn coincident_hip_is_undetermined() {
        let pose = left_chain((0.5, 0.5), (0.5, 0.5), (0.5, 0.8));
        assert!(BackAngleExtractor::default().extract(&pose).is_none());
    }

    #[test]
    fn non_finite_coordinates_are_undetermined() {
        let pose = left_chain((f32::NAN, 0.2), (0.5, 0.5), (0.5, 0.8));
        assert!(BackAngleExtractor::default().extract(&pose).is_none());
    }

    #[test]
    fn right_side_reads_right_joints() {
        let pose = pose_with(&[
            (JointName::RightShoulder, Joint::planar(0.6, 0.2)),
            (JointName::RightHip, Joint::planar(0.6, 0.5)),
            (JointName::RightKnee, Joint::planar(0.6, 0.8)),
        ]);
        let extractor = BackAngleExtractor::new(BodySide::Right, 0.5);
        let angle = extractor.extract(&pose).unwrap();
        assert!((angle.degrees() - 180.0).abs() < 1e-6);
        assert!(BackAngleExtractor::default().extract(&pose).is_none());
    }

    #[test]
    fn average_side_uses_midline() {
        let pose = pose_with(&[
            (JointName::LeftShoulder, Joint::planar(0.4, 0.2)),
            (JointName::LeftHip, Joint::planar(0.4, 0.5)),
            (JointName::LeftKnee, Joint::planar(0.4, 0.8)),
            (JointName::RightShoulder, Joint::planar(0.6, 0.2)),
            (JointName::RightHip, Joint::planar(0.6, 0.5)),
            (JointName::RightKnee, Joint::planar(0.6, 0.8)),
        ]);
        let extractor = BackAngleExtractor::new(BodySide::Average, 0.5);
        let angle = extractor.extract(&pose).unwrap();
        assert!((angle.degrees() - 180.0).abs() < 1e-6);
    }

    #[test]
    fn measurement_folds_into_principal_range() {
        assert_eq!(AngleMeasurement::from_degrees(200.0).degrees(), 160.0);
        assert_eq!(AngleMeasurement::from_degrees(-90.0).degrees(), 90.0);
    }

    #[test]
    fn side_parses_from_text() {
        assert_eq!("Average".parse::<BodySide>(), Ok(BodySide::Average));
        assert!("both".parse::<BodySide>().is_err());
    }
}
