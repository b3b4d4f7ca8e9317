// THEORY:
// The `pipeline` module is the top-level API of the posture engine. It takes the
// per-frame control flow (detect, extract, classify) and packages it as one call
// a frame loop can make without knowing anything about joints or angles.
//
// The frame loop owns acquisition and display. The `PoseEstimator` trait is the
// seam to whatever inference engine turns pixels into poses. `PostureMonitor`
// sits between them: it stamps each frame with a strictly increasing timestamp,
// asks the estimator for poses, measures the first body and hands back a
// `FrameAnalysis` the caller can draw from.

use image::RgbImage;

use crate::config::PostureConfig;
use crate::core_modules::back_angle::BackAngleExtractor;
use crate::core_modules::frame_clock::FrameClock;
use crate::core_modules::verdict::PostureBounds;
use crate::error::Result;

// Re-export key data structures for the public API.
pub use crate::core_modules::back_angle::{AngleMeasurement, BodySide};
pub use crate::core_modules::joint::{Joint, JointName, Pose};
pub use crate::core_modules::verdict::PostureVerdict;

/// An inference engine that detects body poses in a video frame.
///
/// Implementations may assume `timestamp_us` strictly increases between calls.
pub trait PoseEstimator {
    fn detect(&mut self, frame: &RgbImage, timestamp_us: u64) -> Result<Vec<Pose>>;
}

/// The posture assessment for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostureReport {
    /// Number of bodies the estimator found.
    pub bodies: usize,
    /// Back angle of the first body, if it could be measured.
    pub angle: Option<AngleMeasurement>,
    pub verdict: PostureVerdict,
}

impl PostureReport {
    pub fn no_body() -> Self {
        Self {
            bodies: 0,
            angle: None,
            verdict: PostureVerdict::Undetermined,
        }
    }
}

/// Everything the caller needs to render one processed frame.
#[derive(Debug, Clone)]
pub struct FrameAnalysis {
    pub frame_index: u64,
    pub timestamp_us: u64,
    pub poses: Vec<Pose>,
    pub report: PostureReport,
}

/// The main, top-level struct for the posture engine.
pub struct PostureMonitor {
    extractor: BackAngleExtractor,
    bounds: PostureBounds,
    clock: FrameClock,
    frame_count: u64,
    last_verdict: PostureVerdict,
}

impl PostureMonitor {
    pub fn new(config: &PostureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_parts(
            BackAngleExtractor::new(config.posture.side, config.posture.min_visibility),
            config.posture.bounds()?,
            FrameClock::new(config.clock.step_us)?,
        ))
    }

    pub fn with_parts(
        extractor: BackAngleExtractor,
        bounds: PostureBounds,
        clock: FrameClock,
    ) -> Self {
        Self {
            extractor,
            bounds,
            clock,
            frame_count: 0,
            last_verdict: PostureVerdict::Undetermined,
        }
    }

    /// Classifies a set of detected poses without touching the clock.
    pub fn assess(&self, poses: &[Pose]) -> PostureReport {
        if poses.is_empty() {
            return PostureReport::no_body();
        }

        let angle = self.extractor.extract_first(poses);
        PostureReport {
            bodies: poses.len(),
            angle,
            verdict: self.bounds.classify(angle),
        }
    }

    /// Runs detection and classification for one frame.
    pub fn process_frame<E>(&mut self, estimator: &mut E, frame: &RgbImage) -> Result<FrameAnalysis>
    where
        E: PoseEstimator + ?Sized,
    {
        let timestamp_us = self.clock.tick();
        let poses = estimator.detect(frame, timestamp_us)?;
        let report = self.assess(&poses);

        self.frame_count += 1;
        tracing::trace!(
            frame = self.frame_count,
            timestamp_us,
            bodies = report.bodies,
            angle = report.angle.map(|a| a.degrees()),
            "frame processed"
        );

        if report.verdict != self.last_verdict {
            match report.angle {
                Some(angle) => tracing::info!(
                    frame = self.frame_count,
                    angle = angle.degrees(),
                    verdict = ?report.verdict,
                    "posture changed"
                ),
                None => tracing::debug!(
                    frame = self.frame_count,
                    bodies = report.bodies,
                    "posture undetermined"
                ),
            }
            self.last_verdict = report.verdict;
        }

        Ok(FrameAnalysis {
            frame_index: self.frame_count,
            timestamp_us,
            poses,
            report,
        })
    }

    pub fn last_verdict(&self) -> PostureVerdict {
        self.last_verdict
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn bounds(&self) -> &PostureBounds {
        &self.bounds
    }

    pub fn side(&self) -> BodySide {
        self.extractor.side()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::joint::JointIndexTable;
    use crate::error::PostureError;

    fn standing_pose() -> Pose {
        let table = JointIndexTable::blazepose();
        let mut joints = vec![Joint::planar(0.5, 0.5); JointName::ALL.len()];
        joints[table.index_of(JointName::LeftShoulder).unwrap()] = Joint::planar(0.5, 0.2);
        joints[table.index_of(JointName::LeftKnee).unwrap()] = Joint::planar(0.5, 0.8);
        Pose::new(joints)
    }

    struct Scripted {
        frames: Vec<Vec<Pose>>,
        seen: Vec<u64>,
    }

    impl PoseEstimator for Scripted {
        fn detect(&mut self, _frame: &RgbImage, timestamp_us: u64) -> Result<Vec<Pose>> {
            self.seen.push(timestamp_us);
            if self.frames.is_empty() {
                return Err(PostureError::Estimator("script exhausted".to_string()));
            }
            Ok(self.frames.remove(0))
        }
    }

    #[test]
    fn no_poses_is_undetermined() {
        let monitor = PostureMonitor::new(&PostureConfig::default()).unwrap();
        assert_eq!(monitor.assess(&[]), PostureReport::no_body());
    }

    #[test]
    fn process_frame_ticks_clock_and_tracks_verdict() {
        let mut monitor = PostureMonitor::new(&PostureConfig::default()).unwrap();
        let mut estimator = Scripted {
            frames: vec![vec![standing_pose()], vec![]],
            seen: Vec::new(),
        };
        let frame = RgbImage::new(4, 4);

        let first = monitor.process_frame(&mut estimator, &frame).unwrap();
        assert_eq!(first.frame_index, 1);
        assert_eq!(first.timestamp_us, 30_000);
        assert_eq!(first.report.verdict, PostureVerdict::Aligned);
        assert_eq!(monitor.last_verdict(), PostureVerdict::Aligned);

        let second = monitor.process_frame(&mut estimator, &frame).unwrap();
        assert_eq!(second.timestamp_us, 60_000);
        assert_eq!(second.report.verdict, PostureVerdict::Undetermined);
        assert!(second.poses.is_empty());

        assert_eq!(estimator.seen, vec![30_000, 60_000]);
        assert_eq!(monitor.frame_count(), 2);
    }

    #[test]
    fn estimator_errors_propagate() {
        let mut monitor = PostureMonitor::new(&PostureConfig::default()).unwrap();
        let mut estimator = Scripted {
            frames: Vec::new(),
            seen: Vec::new(),
        };

        let err = monitor.process_frame(&mut estimator, &RgbImage::new(1, 1)).unwrap_err();
        assert!(matches!(err, PostureError::Estimator(_)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = PostureConfig::default();
        config.posture.lower_bound = 200.0;
        assert!(PostureMonitor::new(&config).is_err());
    }
}
