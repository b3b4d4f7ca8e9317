// THEORY:
// The `overlay` module decides *what* to draw on a processed frame, not *how*.
// It produces plain drawing instructions in pixel coordinates; the binary maps
// each one onto a single OpenCV call.

use crate::core_modules::joint::{Joint, JointIndexTable, POSE_CONNECTIONS, Pose};
use crate::pipeline::{PostureReport, PostureVerdict};

pub const ALERT_TEXT: &str = "ALERT: CHECK YOUR BACK!";
pub const OK_TEXT: &str = "POSTURE OK";

/// A colour in blue-green-red channel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bgr(pub u8, pub u8, pub u8);

impl Bgr {
    pub const RED: Bgr = Bgr(0, 0, 255);
    pub const GREEN: Bgr = Bgr(0, 255, 0);
    pub const CYAN: Bgr = Bgr(255, 255, 0);
    pub const WHITE: Bgr = Bgr(255, 255, 255);
}

/// A single drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayItem {
    Text {
        content: String,
        /// Bottom-left corner of the text, in pixels.
        origin: (i32, i32),
        scale: f64,
        color: Bgr,
        thickness: i32,
    },
    /// A rectangle outlining the whole frame.
    Border {
        width: i32,
        height: i32,
        color: Bgr,
        thickness: i32,
    },
}

/// Builds the angle readout and the alert or OK banner for a frame.
///
/// Nothing is drawn unless an angle was measured.
pub fn plan_overlay(report: &PostureReport, width: u32, height: u32) -> Vec<OverlayItem> {
    let Some(angle) = report.angle else {
        return Vec::new();
    };

    let mut items = vec![OverlayItem::Text {
        content: format!("Angle: {}", angle.rounded()),
        origin: (50, 50),
        scale: 1.0,
        color: Bgr::CYAN,
        thickness: 2,
    }];

    match report.verdict {
        PostureVerdict::Misaligned => {
            items.push(OverlayItem::Text {
                content: ALERT_TEXT.to_string(),
                origin: (50, 100),
                scale: 1.5,
                color: Bgr::RED,
                thickness: 3,
            });
            items.push(OverlayItem::Border {
                width: width as i32,
                height: height as i32,
                color: Bgr::RED,
                thickness: 10,
            });
        }
        PostureVerdict::Aligned => items.push(OverlayItem::Text {
            content: OK_TEXT.to_string(),
            origin: (50, 100),
            scale: 1.0,
            color: Bgr::GREEN,
            thickness: 2,
        }),
        PostureVerdict::Undetermined => {}
    }

    items
}

/// A pose projected into pixel space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
    pub points: Vec<(i32, i32)>,
    pub segments: Vec<((i32, i32), (i32, i32))>,
}

/// Projects a pose onto a `width` x `height` frame, dropping joints below `min_visibility`.
pub fn skeleton(
    pose: &Pose,
    table: &JointIndexTable,
    width: u32,
    height: u32,
    min_visibility: f32,
) -> Skeleton {
    let to_pixel = |x: f32, y: f32| {
        (
            (x * width as f32).round() as i32,
            (y * height as f32).round() as i32,
        )
    };

    let points = pose
        .joints
        .iter()
        .filter(|j| drawable(j, min_visibility))
        .map(|j| to_pixel(j.x, j.y))
        .collect();

    let segments = POSE_CONNECTIONS
        .iter()
        .filter_map(|(from, to)| {
            let a = pose.joint(*from, table)?;
            let b = pose.joint(*to, table)?;
            (drawable(a, min_visibility) && drawable(b, min_visibility))
                .then(|| (to_pixel(a.x, a.y), to_pixel(b.x, b.y)))
        })
        .collect();

    Skeleton { points, segments }
}

fn drawable(joint: &Joint, min_visibility: f32) -> bool {
    joint.visibility >= min_visibility && joint.x.is_finite() && joint.y.is_finite()
}
