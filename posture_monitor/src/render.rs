use opencv::{
    core::{Mat, Point, Rect, Scalar},
    imgproc,
    prelude::*,
};
use posture_vision::core_modules::joint::JointIndexTable;
use posture_vision::overlay::{Bgr, OverlayItem, skeleton};
use posture_vision::pipeline::Pose;

const JOINT_COLOR: Bgr = Bgr(0, 0, 255);
const BONE_COLOR: Bgr = Bgr::WHITE;

fn scalar(color: Bgr) -> Scalar {
    Scalar::new(color.0 as f64, color.1 as f64, color.2 as f64, 0.0)
}

/// Draws the joints and bones of every detected pose onto `frame`.
pub fn draw_poses(
    frame: &mut Mat,
    poses: &[Pose],
    table: &JointIndexTable,
    min_visibility: f32,
) -> opencv::Result<()> {
    let (width, height) = (frame.cols() as u32, frame.rows() as u32);

    for pose in poses {
        let sk = skeleton(pose, table, width, height, min_visibility);
        for (a, b) in &sk.segments {
            imgproc::line(
                frame,
                Point::new(a.0, a.1),
                Point::new(b.0, b.1),
                scalar(BONE_COLOR),
                2,
                imgproc::LINE_AA,
                0,
            )?;
        }
        for (x, y) in &sk.points {
            imgproc::circle(
                frame,
                Point::new(*x, *y),
                4,
                scalar(JOINT_COLOR),
                -1,
                imgproc::LINE_AA,
                0,
            )?;
        }
    }
    Ok(())
}

/// Renders the posture overlay plan onto `frame`.
pub fn draw_overlay(frame: &mut Mat, items: &[OverlayItem]) -> opencv::Result<()> {
    for item in items {
        match item {
            OverlayItem::Text {
                content,
                origin,
                scale,
                color,
                thickness,
            } => {
                imgproc::put_text(
                    frame,
                    content,
                    Point::new(origin.0, origin.1),
                    imgproc::FONT_HERSHEY_SIMPLEX,
                    *scale,
                    scalar(*color),
                    *thickness,
                    imgproc::LINE_AA,
                    false,
                )?;
            }
            OverlayItem::Border {
                width,
                height,
                color,
                thickness,
            } => {
                imgproc::rectangle(
                    frame,
                    Rect::new(0, 0, *width, *height),
                    scalar(*color),
                    *thickness,
                    imgproc::LINE_8,
                    0,
                )?;
            }
        }
    }
    Ok(())
}
