use image::{RgbImage, imageops::FilterType};

use crate::core_modules::landmark_decoder::LandmarkLayout;
use crate::error::{PostureError, Result};

const CHANNELS: usize = 3;

/// Wraps a tightly packed RGB buffer as an image the estimator can consume.
pub fn rgb_frame(width: u32, height: u32, bytes: Vec<u8>) -> Result<RgbImage> {
    let expected = width as usize * height as usize * CHANNELS;
    let actual = bytes.len();
    RgbImage::from_raw(width, height, bytes).filter(|_| actual == expected).ok_or(
        PostureError::FrameSize {
            width,
            height,
            expected,
            actual,
        },
    )
}

/// Resizes a frame to the model input and lays it out as NHWC floats in [0,1].
pub fn input_tensor(frame: &RgbImage, layout: &LandmarkLayout) -> Vec<f32> {
    let resized = if frame.dimensions() == (layout.input_width, layout.input_height) {
        frame.clone()
    } else {
        image::imageops::resize(
            frame,
            layout.input_width,
            layout.input_height,
            FilterType::Triangle,
        )
    };

    resized
        .into_raw()
        .into_iter()
        .map(|channel| channel as f32 / 255.0)
        .collect()
}
