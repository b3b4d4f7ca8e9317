use anyhow::{Context, Result};
use image::RgbImage;
use opencv::{
    core::{self, Mat, Scalar, Vector},
    dnn,
    prelude::*,
};
use posture_vision::config::ModelConfig;
use posture_vision::core_modules::frame_clock::TimestampGuard;
use posture_vision::core_modules::landmark_decoder::LandmarkLayout;
use posture_vision::core_modules::utils::image_helper::input_tensor;
use posture_vision::pipeline::{Pose, PoseEstimator};
use posture_vision::PostureError;

/// Runs a BlazePose-style landmark model through OpenCV's DNN module.
pub struct DnnPoseEstimator {
    net: dnn::Net,
    layout: LandmarkLayout,
    /// Landmarks first, then the presence head when the model has one.
    output_names: Vector<String>,
    presence_threshold: f32,
    guard: TimestampGuard,
}

impl DnnPoseEstimator {
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let net = dnn::read_net_from_onnx(&config.path)
            .with_context(|| format!("failed to load pose model from {}", config.path))?;
        tracing::info!(
            path = %config.path,
            input_width = config.input_width,
            input_height = config.input_height,
            "pose model loaded"
        );

        let mut output_names = Vector::<String>::new();
        for name in config.output_names() {
            output_names.push(name);
        }

        Ok(Self {
            net,
            layout: config.layout(),
            output_names,
            presence_threshold: config.presence_threshold,
            guard: TimestampGuard::new(),
        })
    }

    fn run(&mut self, frame: &RgbImage) -> opencv::Result<(Vec<f32>, Option<f32>)> {
        let tensor = input_tensor(frame, &self.layout);
        let shape = [1, self.layout.input_height as i32, self.layout.input_width as i32, 3];
        let mut blob = Mat::new_nd_with_default(&shape, core::CV_32F, Scalar::all(0.0))?;
        blob.data_typed_mut::<f32>()?.copy_from_slice(&tensor);

        self.net.set_input(&blob, "", 1.0, Scalar::default())?;
        let mut outputs = Vector::<Mat>::new();
        self.net.forward(&mut outputs, &self.output_names)?;

        let landmarks = outputs.get(0)?;
        let raw = landmarks.data_typed::<f32>()?.to_vec();
        let presence = if outputs.len() > 1 {
            outputs.get(1)?.data_typed::<f32>()?.first().copied()
        } else {
            None
        };

        Ok((raw, presence))
    }
}

impl PoseEstimator for DnnPoseEstimator {
    fn detect(&mut self, frame: &RgbImage, timestamp_us: u64) -> posture_vision::Result<Vec<Pose>> {
        self.guard.accept(timestamp_us)?;

        let (raw, presence) = self
            .run(frame)
            .map_err(|e| PostureError::Estimator(e.to_string()))?;
        self.layout.decode(&raw, presence, self.presence_threshold)
    }
}
