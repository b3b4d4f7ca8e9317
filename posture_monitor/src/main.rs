mod camera;
mod estimator;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use opencv::{core::Mat, imgproc, prelude::*};
use posture_vision::config::PostureConfig;
use posture_vision::core_modules::joint::JointIndexTable;
use posture_vision::core_modules::utils::image_helper::rgb_frame;
use posture_vision::overlay::plan_overlay;
use posture_vision::pipeline::{BodySide, PostureMonitor};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::camera::{Camera, Window};
use crate::estimator::DnnPoseEstimator;

/// Watches a webcam and warns when the back leaves a straight line.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Camera device index.
    #[arg(long)]
    camera: Option<i32>,

    /// Path to the ONNX pose landmark model.
    #[arg(long)]
    model: Option<String>,

    /// Body side to measure: left, right or average.
    #[arg(long)]
    side: Option<BodySide>,
}

impl Args {
    fn into_config(self) -> Result<PostureConfig> {
        let mut config = match &self.config {
            Some(path) => PostureConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => PostureConfig::default(),
        };

        if let Some(camera) = self.camera {
            config.camera.device_id = camera;
        }
        if let Some(model) = self.model {
            config.model.path = model;
        }
        if let Some(side) = self.side {
            config.posture.side = side;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    // --- 1. Configuration ---
    let config = args.into_config()?;
    let mut monitor = PostureMonitor::new(&config)?;
    tracing::info!(
        side = ?monitor.side(),
        lower = monitor.bounds().lower(),
        upper = monitor.bounds().upper(),
        "posture monitor starting"
    );

    // --- 2. Device & Model Initialization ---
    // The camera and window guards release their resources on every exit path.
    let mut camera = Camera::open(config.camera.device_id)?;
    let mut estimator = DnnPoseEstimator::load(&config.model)?;
    let window = Window::new(&config.camera.window_title)?;
    let table = JointIndexTable::blazepose();

    // --- 3. Main Processing Loop ---
    while let Some(frame) = camera.read_frame(config.camera.mirror) {
        // --- 4. Colour Conversion & Posture Analysis ---
        let mut rgb = Mat::default();
        imgproc::cvt_color(&frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;
        let (width, height) = (rgb.cols() as u32, rgb.rows() as u32);
        let image = rgb_frame(width, height, rgb.data_bytes()?.to_vec())?;

        let analysis = monitor.process_frame(&mut estimator, &image)?;

        // --- 5. Visualization ---
        let mut annotated = frame.try_clone()?;
        let min_visibility = config.posture.min_visibility;
        render::draw_poses(&mut annotated, &analysis.poses, &table, min_visibility)?;
        render::draw_overlay(&mut annotated, &plan_overlay(&analysis.report, width, height))?;

        // --- 6. Display & Quit Check ---
        window.show(&annotated)?;
        if window.quit_requested(config.camera.wait_key_ms, config.camera.quit_key)? {
            tracing::info!("quit requested");
            break;
        }
    }

    tracing::info!(frames = monitor.frame_count(), "posture monitor stopped");
    Ok(())
}
