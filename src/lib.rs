// THEORY:
// This file is the main entry point for the `posture_vision` library crate.
// It exposes the posture classifier as a clean API that a frame loop (like the
// `posture_monitor` binary) can drive one frame at a time.
//
// The primary export is `PostureMonitor` from the `pipeline` module together
// with its data structures (`PostureConfig`, `PostureReport`, `FrameAnalysis`).
// The geometric building blocks live in `core_modules` and stay free of any
// camera, inference or windowing dependency, so they can be tested in isolation.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod overlay;
pub mod pipeline;

pub use error::{PostureError, Result};
