use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the posture library.
#[derive(Debug, Error)]
pub enum PostureError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid posture bounds: need finite lower {lower} <= upper {upper}")]
    InvalidBounds { lower: f64, upper: f64 },

    #[error("timestamp {current}us is not after previous timestamp {previous}us")]
    NonMonotonicTimestamp { previous: u64, current: u64 },

    #[error("model output has {actual} values, expected at least {expected}")]
    InvalidModelOutput { expected: usize, actual: usize },

    #[error(
        "frame buffer of {actual} bytes does not match {width}x{height} RGB ({expected} bytes)"
    )]
    FrameSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("pose estimator failed: {0}")]
    Estimator(String),
}

pub type Result<T> = std::result::Result<T, PostureError>;
