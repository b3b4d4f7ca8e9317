// THEORY:
// Video-mode pose engines track people across frames and refuse timestamps that
// go backwards or repeat. A live webcam has no reliable presentation clock, so
// the loop simulates one: every processed frame advances a fixed step.

use crate::error::{PostureError, Result};

/// Default step between frames, in microseconds (~33 ms per frame).
pub const DEFAULT_FRAME_STEP_US: u64 = 30_000;

/// Produces strictly increasing frame timestamps in microseconds.
#[derive(Debug, Clone)]
pub struct FrameClock {
    now_us: u64,
    step_us: u64,
}

impl FrameClock {
    pub fn new(step_us: u64) -> Result<Self> {
        if step_us == 0 {
            return Err(PostureError::InvalidConfig(
                "frame clock step must be greater than zero".to_string(),
            ));
        }
        Ok(Self { now_us: 0, step_us })
    }

    /// Advances one frame and returns the new timestamp.
    pub fn tick(&mut self) -> u64 {
        self.now_us = self.now_us.saturating_add(self.step_us);
        self.now_us
    }

    pub fn now(&self) -> u64 {
        self.now_us
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            now_us: 0,
            step_us: DEFAULT_FRAME_STEP_US,
        }
    }
}

/// Rejects timestamps that do not strictly increase.
///
/// Estimator implementations hold one of these and check every timestamp
/// they are handed before running the model.
#[derive(Debug, Clone, Default)]
pub struct TimestampGuard {
    last_us: Option<u64>,
}

impl TimestampGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, timestamp_us: u64) -> Result<()> {
        if let Some(previous) = self.last_us {
            if timestamp_us <= previous {
                return Err(PostureError::NonMonotonicTimestamp {
                    previous,
                    current: timestamp_us,
                });
            }
        }
        self.last_us = Some(timestamp_us);
        Ok(())
    }
}
