// THEORY:
// The `verdict` module is the alert policy. It is a pure function of an angle
// and a pair of bounds: outside the band is `Misaligned`, inside is `Aligned`,
// and no angle at all, or a non-finite one, is `Undetermined`.
//
// The default band is (170, 195). The upper bound sits above the largest angle
// the extractor can produce, so with defaults only a closing hip angle alerts.

use crate::core_modules::back_angle::AngleMeasurement;
use crate::error::{PostureError, Result};

pub const DEFAULT_LOWER_BOUND: f64 = 170.0;
pub const DEFAULT_UPPER_BOUND: f64 = 195.0;

/// Classification of a back angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostureVerdict {
    Aligned,
    Misaligned,
    /// No body, or the required joints were not usable.
    Undetermined,
}

impl PostureVerdict {
    pub fn is_alert(&self) -> bool {
        matches!(self, PostureVerdict::Misaligned)
    }
}

/// Inclusive band of acceptable back angles, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostureBounds {
    lower: f64,
    upper: f64,
}

impl PostureBounds {
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !lower.is_finite() || !upper.is_finite() || lower > upper {
            return Err(PostureError::InvalidBounds { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn classify_degrees(&self, degrees: f64) -> PostureVerdict {
        if !degrees.is_finite() {
            PostureVerdict::Undetermined
        } else if degrees < self.lower || degrees > self.upper {
            PostureVerdict::Misaligned
        } else {
            PostureVerdict::Aligned
        }
    }

    pub fn classify(&self, angle: Option<AngleMeasurement>) -> PostureVerdict {
        match angle {
            Some(angle) => self.classify_degrees(angle.degrees()),
            None => PostureVerdict::Undetermined,
        }
    }
}

impl Default for PostureBounds {
    fn default() -> Self {
        Self {
            lower: DEFAULT_LOWER_BOUND,
            upper: DEFAULT_UPPER_BOUND,
        }
    }
}
