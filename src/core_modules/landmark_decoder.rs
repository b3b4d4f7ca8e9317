// THEORY:
// A BlazePose landmark model emits one flat float tensor per frame. For every
// landmark it writes five values: x and y in input-image pixels, a relative
// depth z, and two logits for visibility and presence. The tensor also carries
// auxiliary landmarks after the 33 body joints, which the posture system ignores.
// A separate single-value output scores whether a body is present at all.
//
// This module turns that tensor into the crate's `Pose` type so that the rest of
// the system never sees model-specific layouts.

use crate::core_modules::joint::{Joint, Pose};
use crate::error::{PostureError, Result};

/// Shape of the landmark tensor produced by the pose model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandmarkLayout {
    pub input_width: u32,
    pub input_height: u32,
    pub landmark_count: usize,
    pub values_per_landmark: usize,
}

impl Default for LandmarkLayout {
    fn default() -> Self {
        Self {
            input_width: 256,
            input_height: 256,
            landmark_count: 33,
            values_per_landmark: 5,
        }
    }
}

impl LandmarkLayout {
    pub fn required_len(&self) -> usize {
        self.landmark_count * self.values_per_landmark
    }

    /// Decodes one frame of model output.
    ///
    /// `presence_logit` is the raw body-presence output, if the model has one.
    /// Returns an empty list when no body is present.
    pub fn decode(
        &self,
        raw: &[f32],
        presence_logit: Option<f32>,
        presence_threshold: f32,
    ) -> Result<Vec<Pose>> {
        if let Some(logit) = presence_logit {
            let presence = sigmoid(logit);
            if presence < presence_threshold {
                tracing::trace!(presence, "no body present");
                return Ok(Vec::new());
            }
        }

        let expected = self.required_len();
        if self.values_per_landmark < 2 || raw.len() < expected {
            return Err(PostureError::InvalidModelOutput {
                expected: expected.max(2),
                actual: raw.len(),
            });
        }

        let width = self.input_width as f32;
        let height = self.input_height as f32;
        let joints = raw[..expected]
            .chunks_exact(self.values_per_landmark)
            .map(|values| {
                let z = values.get(2).copied().unwrap_or(0.0);
                let visibility = values.get(3).copied().map(sigmoid).unwrap_or(1.0);
                Joint::new(values[0] / width, values[1] / height, z / width, visibility)
            })
            .collect();

        Ok(vec![Pose::new(joints)])
    }
}

fn sigmoid(logit: f32) -> f32 {
    1.0 / (1.0 + (-logit).exp())
}
