use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core_modules::back_angle::BodySide;
use crate::core_modules::frame_clock::DEFAULT_FRAME_STEP_US;
use crate::core_modules::landmark_decoder::LandmarkLayout;
use crate::core_modules::verdict::{DEFAULT_LOWER_BOUND, DEFAULT_UPPER_BOUND, PostureBounds};
use crate::error::{PostureError, Result};

/// Top-level configuration, loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureConfig {
    pub camera: CameraConfig,
    pub model: ModelConfig,
    pub posture: PostureSettings,
    pub clock: ClockConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub device_id: i32,
    /// Flip frames horizontally so the preview behaves like a mirror.
    pub mirror: bool,
    pub wait_key_ms: i32,
    pub quit_key: char,
    pub window_title: String,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            mirror: true,
            wait_key_ms: 1,
            quit_key: 'q',
            window_title: "Webcam - Q to quit".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: String,
    pub input_width: u32,
    pub input_height: u32,
    pub landmarks_output: String,
    /// Name of the body-presence output. Empty treats every frame as containing a body.
    pub presence_output: String,
    pub presence_threshold: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "./model/pose_landmark_full.onnx".to_string(),
            input_width: 256,
            input_height: 256,
            landmarks_output: "Identity".to_string(),
            presence_output: "Identity_1".to_string(),
            presence_threshold: 0.5,
        }
    }
}

impl ModelConfig {
    pub fn presence_output(&self) -> Option<&str> {
        Some(self.presence_output.as_str()).filter(|name| !name.is_empty())
    }

    /// Output names to fetch in one forward pass: landmarks first, then presence if any.
    pub fn output_names(&self) -> Vec<&str> {
        std::iter::once(self.landmarks_output.as_str())
            .chain(self.presence_output())
            .collect()
    }

    pub fn layout(&self) -> LandmarkLayout {
        LandmarkLayout {
            input_width: self.input_width,
            input_height: self.input_height,
            ..LandmarkLayout::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureSettings {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub side: BodySide,
    pub min_visibility: f32,
}

impl Default for PostureSettings {
    fn default() -> Self {
        Self {
            lower_bound: DEFAULT_LOWER_BOUND,
            upper_bound: DEFAULT_UPPER_BOUND,
            side: BodySide::Left,
            min_visibility: 0.5,
        }
    }
}

impl PostureSettings {
    pub fn bounds(&self) -> Result<PostureBounds> {
        PostureBounds::new(self.lower_bound, self.upper_bound)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub step_us: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            step_us: DEFAULT_FRAME_STEP_US,
        }
    }
}

impl PostureConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| PostureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| PostureError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.posture.bounds()?;

        if !(0.0..=1.0).contains(&self.posture.min_visibility) {
            return Err(PostureError::InvalidConfig(format!(
                "posture.min_visibility must be within [0, 1], got {}",
                self.posture.min_visibility
            )));
        }
        if self.camera.wait_key_ms < 1 {
            return Err(PostureError::InvalidConfig(format!(
                "camera.wait_key_ms must be at least 1, got {}",
                self.camera.wait_key_ms
            )));
        }
        if !self.camera.quit_key.is_ascii() {
            return Err(PostureError::InvalidConfig(format!(
                "camera.quit_key must be an ASCII character, got {:?}",
                self.camera.quit_key
            )));
        }
        if !(0.0..=1.0).contains(&self.model.presence_threshold) {
            return Err(PostureError::InvalidConfig(format!(
                "model.presence_threshold must be within [0, 1], got {}",
                self.model.presence_threshold
            )));
        }
        if self.model.input_width == 0 || self.model.input_height == 0 {
            return Err(PostureError::InvalidConfig(
                "model input dimensions must be non-zero".to_string(),
            ));
        }
        if self.clock.step_us == 0 {
            return Err(PostureError::InvalidConfig(
                "clock.step_us must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_policy() {
        let config = PostureConfig::default();
        assert_eq!(config.posture.lower_bound, 170.0);
        assert_eq!(config.posture.upper_bound, 195.0);
        assert_eq!(config.posture.side, BodySide::Left);
        assert_eq!(config.clock.step_us, 30_000);
        assert_eq!(config.camera.quit_key, 'q');
        config.validate().unwrap();
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: PostureConfig = toml::from_str(
            r#"
            [posture]
            side = "average"
            upper_bound = 190.0
            "#,
        )
        .unwrap();

        assert_eq!(config.posture.side, BodySide::Average);
        assert_eq!(config.posture.upper_bound, 190.0);
        assert_eq!(config.posture.lower_bound, 170.0);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posture.toml");

        let mut config = PostureConfig::default();
        config.camera.device_id = 2;
        config.posture.side = BodySide::Right;
        config.model.presence_output = String::new();
        config.save(&path).unwrap();

        assert_eq!(PostureConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn load_rejects_inverted_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[posture]\nlower_bound = 200.0\nupper_bound = 170.0\n").unwrap();

        assert!(matches!(
            PostureConfig::load(&path),
            Err(PostureError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = PostureConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn unknown_side_fails_to_parse() {
        let result: std::result::Result<PostureConfig, _> =
            toml::from_str("[posture]\nside = \"both\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn out_of_range_visibility_is_invalid() {
        let mut config = PostureConfig::default();
        config.posture.min_visibility = 1.5;
        assert!(matches!(config.validate(), Err(PostureError::InvalidConfig(_))));
    }

    #[test]
    fn non_positive_wait_key_is_invalid() {
        let mut config = PostureConfig::default();
        for wait_key_ms in [0, -5] {
            config.camera.wait_key_ms = wait_key_ms;
            assert!(matches!(config.validate(), Err(PostureError::InvalidConfig(_))));
        }
    }

    #[test]
    fn non_ascii_quit_key_is_invalid() {
        let mut config = PostureConfig::default();
        config.camera.quit_key = 'é';
        assert!(matches!(config.validate(), Err(PostureError::InvalidConfig(_))));

        config.camera.quit_key = 'x';
        config.validate().unwrap();
    }

    #[test]
    fn output_names_list_landmarks_before_presence() {
        let mut model = ModelConfig::default();
        assert_eq!(model.output_names(), vec!["Identity", "Identity_1"]);

        model.presence_output = String::new();
        assert_eq!(model.output_names(), vec!["Identity"]);
    }
}
