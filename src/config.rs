//! Configuration management for the attention-tracking pipeline

use crate::constants::{
    DEFAULT_EYE_HORIZONTAL_THRESHOLD, DEFAULT_EYE_VERTICAL_THRESHOLD, DEFAULT_GAZE_HISTORY_SIZE,
    DEFAULT_HEAD_PITCH_THRESHOLD, DEFAULT_HEAD_ROLL_THRESHOLD, DEFAULT_HEAD_YAW_THRESHOLD,
    DEFAULT_MAX_FRAME_DIMENSION, DEFAULT_MEASUREMENT_NOISE, DEFAULT_MIN_EVENT_DURATION_SEC,
    DEFAULT_PROCESS_NOISE, DEFAULT_TARGET_FPS, SMOOTHING_WINDOW,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fixed detection thresholds, immutable for a run
    pub thresholds: Thresholds,

    /// Gaze smoothing parameters
    pub smoothing: SmoothingConfig,

    /// Violation detection parameters
    pub detection: DetectionConfig,
}

/// Fixed angle thresholds in degrees
///
/// Roll is carried for completeness but has no active detection condition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    /// Horizontal eye-gaze threshold (left/right)
    pub eye_horizontal: f64,

    /// Vertical eye-gaze threshold (up/down)
    pub eye_vertical: f64,

    /// Head yaw threshold (turn left/right)
    pub yaw: f64,

    /// Head pitch threshold (look up/down)
    pub pitch: f64,

    /// Head roll threshold (tilt); reserved, not evaluated
    pub roll: f64,
}

/// Gaze smoothing parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Kalman filter process-noise covariance
    pub process_noise: f64,

    /// Kalman filter measurement-noise covariance
    pub measurement_noise: f64,

    /// Capacity of the rolling gaze-angle history
    pub history_size: usize,
}

/// Violation detection parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Minimum sustained duration for a violation span to be reported, seconds
    pub min_event_duration_sec: f64,

    /// Target sampling rate for the frame-acquisition layer, frames per second
    pub target_fps: u32,

    /// Maximum frame dimension before the acquisition layer downscales, pixels
    pub max_frame_dimension: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            smoothing: SmoothingConfig::default(),
            detection: DetectionConfig::default(),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            eye_horizontal: DEFAULT_EYE_HORIZONTAL_THRESHOLD,
            eye_vertical: DEFAULT_EYE_VERTICAL_THRESHOLD,
            yaw: DEFAULT_HEAD_YAW_THRESHOLD,
            pitch: DEFAULT_HEAD_PITCH_THRESHOLD,
            roll: DEFAULT_HEAD_ROLL_THRESHOLD,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            process_noise: DEFAULT_PROCESS_NOISE,
            measurement_noise: DEFAULT_MEASUREMENT_NOISE,
            history_size: DEFAULT_GAZE_HISTORY_SIZE,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_event_duration_sec: DEFAULT_MIN_EVENT_DURATION_SEC,
            target_fps: DEFAULT_TARGET_FPS,
            max_frame_dimension: DEFAULT_MAX_FRAME_DIMENSION,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails to parse.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid field found.
    pub fn validate(&self) -> Result<()> {
        // Validate thresholds
        for (name, value) in [
            ("eye_horizontal", self.thresholds.eye_horizontal),
            ("eye_vertical", self.thresholds.eye_vertical),
            ("yaw", self.thresholds.yaw),
            ("pitch", self.thresholds.pitch),
            ("roll", self.thresholds.roll),
        ] {
            if value <= 0.0 || !value.is_finite() {
                return Err(Error::ConfigError(format!(
                    "Threshold {} must be a positive number of degrees",
                    name
                )));
            }
        }

        // Validate smoothing parameters
        if self.smoothing.process_noise <= 0.0 {
            return Err(Error::ConfigError(
                "Process noise covariance must be greater than 0".to_string(),
            ));
        }
        if self.smoothing.measurement_noise <= 0.0 {
            return Err(Error::ConfigError(
                "Measurement noise covariance must be greater than 0".to_string(),
            ));
        }
        if self.smoothing.history_size < SMOOTHING_WINDOW {
            return Err(Error::ConfigError(format!(
                "Gaze history size must be at least {}",
                SMOOTHING_WINDOW
            )));
        }

        // Validate detection parameters
        if self.detection.min_event_duration_sec <= 0.0 {
            return Err(Error::ConfigError(
                "Minimum event duration must be greater than 0".to_string(),
            ));
        }
        if self.detection.target_fps == 0 {
            return Err(Error::ConfigError("Target FPS must be greater than 0".to_string()));
        }
        if self.detection.max_frame_dimension == 0 {
            return Err(Error::ConfigError(
                "Maximum frame dimension must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Attention Tracking Configuration

# Fixed detection thresholds (degrees)
thresholds:
  eye_horizontal: 8.0
  eye_vertical: 6.0
  yaw: 30.0
  pitch: 20.0
  roll: 30.0

# Gaze smoothing
smoothing:
  process_noise: 0.03
  measurement_noise: 0.1
  history_size: 7

# Violation detection
detection:
  min_event_duration_sec: 0.15
  target_fps: 15
  max_frame_dimension: 960
"#;
