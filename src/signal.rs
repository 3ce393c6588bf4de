//! Per-frame signal types produced by the upstream landmark provider.
//!
//! A [`FrameMeasurement`] is the raw per-frame input: iris displacement ratios,
//! the six pose landmark points, and the detector's face count. The pipeline
//! derives a [`FrameSignal`] from it (smoothed gaze angles plus head-pose
//! angles) and feeds that to violation tracking. Absent fields mean the
//! detector could not produce a reliable reading for that frame; they are
//! never substituted with zero.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::pose_estimation::FaceLandmarks;
use crate::Result;

/// Iris-to-eye-center displacement normalized by eye width, one value per
/// axis, each in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeRatio {
    /// Horizontal displacement ratio, positive toward the subject's right
    pub horizontal: f64,
    /// Vertical displacement ratio, positive downward
    pub vertical: f64,
}

/// Raw per-frame measurement from the landmark provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMeasurement {
    /// Video timestamp in seconds, monotonically non-decreasing across frames
    pub timestamp: f64,
    /// Gaze displacement ratios; absent when eyes are closed, the iris is out
    /// of frame, or the measured eye width is below the validity floor
    pub gaze_ratio: Option<GazeRatio>,
    /// The six 2D pose landmark points; absent when no face mesh was found
    pub landmarks: Option<FaceLandmarks>,
    /// Number of distinct faces found by the detector
    pub num_faces: usize,
}

/// Derived per-frame signal consumed by violation tracking
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSignal {
    /// Video timestamp in seconds
    pub timestamp: f64,
    /// Smoothed horizontal gaze angle in degrees
    pub gaze_h: Option<f64>,
    /// Smoothed vertical gaze angle in degrees
    pub gaze_v: Option<f64>,
    /// Head yaw in degrees
    pub yaw: Option<f64>,
    /// Head pitch in degrees
    pub pitch: Option<f64>,
    /// Head roll in degrees; carried for diagnostics, not evaluated
    pub roll: Option<f64>,
    /// Number of distinct faces found by the detector
    pub num_faces: usize,
}

/// Read a JSON-lines file of [`FrameMeasurement`]s, one object per line.
/// Blank lines are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a line fails to parse.
pub fn read_measurements<P: AsRef<Path>>(path: P) -> Result<Vec<FrameMeasurement>> {
    let reader = BufReader::new(File::open(path)?);
    let mut measurements = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        measurements.push(serde_json::from_str(&line)?);
    }
    Ok(measurements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_round_trip() {
        let measurement = FrameMeasurement {
            timestamp: 1.25,
            gaze_ratio: Some(GazeRatio {
                horizontal: 0.3,
                vertical: -0.1,
            }),
            landmarks: None,
            num_faces: 1,
        };

        let json = serde_json::to_string(&measurement).unwrap();
        let parsed: FrameMeasurement = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, measurement);
    }

    #[test]
    fn test_absent_fields_deserialize_as_none() {
        let json = r#"{"timestamp": 0.0, "gaze_ratio": null, "landmarks": null, "num_faces": 0}"#;
        let parsed: FrameMeasurement = serde_json::from_str(json).unwrap();
        assert!(parsed.gaze_ratio.is_none());
        assert!(parsed.landmarks.is_none());
        assert_eq!(parsed.num_faces, 0);
    }
}
