//! Attention-deviation detection for remote-proctoring review.
//!
//! This library converts a per-frame stream of facial-geometry measurements
//! (gaze displacement ratios, head-pose landmarks, face count) into a
//! timestamped timeline of sustained attention-deviation events:
//! 1. Gaze smoothing: arcsine angle derivation plus per-axis Kalman filtering
//!    and a recency-weighted rolling average
//! 2. Head pose recovery from six landmarks via an iterative `PnP` solve
//! 3. Duration-aware violation tracking with per-category debounce
//! 4. Gesture-occurrence report assembly
//!
//! Frame acquisition and the facial-landmark detector are external: callers
//! feed [`signal::FrameMeasurement`]s (or pre-derived [`signal::FrameSignal`]s)
//! in timestamp order and finalize at end of stream.
//!
//! # Examples
//!
//! ## Processing a measurement stream
//!
//! ```
//! use proctor_signal::config::Config;
//! use proctor_signal::pipeline::AttentionPipeline;
//! use proctor_signal::signal::{FrameMeasurement, GazeRatio};
//!
//! let config = Config::default();
//! let mut pipeline = AttentionPipeline::new(&config, 960.0, 540.0);
//!
//! // A subject looking hard to the right for two seconds
//! for i in 0..30 {
//!     pipeline.process(&FrameMeasurement {
//!         timestamp: f64::from(i) / 15.0,
//!         gaze_ratio: Some(GazeRatio { horizontal: 0.4, vertical: 0.0 }),
//!         landmarks: None,
//!         num_faces: 1,
//!     });
//! }
//!
//! let report = pipeline.finalize();
//! assert_eq!(report.gestures[0].name, "eye_movement");
//! assert_eq!(report.gestures[0].occurrence[0].direction, "right");
//! ```
//!
//! ## Feeding pre-derived signals
//!
//! ```
//! use proctor_signal::config::Thresholds;
//! use proctor_signal::signal::FrameSignal;
//! use proctor_signal::violation_tracker::{ViolationCategory, ViolationTracker};
//!
//! let mut tracker = ViolationTracker::new(Thresholds::default(), 0.15);
//! for i in 0..10 {
//!     tracker.update(&FrameSignal {
//!         timestamp: f64::from(i) * 0.1,
//!         gaze_h: None,
//!         gaze_v: None,
//!         yaw: Some(42.0),
//!         pitch: None,
//!         roll: None,
//!         num_faces: 1,
//!     });
//! }
//! tracker.finalize();
//! assert_eq!(tracker.count(ViolationCategory::HeadRight), 1);
//! ```

/// Configuration management
pub mod config;

/// Constants used throughout the library
pub mod constants;

/// Error types and result handling
pub mod error;

/// Gaze signal smoothing
pub mod filters;

/// Per-stream processing pipeline
pub mod pipeline;

/// Head pose recovery from sparse facial landmarks
pub mod pose_estimation;

/// Gesture-occurrence report assembly
pub mod report;

/// Per-frame signal types and the measurement-file reader
pub mod signal;

/// Small numeric helpers
pub mod util;

/// Duration-aware violation tracking
pub mod violation_tracker;

pub use error::{Error, Result};
