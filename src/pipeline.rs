//! Per-stream processing pipeline.
//!
//! Owns one smoother, one pose solver, and one violation tracker, and drives
//! them over a sequential stream of frame measurements. Construct a fresh
//! pipeline per video; the internal state is strictly ordered by input frame
//! order and must not be shared across streams.

use std::time::Instant;

use log::debug;
use serde::Serialize;

use crate::config::{Config, Thresholds};
use crate::constants::PROGRESS_LOG_INTERVAL;
use crate::filters::AngleSmoother;
use crate::pose_estimation::HeadPoseSolver;
use crate::report::{build_gesture_report, GestureGroup};
use crate::signal::{FrameMeasurement, FrameSignal};
use crate::violation_tracker::ViolationTracker;

/// Wall-clock and stream statistics for a processed session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessingMetadata {
    /// Wall-clock processing time, whole seconds
    pub processing_time_sec: u64,
    /// Last observed video timestamp, whole seconds
    pub video_duration_sec: u64,
    /// Number of frames fed to the pipeline
    pub frames_processed: u64,
}

/// Final session report: gesture groups plus the run's configuration echo
/// and processing statistics
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    /// Gesture groups with chronological occurrences; empty groups omitted
    pub gestures: Vec<GestureGroup>,
    /// Thresholds the run was evaluated against
    pub thresholds_used: Thresholds,
    /// Processing statistics
    pub processing_metadata: ProcessingMetadata,
}

/// Signal-to-event pipeline for one video stream
pub struct AttentionPipeline {
    smoother: AngleSmoother,
    solver: HeadPoseSolver,
    tracker: ViolationTracker,
    thresholds: Thresholds,
    frames_processed: u64,
    last_timestamp: f64,
    started: Instant,
}

impl AttentionPipeline {
    /// Create a pipeline for a stream with the given frame dimensions
    #[must_use]
    pub fn new(config: &Config, frame_width: f64, frame_height: f64) -> Self {
        Self {
            smoother: AngleSmoother::new(&config.smoothing),
            solver: HeadPoseSolver::new(frame_width, frame_height),
            tracker: ViolationTracker::new(
                config.thresholds,
                config.detection.min_event_duration_sec,
            ),
            thresholds: config.thresholds,
            frames_processed: 0,
            last_timestamp: 0.0,
            started: Instant::now(),
        }
    }

    /// Derive a frame signal from a raw measurement and feed it to violation
    /// tracking.
    ///
    /// Measurements must arrive in timestamp order. An absent gaze ratio
    /// leaves the smoother state untouched; absent landmarks yield an absent
    /// pose for the frame.
    pub fn process(&mut self, measurement: &FrameMeasurement) -> FrameSignal {
        let (gaze_h, gaze_v) = match measurement.gaze_ratio {
            Some(ratio) => {
                let (h, v) = self.smoother.smooth(ratio.horizontal, ratio.vertical);
                (Some(h), Some(v))
            }
            None => (None, None),
        };

        let pose = measurement
            .landmarks
            .as_ref()
            .and_then(|landmarks| self.solver.estimate(landmarks));

        let signal = FrameSignal {
            timestamp: measurement.timestamp,
            gaze_h,
            gaze_v,
            yaw: pose.map(|p| p.yaw),
            pitch: pose.map(|p| p.pitch),
            roll: pose.map(|p| p.roll),
            num_faces: measurement.num_faces,
        };
        self.process_signal(&signal);
        signal
    }

    /// Feed a pre-derived frame signal directly to violation tracking
    pub fn process_signal(&mut self, signal: &FrameSignal) {
        self.tracker.update(signal);
        self.frames_processed += 1;
        self.last_timestamp = signal.timestamp;

        if self.frames_processed % PROGRESS_LOG_INTERVAL == 0 {
            debug!(
                "Processed {} frames ({:.1}s): gaze_h={:?}, gaze_v={:?}, yaw={:?}, pitch={:?}, num_faces={}",
                self.frames_processed,
                signal.timestamp,
                signal.gaze_h,
                signal.gaze_v,
                signal.yaw,
                signal.pitch,
                signal.num_faces
            );
        }
    }

    /// The tracker's state, for inspection mid-stream
    #[must_use]
    pub fn tracker(&self) -> &ViolationTracker {
        &self.tracker
    }

    /// Flush any still-active violation spans and assemble the session report
    #[must_use]
    pub fn finalize(mut self) -> SessionReport {
        self.tracker.finalize();

        let gestures = build_gesture_report(self.tracker.events());
        let metadata = ProcessingMetadata {
            processing_time_sec: self.started.elapsed().as_secs_f64().round() as u64,
            video_duration_sec: self.last_timestamp.max(0.0).round() as u64,
            frames_processed: self.frames_processed,
        };

        SessionReport {
            gestures,
            thresholds_used: self.thresholds,
            processing_metadata: metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::GazeRatio;

    #[test]
    fn test_absent_ratio_leaves_gaze_absent() {
        let config = Config::default();
        let mut pipeline = AttentionPipeline::new(&config, 960.0, 540.0);

        let signal = pipeline.process(&FrameMeasurement {
            timestamp: 0.0,
            gaze_ratio: None,
            landmarks: None,
            num_faces: 1,
        });

        assert!(signal.gaze_h.is_none());
        assert!(signal.yaw.is_none());
    }

    #[test]
    fn test_metadata_counts_frames() {
        let config = Config::default();
        let mut pipeline = AttentionPipeline::new(&config, 960.0, 540.0);

        for i in 0..30 {
            pipeline.process(&FrameMeasurement {
                timestamp: f64::from(i) / 15.0,
                gaze_ratio: Some(GazeRatio {
                    horizontal: 0.0,
                    vertical: 0.0,
                }),
                landmarks: None,
                num_faces: 1,
            });
        }

        let report = pipeline.finalize();
        assert_eq!(report.processing_metadata.frames_processed, 30);
        assert_eq!(report.processing_metadata.video_duration_sec, 2);
        assert!(report.gestures.is_empty());
    }
}
