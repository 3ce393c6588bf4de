//! Duration-aware violation tracking.
//!
//! Converts instantaneous per-frame threshold comparisons into discrete
//! timestamped events. Each violation category runs its own independent
//! inactive/active state machine; spans shorter than the configured minimum
//! duration are discarded as single-frame noise. An absent measurement can
//! neither start nor sustain a violation.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::signal::FrameSignal;
use crate::util::round_decimals;

const CATEGORY_COUNT: usize = 10;

/// The closed set of violation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    GazeLeft,
    GazeRight,
    GazeUp,
    GazeDown,
    HeadLeft,
    HeadRight,
    HeadUp,
    HeadDown,
    FaceMissing,
    MultipleFaces,
}

impl ViolationCategory {
    /// All categories, in evaluation order
    pub const ALL: [ViolationCategory; CATEGORY_COUNT] = [
        ViolationCategory::GazeLeft,
        ViolationCategory::GazeRight,
        ViolationCategory::GazeUp,
        ViolationCategory::GazeDown,
        ViolationCategory::HeadLeft,
        ViolationCategory::HeadRight,
        ViolationCategory::HeadUp,
        ViolationCategory::HeadDown,
        ViolationCategory::FaceMissing,
        ViolationCategory::MultipleFaces,
    ];

    /// Stable string tag for this category
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationCategory::GazeLeft => "gaze_left",
            ViolationCategory::GazeRight => "gaze_right",
            ViolationCategory::GazeUp => "gaze_up",
            ViolationCategory::GazeDown => "gaze_down",
            ViolationCategory::HeadLeft => "head_left",
            ViolationCategory::HeadRight => "head_right",
            ViolationCategory::HeadUp => "head_up",
            ViolationCategory::HeadDown => "head_down",
            ViolationCategory::FaceMissing => "face_missing",
            ViolationCategory::MultipleFaces => "multiple_faces",
        }
    }

    /// Direction label for head/gaze categories, `None` for presence categories
    #[must_use]
    pub fn direction(self) -> Option<&'static str> {
        match self {
            ViolationCategory::GazeLeft | ViolationCategory::HeadLeft => Some("left"),
            ViolationCategory::GazeRight | ViolationCategory::HeadRight => Some("right"),
            ViolationCategory::GazeUp | ViolationCategory::HeadUp => Some("up"),
            ViolationCategory::GazeDown | ViolationCategory::HeadDown => Some("down"),
            ViolationCategory::FaceMissing | ViolationCategory::MultipleFaces => None,
        }
    }

    /// Whether this category measures an angle (and therefore an intensity)
    #[must_use]
    pub fn is_angular(self) -> bool {
        !matches!(
            self,
            ViolationCategory::FaceMissing | ViolationCategory::MultipleFaces
        )
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finalized violation span
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViolationEvent {
    /// Violation category
    pub category: ViolationCategory,
    /// Video timestamp at which the threshold was first exceeded, seconds
    pub start_time: f64,
    /// Sustained duration in seconds, rounded to one decimal
    pub duration: f64,
    /// Peak absolute angle in degrees over the span; `None` for presence
    /// categories
    pub intensity: Option<f64>,
}

/// Per-category tracking state. When `active` is false the remaining fields
/// are stale and must not be read.
#[derive(Debug, Clone, Copy, Default)]
struct ViolationState {
    active: bool,
    start_time: f64,
    duration: f64,
    max_intensity: f64,
}

/// Per-category debounce state machines over a frame signal stream.
///
/// Stateful across frames; construct one per video stream and call
/// [`ViolationTracker::finalize`] at end of stream so a still-active span is
/// not lost.
pub struct ViolationTracker {
    thresholds: Thresholds,
    min_event_duration: f64,
    states: [ViolationState; CATEGORY_COUNT],
    events: Vec<ViolationEvent>,
    counts: [u32; CATEGORY_COUNT],
    timestamps: [Vec<f64>; CATEGORY_COUNT],
    max_intensities: [f64; CATEGORY_COUNT],
}

impl ViolationTracker {
    /// Create a tracker with fixed thresholds and debounce floor
    #[must_use]
    pub fn new(thresholds: Thresholds, min_event_duration: f64) -> Self {
        Self {
            thresholds,
            min_event_duration,
            states: [ViolationState::default(); CATEGORY_COUNT],
            events: Vec::new(),
            counts: [0; CATEGORY_COUNT],
            timestamps: std::array::from_fn(|_| Vec::new()),
            max_intensities: [0.0; CATEGORY_COUNT],
        }
    }

    /// Evaluate one frame signal against every category.
    ///
    /// Frames must arrive in timestamp order; an absent measurement makes the
    /// conditions on that axis false, ending any active violation there.
    pub fn update(&mut self, signal: &FrameSignal) {
        let t = signal.timestamp;
        let th = self.thresholds;

        let gaze_intensity_h = signal.gaze_h.map_or(0.0, f64::abs);
        let gaze_intensity_v = signal.gaze_v.map_or(0.0, f64::abs);
        let yaw_intensity = signal.yaw.map_or(0.0, f64::abs);
        let pitch_intensity = signal.pitch.map_or(0.0, f64::abs);

        self.check(
            ViolationCategory::GazeLeft,
            signal.gaze_h.map_or(false, |g| g < -th.eye_horizontal),
            t,
            gaze_intensity_h,
        );
        self.check(
            ViolationCategory::GazeRight,
            signal.gaze_h.map_or(false, |g| g > th.eye_horizontal),
            t,
            gaze_intensity_h,
        );
        self.check(
            ViolationCategory::GazeUp,
            signal.gaze_v.map_or(false, |g| g < -th.eye_vertical),
            t,
            gaze_intensity_v,
        );
        self.check(
            ViolationCategory::GazeDown,
            signal.gaze_v.map_or(false, |g| g > th.eye_vertical),
            t,
            gaze_intensity_v,
        );
        self.check(
            ViolationCategory::HeadLeft,
            signal.yaw.map_or(false, |y| y < -th.yaw),
            t,
            yaw_intensity,
        );
        self.check(
            ViolationCategory::HeadRight,
            signal.yaw.map_or(false, |y| y > th.yaw),
            t,
            yaw_intensity,
        );
        self.check(
            ViolationCategory::HeadUp,
            signal.pitch.map_or(false, |p| p < -th.pitch),
            t,
            pitch_intensity,
        );
        self.check(
            ViolationCategory::HeadDown,
            signal.pitch.map_or(false, |p| p > th.pitch),
            t,
            pitch_intensity,
        );
        self.check(ViolationCategory::FaceMissing, signal.num_faces == 0, t, 0.0);
        self.check(ViolationCategory::MultipleFaces, signal.num_faces > 1, t, 0.0);
    }

    /// Force-end every still-active violation at end of stream
    pub fn finalize(&mut self) {
        for category in ViolationCategory::ALL {
            if self.states[category.index()].active {
                self.end_violation(category);
            }
        }
    }

    /// Finalized events, chronological within each category
    #[must_use]
    pub fn events(&self) -> &[ViolationEvent] {
        &self.events
    }

    /// Consume the tracker, returning the finalized events
    #[must_use]
    pub fn into_events(self) -> Vec<ViolationEvent> {
        self.events
    }

    /// Number of reported events for a category
    #[must_use]
    pub fn count(&self, category: ViolationCategory) -> u32 {
        self.counts[category.index()]
    }

    /// Start timestamps of reported events for a category, rounded to two
    /// decimals
    #[must_use]
    pub fn timestamps(&self, category: ViolationCategory) -> &[f64] {
        &self.timestamps[category.index()]
    }

    /// Running peak intensity observed for a category, reported or not
    #[must_use]
    pub fn max_intensity(&self, category: ViolationCategory) -> f64 {
        self.max_intensities[category.index()]
    }

    fn check(&mut self, category: ViolationCategory, condition: bool, timestamp: f64, intensity: f64) {
        let active = self.states[category.index()].active;

        if condition {
            if active {
                self.update_violation(category, timestamp, intensity);
            } else {
                self.start_violation(category, timestamp, intensity);
            }
        } else if active {
            self.end_violation(category);
        }
    }

    /// Only entry point for the inactive -> active transition; records the
    /// exact timestamp the threshold was first exceeded
    fn start_violation(&mut self, category: ViolationCategory, timestamp: f64, intensity: f64) {
        self.states[category.index()] = ViolationState {
            active: true,
            start_time: timestamp,
            duration: 0.0,
            max_intensity: intensity,
        };
    }

    fn update_violation(&mut self, category: ViolationCategory, timestamp: f64, intensity: f64) {
        let state = &mut self.states[category.index()];
        state.duration = timestamp - state.start_time;
        state.max_intensity = state.max_intensity.max(intensity);
        self.max_intensities[category.index()] =
            self.max_intensities[category.index()].max(state.max_intensity);
    }

    fn end_violation(&mut self, category: ViolationCategory) {
        let state = self.states[category.index()];

        if state.active && state.duration >= self.min_event_duration {
            self.counts[category.index()] += 1;
            self.timestamps[category.index()].push(round_decimals(state.start_time, 2));

            let intensity = if category.is_angular() {
                Some(state.max_intensity)
            } else {
                None
            };
            let event = ViolationEvent {
                category,
                start_time: state.start_time,
                duration: round_decimals(state.duration, 1),
                intensity,
            };
            debug!(
                "Recorded {} violation at {:.2}s lasting {:.1}s",
                category, event.start_time, event.duration
            );
            self.events.push(event);
        }

        self.states[category.index()].active = false;
    }
}
