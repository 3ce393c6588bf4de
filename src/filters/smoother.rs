use std::collections::VecDeque;

use crate::config::SmoothingConfig;
use crate::constants::{ARCSINE_COMPRESSION, SMOOTHING_WEIGHTS, SMOOTHING_WINDOW};
use crate::util::round_decimals;

use super::AxisKalman;

/// Converts raw gaze displacement ratios into smoothed angle estimates.
///
/// Each axis passes through an arcsine projection, an independent
/// [`AxisKalman`], and a recency-weighted average over the rolling history.
/// Stateful: one instance per video stream.
pub struct AngleSmoother {
    horizontal: AxisKalman,
    vertical: AxisKalman,
    history: VecDeque<(f64, f64)>,
    history_size: usize,
}

impl AngleSmoother {
    /// Create a smoother from configuration
    #[must_use]
    pub fn new(config: &SmoothingConfig) -> Self {
        Self {
            horizontal: AxisKalman::new(config.process_noise, config.measurement_noise),
            vertical: AxisKalman::new(config.process_noise, config.measurement_noise),
            history: VecDeque::with_capacity(config.history_size),
            history_size: config.history_size,
        }
    }

    /// Smooth one pair of displacement ratios into gaze angles in degrees.
    ///
    /// Ratios are clamped to [-1, 1] before the arcsine projection. Output is
    /// rounded to two decimals.
    pub fn smooth(&mut self, horizontal_ratio: f64, vertical_ratio: f64) -> (f64, f64) {
        let raw_h = ratio_to_angle(horizontal_ratio);
        let raw_v = ratio_to_angle(vertical_ratio);

        let mut h = self.horizontal.filter(raw_h);
        let mut v = self.vertical.filter(raw_v);

        if self.history.len() >= self.history_size {
            self.history.pop_front();
        }
        self.history.push_back((h, v));

        if self.history.len() >= SMOOTHING_WINDOW {
            let recent = self.history.iter().skip(self.history.len() - SMOOTHING_WINDOW);
            let mut weighted_h = 0.0;
            let mut weighted_v = 0.0;
            for (&(sample_h, sample_v), weight) in recent.zip(SMOOTHING_WEIGHTS) {
                weighted_h += sample_h * weight;
                weighted_v += sample_v * weight;
            }
            let total: f64 = SMOOTHING_WEIGHTS.iter().sum();
            h = weighted_h / total;
            v = weighted_v / total;
        }

        (round_decimals(h, 2), round_decimals(v, 2))
    }

    /// Clear filter state and history; the next call seeds the filters again
    pub fn reset(&mut self) {
        self.horizontal.reset();
        self.vertical.reset();
        self.history.clear();
    }
}

/// Arcsine projection from a displacement ratio to an angle in degrees
fn ratio_to_angle(ratio: f64) -> f64 {
    (ratio.clamp(-1.0, 1.0) * ARCSINE_COMPRESSION).asin().to_degrees()
}
