//! Gaze signal smoothing.
//!
//! Raw iris displacement ratios are noisy at the per-frame level; this module
//! turns them into stable angle estimates without introducing unacceptable
//! lag. Each axis runs through an independent two-state Kalman filter and a
//! recency-weighted rolling average.

/// Two-state (position, velocity) Kalman filter for a single angle axis
pub mod kalman;

/// Arcsine angle derivation plus Kalman and weighted-history smoothing
pub mod smoother;

pub use kalman::AxisKalman;
pub use smoother::AngleSmoother;
