use nalgebra::{Matrix2, RowVector2, Vector2};

/// Two-state linear Kalman filter for a single angle axis.
///
/// State is [angle, angular velocity]; only the angle is measured. The first
/// measurement seeds the state directly (zero velocity, zero covariance) and
/// is returned unfiltered, avoiding the transient ramp-up bias of an
/// arbitrary prior.
pub struct AxisKalman {
    // State: [position, velocity]
    state: Vector2<f64>,
    // State covariance
    covariance: Matrix2<f64>,
    // Process noise
    process_noise: Matrix2<f64>,
    // Measurement noise (scalar measurement)
    measurement_noise: f64,
    // State transition matrix
    transition: Matrix2<f64>,
    // Measurement matrix
    measurement: RowVector2<f64>,
    initialized: bool,
}

impl AxisKalman {
    /// Create a filter with the given noise covariances
    #[must_use]
    pub fn new(process_noise: f64, measurement_noise: f64) -> Self {
        Self {
            state: Vector2::zeros(),
            covariance: Matrix2::zeros(),
            process_noise: Matrix2::identity() * process_noise,
            measurement_noise,
            transition: Matrix2::new(1.0, 1.0, 0.0, 1.0),
            measurement: RowVector2::new(1.0, 0.0),
            initialized: false,
        }
    }

    /// Filter one measurement and return the corrected position estimate.
    ///
    /// A non-finite intermediate result returns the raw measurement and
    /// leaves the previous filter state intact.
    pub fn filter(&mut self, value: f64) -> f64 {
        if !self.initialized {
            self.state = Vector2::new(value, 0.0);
            self.covariance = Matrix2::zeros();
            self.initialized = true;
            return value;
        }

        let prev_state = self.state;
        let prev_covariance = self.covariance;

        // Predict
        self.state = self.transition * self.state;
        self.covariance =
            self.transition * self.covariance * self.transition.transpose() + self.process_noise;

        // Correct
        let innovation = value - (self.measurement * self.state)[0];
        let innovation_cov =
            (self.measurement * self.covariance * self.measurement.transpose())[0] + self.measurement_noise;

        if !innovation_cov.is_finite() || innovation_cov.abs() < f64::EPSILON {
            self.state = prev_state;
            self.covariance = prev_covariance;
            return value;
        }

        let gain = self.covariance * self.measurement.transpose() / innovation_cov;
        self.state += gain * innovation;
        self.covariance = (Matrix2::identity() - gain * self.measurement) * self.covariance;

        let position = self.state[0];
        if !position.is_finite() {
            self.state = prev_state;
            self.covariance = prev_covariance;
            return value;
        }

        position
    }

    /// Reset filter state; the next measurement seeds the filter again
    pub fn reset(&mut self) {
        self.state = Vector2::zeros();
        self.covariance = Matrix2::zeros();
        self.initialized = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_measurement_passes_through() {
        let mut filter = AxisKalman::new(0.03, 0.1);
        assert_eq!(filter.filter(12.5), 12.5);
    }

    #[test]
    fn test_constant_input_is_stable() {
        let mut filter = AxisKalman::new(0.03, 0.1);
        for _ in 0..10 {
            filter.filter(5.0);
        }
        assert!((filter.filter(5.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_is_smoothed() {
        let mut filter = AxisKalman::new(0.03, 0.1);
        filter.filter(0.0);
        let out = filter.filter(10.0);
        assert!(out > 0.0 && out < 10.0);
    }

    #[test]
    fn test_nan_measurement_does_not_corrupt_state() {
        let mut filter = AxisKalman::new(0.03, 0.1);
        filter.filter(3.0);
        let bad = filter.filter(f64::NAN);
        assert!(bad.is_nan());

        // Filter keeps producing finite output from prior state
        let out = filter.filter(3.0);
        assert!(out.is_finite());
        assert!((out - 3.0).abs() < 1.0);
    }

    #[test]
    fn test_reset_reseeds() {
        let mut filter = AxisKalman::new(0.03, 0.1);
        filter.filter(8.0);
        filter.filter(9.0);
        filter.reset();
        assert_eq!(filter.filter(-4.0), -4.0);
    }
}
