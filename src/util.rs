//! Small numeric helpers shared across the pipeline.

/// Round a value to the given number of decimal places
#[must_use]
pub fn round_decimals(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_decimals() {
        assert_eq!(round_decimals(1.2345, 2), 1.23);
        assert_eq!(round_decimals(1.235, 2), 1.24);
        assert_eq!(round_decimals(-0.456, 1), -0.5);
        assert_eq!(round_decimals(7.0, 0), 7.0);
    }
}
