//! Triangle waveform.

use super::{Waveform, traits::cycle_position};

/// Rises from -1 to 1 over the first half cycle and falls back over the second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Triangle;

impl Waveform for Triangle {
    fn sample(&self, angle: f64) -> f64 {
        let position = cycle_position(angle);
        if position < 0.5 {
            4.0 * position - 1.0
        } else {
            3.0 - 4.0 * position
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_corners() {
        assert_eq!(Triangle.sample(0.0), -1.0);
        assert!((Triangle.sample(PI) - 1.0).abs() < 1e-12);
        assert!(Triangle.sample(FRAC_PI_2).abs() < 1e-12);
    }
}
