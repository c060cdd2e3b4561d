//! Sine waveform.

use super::Waveform;

/// A pure sine: `sin(angle)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sine;

impl Waveform for Sine {
    fn sample(&self, angle: f64) -> f64 {
        angle.sin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_quarter_points() {
        assert_eq!(Sine.sample(0.0), 0.0);
        assert!((Sine.sample(FRAC_PI_2) - 1.0).abs() < 1e-12);
        assert!((Sine.sample(-FRAC_PI_2) + 1.0).abs() < 1e-12);
    }
}
