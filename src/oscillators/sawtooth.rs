//! Sawtooth waveform.

use super::{Waveform, traits::cycle_position};

/// Rises linearly from -1 to 1 over each cycle, then drops back.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sawtooth;

impl Waveform for Sawtooth {
    fn sample(&self, angle: f64) -> f64 {
        2.0 * cycle_position(angle) - 1.0
    }
}
