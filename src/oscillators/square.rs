//! Square waveform.

use super::{Waveform, traits::cycle_position};

/// High for the first half of each cycle, low for the second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Square;

impl Waveform for Square {
    fn sample(&self, angle: f64) -> f64 {
        if cycle_position(angle) < 0.5 { 1.0 } else { -1.0 }
    }
}
