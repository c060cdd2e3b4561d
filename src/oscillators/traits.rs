//! Core trait definitions for oscillators.

/// The shape an oscillator traces over one cycle.
///
/// Implementors map an unbounded phase angle in radians to a sample in
/// [-1, 1]. The oscillator owns the phase accumulator, so waveforms are
/// stateless and cheap to copy.
pub trait Waveform: Send {
    fn sample(&self, angle: f64) -> f64;
}

/// Position within the current cycle in [0, 1).
pub(crate) fn cycle_position(angle: f64) -> f64 {
    (angle / std::f64::consts::TAU).rem_euclid(1.0)
}
