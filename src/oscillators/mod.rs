//! Oscillators for audio synthesis.
//!
//! One phase-accumulating [`Oscillator`] drives any [`Waveform`]. Frequency
//! and phase may be constants or mono modulator nodes.

mod oscillator;
mod sawtooth;
mod sine;
mod square;
mod traits;
mod triangle;

pub use oscillator::Oscillator;
pub use sawtooth::Sawtooth;
pub use sine::Sine;
pub use square::Square;
pub use traits::Waveform;
pub use triangle::Triangle;
