//! Noise generators for audio synthesis.

mod white;

pub use white::Noise;
