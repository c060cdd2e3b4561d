//! Playback of finite sample material.
//!
//! A [`WaveSource`] hands out arbitrary frame ranges of recorded audio;
//! [`WaveGenerator`] turns one into a node with transport controls, and
//! [`SpeedModulator`] changes its playback rate by resampling.

mod buffer;
#[cfg(feature = "wav")]
mod file;
mod generator;
mod speed;

pub use buffer::WaveBuffer;
#[cfg(feature = "wav")]
pub use file::WaveFile;
pub use generator::{EndPolicy, WaveGenerator};
pub use speed::SpeedModulator;

use crate::Result;

/// Random access to interleaved sample frames.
pub trait WaveSource: Send {
    /// Interleaved samples for frames `start..end`, in [-1, 1].
    ///
    /// Requests past the end are truncated rather than rejected, so the
    /// result may be shorter than asked for (or empty), never longer.
    fn get_frames(&mut self, start: usize, end: usize) -> Result<Vec<f64>>;

    fn channels(&self) -> usize;
}

impl<S: WaveSource + ?Sized> WaveSource for Box<S> {
    fn get_frames(&mut self, start: usize, end: usize) -> Result<Vec<f64>> {
        (**self).get_frames(start, end)
    }

    fn channels(&self) -> usize {
        (**self).channels()
    }
}
