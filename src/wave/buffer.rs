//! In-memory wave source.

use super::WaveSource;
use crate::Result;
use crate::error::check_channels;

/// Sample material held entirely in memory.
///
/// Suitable for real-time playback, since reading never blocks.
///
/// # Examples
///
/// ```
/// use unitgen::wave::{WaveBuffer, WaveSource};
///
/// let mut buffer = WaveBuffer::from_samples(vec![0.1, 0.2, 0.3], 1).unwrap();
/// assert_eq!(buffer.get_frames(1, 10).unwrap(), vec![0.2, 0.3]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WaveBuffer {
    samples: Vec<f64>,
    channels: usize,
}

impl WaveBuffer {
    /// Wraps interleaved samples. A trailing partial frame is dropped.
    pub fn from_samples(mut samples: Vec<f64>, channels: usize) -> Result<Self> {
        let channels = check_channels(channels)?;
        samples.truncate(samples.len() - samples.len() % channels);
        Ok(Self { samples, channels })
    }

    /// Copies `num_frames` frames starting at `start` out of another source.
    pub fn from_source(
        source: &mut impl WaveSource,
        start: usize,
        num_frames: usize,
    ) -> Result<Self> {
        let samples = source.get_frames(start, start + num_frames)?;
        Self::from_samples(samples, source.channels())
    }

    /// Loads `num_frames` frames starting at `start` from a WAV file.
    #[cfg(feature = "wav")]
    pub fn from_file(
        path: impl AsRef<std::path::Path>,
        start: usize,
        num_frames: usize,
    ) -> Result<Self> {
        let mut file = super::WaveFile::open(path)?;
        Self::from_source(&mut file, start, num_frames)
    }

    pub fn num_frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

impl WaveSource for WaveBuffer {
    fn get_frames(&mut self, start: usize, end: usize) -> Result<Vec<f64>> {
        let len = self.samples.len();
        let start = (start * self.channels).min(len);
        let end = (end * self.channels).clamp(start, len);
        Ok(self.samples[start..end].to_vec())
    }

    fn channels(&self) -> usize {
        self.channels
    }
}
