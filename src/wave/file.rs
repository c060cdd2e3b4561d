//! Streaming WAV file source.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec};

use super::WaveSource;
use crate::Result;
use crate::error::check_channels;

/// Reads frames straight from a WAV file on every request.
///
/// Integer PCM of any bit depth and 32-bit float are converted to [-1, 1].
/// Each request seeks, so this source may block on disk; load a
/// [`WaveBuffer`](super::WaveBuffer) for real-time playback.
pub struct WaveFile {
    reader: WavReader<BufReader<File>>,
    spec: WavSpec,
    num_frames: usize,
}

impl WaveFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let reader = WavReader::open(path)?;
        let spec = reader.spec();
        check_channels(usize::from(spec.channels))?;
        let num_frames = reader.duration() as usize;
        Ok(Self {
            reader,
            spec,
            num_frames,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.spec.sample_rate
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }
}

impl WaveSource for WaveFile {
    fn get_frames(&mut self, start: usize, end: usize) -> Result<Vec<f64>> {
        let start = start.min(self.num_frames);
        let end = end.clamp(start, self.num_frames);
        let count = (end - start) * self.channels();
        if count == 0 {
            return Ok(Vec::new());
        }

        self.reader.seek(start as u32)?;
        let samples = match self.spec.sample_format {
            SampleFormat::Float => self
                .reader
                .samples::<f32>()
                .take(count)
                .map(|s| s.map(f64::from))
                .collect::<std::result::Result<Vec<_>, _>>()?,
            SampleFormat::Int => {
                let max_value = (1_i64 << (self.spec.bits_per_sample - 1)) as f64;
                self.reader
                    .samples::<i32>()
                    .take(count)
                    .map(|s| s.map(|v| f64::from(v) / max_value))
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
        };
        Ok(samples)
    }

    fn channels(&self) -> usize {
        usize::from(self.spec.channels)
    }
}
