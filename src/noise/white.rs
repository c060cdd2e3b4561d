//! White noise generator implementation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Context, Result, Synthesize};

/// A white noise generator.
///
/// Every sample of every channel is an independent value drawn uniformly
/// from [-1.0, 1.0]. Apart from the random number generator there is no
/// state to carry between blocks.
pub struct Noise<R: Rng = StdRng> {
    /// Random number generator
    rng: R,
    channels: usize,
}

impl Noise<StdRng> {
    /// Creates a mono noise source seeded from the operating system.
    ///
    /// # Examples
    ///
    /// ```
    /// use unitgen::{Node, Noise, Tick};
    ///
    /// let hiss = Node::new(Noise::new()) * 0.1;
    /// let block = hiss.generate(Tick::new(0), 64, 44100.0).unwrap();
    /// assert!(block.samples.iter().all(|s| s.abs() <= 0.1));
    /// ```
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for Noise<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Noise<R> {
    /// Creates a mono noise source drawing from `rng`.
    ///
    /// # Examples
    ///
    /// ```
    /// use unitgen::Noise;
    /// use rand::SeedableRng;
    ///
    /// let rng = rand::rngs::StdRng::seed_from_u64(42);
    /// let noise = Noise::with_rng(rng).stereo();
    /// ```
    pub fn with_rng(rng: R) -> Self {
        Self { rng, channels: 1 }
    }

    /// Switches to independent left and right channels.
    pub fn stereo(mut self) -> Self {
        self.channels = 2;
        self
    }
}

impl<R: Rng + Send> Synthesize for Noise<R> {
    fn synthesize(&mut self, ctx: &Context) -> Result<Vec<f64>> {
        Ok((0..ctx.num_frames * self.channels)
            .map(|_| self.rng.gen_range(-1.0..=1.0))
            .collect())
    }

    fn channels(&self) -> usize {
        self.channels
    }
}
