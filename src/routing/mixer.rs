//! Sums any number of mono or stereo children into one stereo output.

use log::debug;

use super::MonoToStereo;
use crate::{Context, Error, IntoNode, Node, Result, Synthesize};

/// Sums any number of children into one stereo signal.
///
/// Mono children are wrapped in [`MonoToStereo`] when added. A child whose
/// block comes back with `continues == false` still contributes that block
/// and is removed once the sum is complete. The mixer itself never ends.
///
/// # Examples
///
/// ```
/// use unitgen::{Mixer, Node, Oscillator, Tick};
///
/// let mixer = Node::new(Mixer::new().with_gain(0.5));
/// mixer.with(|m| -> unitgen::Result<()> {
///     m.add(Node::new(Oscillator::sine(440.0)).with_duration(0.01))?;
///     m.add(Node::new(Oscillator::sine(660.0)))
/// })
/// .unwrap();
///
/// let block = mixer.generate(Tick::new(0), 1024, 44100.0).unwrap();
/// assert_eq!(block.samples.len(), 2048);
/// // The short voice finished during the block and was pruned.
/// assert_eq!(mixer.with(|m| m.len()), 1);
/// ```
pub struct Mixer {
    children: Vec<Node>,
    gain: f64,
}

impl Mixer {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            gain: 1.0,
        }
    }

    /// Scales the summed output.
    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = gain;
        self
    }

    /// Adds a mono or stereo child.
    pub fn add(&mut self, child: impl IntoNode) -> Result<()> {
        let child = child.into_node();
        let child = match child.channels() {
            1 => Node::new(MonoToStereo::new(child)?).into_node(),
            2 => child,
            other => return Err(Error::UnsupportedChannels(other)),
        };
        self.children.push(child);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn set_gain(&mut self, gain: f64) {
        self.gain = gain;
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

impl Synthesize for Mixer {
    fn synthesize(&mut self, ctx: &Context) -> Result<Vec<f64>> {
        let mut output = vec![0.0; ctx.num_frames * 2];
        let mut finished = Vec::new();

        for (index, child) in self.children.iter().enumerate() {
            let block = child.pull(ctx)?;
            for (out, sample) in output.iter_mut().zip(&block.samples) {
                *out += sample;
            }
            if !block.continues {
                finished.push(index);
            }
        }

        if !finished.is_empty() {
            debug!("mixer removing {} finished child(ren)", finished.len());
            let mut index = 0;
            self.children.retain(|_| {
                let keep = !finished.contains(&index);
                index += 1;
                keep
            });
        }

        if self.gain != 1.0 {
            output.iter_mut().for_each(|s| *s *= self.gain);
        }
        Ok(output)
    }

    fn channels(&self) -> usize {
        2
    }
}
