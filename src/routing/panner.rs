//! Stereo placement of a single child.

use log::debug;

use crate::{Context, Error, IntoNode, Node, Operand, Resolved, Result, Synthesize};

/// Places a child in the stereo field with a linear pan law.
///
/// Pan runs from 0.0 (hard left) through 0.5 (centre) to 1.0 (hard right).
/// A scalar pan is used as is; a mono modulator node is read as a [-1, 1]
/// signal and remapped onto [0, 1].
///
/// A mono child is split as `((1 - pan) * x, pan * x)`. A stereo child is
/// balanced instead: panning right of centre attenuates the left channel by
/// `1 - b`, panning left attenuates the right channel by `1 + b`, where
/// `b = (pan - 0.5) * 2`.
///
/// Once the child reports it is done it is dropped; the panner then outputs
/// silence and reports that it is done as well.
///
/// # Examples
///
/// ```
/// use unitgen::{Node, Oscillator, Panner, Tick};
///
/// let tone = Node::new(Oscillator::sine(440.0));
/// let sweep = Node::new(Oscillator::sine(0.25));
/// let panned = Node::new(Panner::new(tone, sweep).unwrap());
///
/// let block = panned.generate(Tick::new(0), 256, 44100.0).unwrap();
/// assert_eq!(block.samples.len(), 512);
/// ```
pub struct Panner {
    source: Option<Node>,
    pan: Operand,
}

/// Accepts a pan control: any scalar, or a mono node.
fn check_pan(pan: Operand) -> Result<Operand> {
    match pan.channels() {
        None | Some(1) => Ok(pan),
        Some(found) => Err(Error::ChannelMismatch { expected: 1, found }),
    }
}

impl Panner {
    /// # Errors
    ///
    /// [`Error::UnsupportedChannels`] for a child wider than stereo and
    /// [`Error::ChannelMismatch`] for a pan modulator that is not mono.
    pub fn new(source: impl IntoNode, pan: impl Into<Operand>) -> Result<Self> {
        let mut panner = Self {
            source: None,
            pan: check_pan(pan.into())?,
        };
        panner.set_source(source)?;
        Ok(panner)
    }

    /// Replaces the child.
    pub fn set_source(&mut self, source: impl IntoNode) -> Result<()> {
        let source = source.into_node();
        match source.channels() {
            1 | 2 => {
                self.source = Some(source);
                Ok(())
            }
            other => Err(Error::UnsupportedChannels(other)),
        }
    }

    pub fn source(&self) -> Option<&Node> {
        self.source.as_ref()
    }

    pub fn set_pan(&mut self, pan: impl Into<Operand>) -> Result<()> {
        self.pan = check_pan(pan.into())?;
        Ok(())
    }

    /// Back to the centre.
    pub fn reset_pan(&mut self) {
        self.pan = Operand::Scalar(0.5);
    }

    pub fn pan(&self) -> &Operand {
        &self.pan
    }

    /// Pan position of `frame` in [0, 1].
    fn pan_at(&self, resolved: &Resolved, frame: usize) -> f64 {
        let pan = match self.pan {
            Operand::Scalar(pan) => pan,
            Operand::Node(_) => resolved.at(frame) / 2.0 + 0.5,
        };
        pan.clamp(0.0, 1.0)
    }
}

impl Synthesize for Panner {
    fn synthesize(&mut self, ctx: &Context) -> Result<Vec<f64>> {
        let pan = self.pan.resolve(ctx)?;
        let Some(source) = &self.source else {
            return Ok(vec![0.0; ctx.num_frames * 2]);
        };

        let block = source.pull(ctx)?;
        let channels = source.channels();
        let mut samples = block.samples;
        samples.resize(ctx.num_frames * channels, 0.0);

        let output = if channels == 1 {
            samples
                .iter()
                .enumerate()
                .flat_map(|(frame, &x)| {
                    let pan = self.pan_at(&pan, frame);
                    [(1.0 - pan) * x, pan * x]
                })
                .collect()
        } else {
            samples
                .chunks_exact(2)
                .enumerate()
                .flat_map(|(frame, lr)| {
                    let balance = (self.pan_at(&pan, frame) - 0.5) * 2.0;
                    if balance > 0.0 {
                        [lr[0] * (1.0 - balance), lr[1]]
                    } else {
                        [lr[0], lr[1] * (1.0 + balance)]
                    }
                })
                .collect()
        };

        if !block.continues {
            debug!("panner dropping finished source");
            self.source = None;
        }
        Ok(output)
    }

    fn channels(&self) -> usize {
        2
    }

    fn is_exhausted(&self) -> bool {
        self.source.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::{WaveBuffer, WaveGenerator};
    use crate::{Tick, Zero};

    fn clip(samples: Vec<f64>, channels: usize) -> Node {
        let buffer = WaveBuffer::from_samples(samples, channels).unwrap();
        Node::new(WaveGenerator::new(buffer).unwrap().with_loop(true)).into_node()
    }

    fn pan_mono(pan: f64) -> Vec<f64> {
        let node = Node::new(Panner::new(clip(vec![0.8], 1), pan).unwrap());
        node.generate(Tick::new(0), 1, 10.0).unwrap().samples
    }

    #[test]
    fn test_mono_boundaries() {
        assert_eq!(pan_mono(0.0), vec![0.8, 0.0]);
        assert_eq!(pan_mono(1.0), vec![0.0, 0.8]);
        assert_eq!(pan_mono(0.5), vec![0.4, 0.4]);
    }

    #[test]
    fn test_stereo_balance_attenuates() {
        let balance = |pan: f64| {
            let node = Node::new(Panner::new(clip(vec![1.0, 1.0], 2), pan).unwrap());
            node.generate(Tick::new(0), 1, 10.0).unwrap().samples
        };
        assert_eq!(balance(0.5), vec![1.0, 1.0]);
        assert_eq!(balance(0.75), vec![0.5, 1.0]);
        assert_eq!(balance(0.25), vec![1.0, 0.5]);
        assert_eq!(balance(1.0), vec![0.0, 1.0]);
        assert_eq!(balance(0.0), vec![1.0, 0.0]);
    }

    #[test]
    fn test_modulated_pan_is_remapped() {
        // A constant -1 pan signal maps to hard left.
        let modulator = clip(vec![-1.0], 1);
        let node = Node::new(Panner::new(clip(vec![0.5], 1), modulator).unwrap());
        let block = node.generate(Tick::new(0), 2, 10.0).unwrap();
        assert_eq!(block.samples, vec![0.5, 0.0, 0.5, 0.0]);
    }

    #[test]
    fn test_rejects_stereo_modulator() {
        let stereo = Node::new(Zero::stereo());
        assert!(matches!(
            Panner::new(clip(vec![0.0], 1), stereo),
            Err(Error::ChannelMismatch { expected: 1, found: 2 })
        ));
    }

    #[test]
    fn test_finished_source_is_dropped() {
        let buffer = WaveBuffer::from_samples(vec![1.0, 1.0], 1).unwrap();
        let one_shot = Node::new(WaveGenerator::new(buffer).unwrap());
        let node = Node::new(Panner::new(one_shot, 0.5).unwrap());

        let block = node.generate(Tick::new(0), 3, 10.0).unwrap();
        assert_eq!(block.samples, vec![0.5, 0.5, 0.5, 0.5, 0.0, 0.0]);
        assert!(!block.continues);

        let block = node.generate(Tick::new(1), 2, 10.0).unwrap();
        assert_eq!(block.samples, vec![0.0; 4]);
        assert!(!block.continues);
        assert!(node.with(|p| p.source().is_none()));
    }

    #[test]
    fn test_reset_pan() {
        let mut panner = Panner::new(clip(vec![0.0], 1), 0.1).unwrap();
        panner.reset_pan();
        assert!(matches!(panner.pan(), Operand::Scalar(p) if *p == 0.5));
    }
}
