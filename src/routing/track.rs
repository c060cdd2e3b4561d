//! A bus of voices with its own place in the stereo field.

use super::{Mixer, Panner};
use crate::{Context, IntoNode, Node, Operand, Result, Synthesize};

/// A mixer feeding a panner: a bus that voices can be added to and that
/// sits somewhere in the stereo field.
///
/// # Examples
///
/// ```
/// use unitgen::{Node, Noise, Oscillator, StereoTrack, Tick};
///
/// let track = Node::new(StereoTrack::new(0.25).unwrap());
/// track.with(|t| -> unitgen::Result<()> {
///     t.add(Node::new(Oscillator::triangle(110.0)))?;
///     t.add(Node::new(Noise::new()) * 0.05)
/// })
/// .unwrap();
///
/// let block = track.generate(Tick::new(0), 128, 44100.0).unwrap();
/// assert_eq!(block.samples.len(), 256);
/// ```
pub struct StereoTrack {
    mixer: Node<Mixer>,
    panner: Node<Panner>,
}

impl StereoTrack {
    pub fn new(pan: impl Into<Operand>) -> Result<Self> {
        Self::with_mixer(Mixer::new(), pan)
    }

    /// Builds the track around an existing mixer.
    pub fn with_mixer(mixer: Mixer, pan: impl Into<Operand>) -> Result<Self> {
        let mixer = Node::new(mixer);
        let panner = Node::new(Panner::new(&mixer, pan)?);
        Ok(Self { mixer, panner })
    }

    pub fn add(&mut self, child: impl IntoNode) -> Result<()> {
        self.mixer.with(|mixer| mixer.add(child))
    }

    pub fn set_pan(&mut self, pan: impl Into<Operand>) -> Result<()> {
        self.panner.with(|panner| panner.set_pan(pan))
    }

    pub fn reset_pan(&mut self) {
        self.panner.with(|panner| panner.reset_pan());
    }

    pub fn mixer(&self) -> &Node<Mixer> {
        &self.mixer
    }

    pub fn panner(&self) -> &Node<Panner> {
        &self.panner
    }
}

impl Synthesize for StereoTrack {
    fn synthesize(&mut self, ctx: &Context) -> Result<Vec<f64>> {
        Ok(self.panner.pull(ctx)?.samples)
    }

    fn channels(&self) -> usize {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::{WaveBuffer, WaveGenerator};
    use crate::Tick;

    fn dc(value: f64) -> Node<WaveGenerator<WaveBuffer>> {
        let buffer = WaveBuffer::from_samples(vec![value], 1).unwrap();
        Node::new(WaveGenerator::new(buffer).unwrap().with_loop(true))
    }

    #[test]
    fn test_mixes_then_pans() {
        let mut track = StereoTrack::new(0.0).unwrap();
        track.add(dc(0.25)).unwrap();
        track.add(dc(0.5)).unwrap();
        let node = Node::new(track);
        let block = node.generate(Tick::new(0), 2, 10.0).unwrap();
        // Stereo balance hard left keeps the left channel, mutes the right.
        assert_eq!(block.samples, vec![0.75, 0.0, 0.75, 0.0]);
        assert!(block.continues);
    }

    #[test]
    fn test_pan_controls() {
        let node = Node::new(StereoTrack::new(0.5).unwrap());
        node.with(|t| t.add(dc(1.0))).unwrap();
        node.with(|t| t.set_pan(1.0)).unwrap();
        assert_eq!(node.generate(Tick::new(0), 1, 10.0).unwrap().samples, vec![0.0, 1.0]);

        node.with(|t| t.reset_pan());
        assert_eq!(node.generate(Tick::new(1), 1, 10.0).unwrap().samples, vec![1.0, 1.0]);
        assert_eq!(node.with(|t| t.mixer().with(|m| m.len())), 1);
    }
}
