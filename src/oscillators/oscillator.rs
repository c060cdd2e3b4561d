//! Phase-accumulating oscillator.

use std::f64::consts::TAU;

use super::{Sawtooth, Sine, Square, Triangle, Waveform};
use crate::{Context, Operand, Resolved, Result, Synthesize};

/// An oscillator with modulatable frequency and phase.
///
/// Each frame advances an accumulated angle by `2π·f / sample_rate`; the
/// phase operand (radians) is added on top when the waveform is sampled and
/// never folded into the accumulator. The accumulator persists across ticks,
/// so consecutive blocks join without discontinuities.
///
/// # Examples
///
/// ```
/// use unitgen::{Node, Oscillator, Tick};
///
/// // A 440 Hz sine with 5 Hz vibrato of +/- 6 Hz.
/// let vibrato = Node::new(Oscillator::sine(5.0));
/// let osc = Node::new(Oscillator::sine(440.0 + vibrato * 6.0));
///
/// let block = osc.generate(Tick::new(0), 128, 44100.0).unwrap();
/// assert!(block.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
/// ```
pub struct Oscillator<W> {
    waveform: W,
    frequency: Operand,
    phase: Operand,
    /// Integrated frequency in radians, wrapped to one turn between blocks
    accumulated: f64,
}

impl<W: Waveform> Oscillator<W> {
    /// Creates an oscillator starting at angle zero.
    ///
    /// # Arguments
    ///
    /// * `waveform` - Shape to trace
    /// * `frequency` - Frequency in Hz, fixed or a mono modulator node
    pub fn new(waveform: W, frequency: impl Into<Operand>) -> Self {
        Self {
            waveform,
            frequency: frequency.into(),
            phase: Operand::Scalar(0.0),
            accumulated: 0.0,
        }
    }

    /// Sets the phase offset in radians, fixed or a mono modulator node.
    pub fn with_phase(mut self, phase: impl Into<Operand>) -> Self {
        self.phase = phase.into();
        self
    }

    pub fn set_frequency(&mut self, frequency: impl Into<Operand>) {
        self.frequency = frequency.into();
    }

    pub fn frequency(&self) -> &Operand {
        &self.frequency
    }

    pub fn set_phase(&mut self, phase: impl Into<Operand>) {
        self.phase = phase.into();
    }

    pub fn phase(&self) -> &Operand {
        &self.phase
    }

    /// Restarts the cycle from angle zero.
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

impl Oscillator<Sine> {
    pub fn sine(frequency: impl Into<Operand>) -> Self {
        Self::new(Sine, frequency)
    }
}

impl Oscillator<Square> {
    pub fn square(frequency: impl Into<Operand>) -> Self {
        Self::new(Square, frequency)
    }
}

impl Oscillator<Sawtooth> {
    pub fn sawtooth(frequency: impl Into<Operand>) -> Self {
        Self::new(Sawtooth, frequency)
    }
}

impl Oscillator<Triangle> {
    pub fn triangle(frequency: impl Into<Operand>) -> Self {
        Self::new(Triangle, frequency)
    }
}

/// Value of a control operand at `frame`, reading the first channel of a
/// wider modulator.
fn control_at(operand: &Operand, resolved: &Resolved, frame: usize) -> f64 {
    resolved.at(frame * operand.channels().unwrap_or(1))
}

impl<W: Waveform> Synthesize for Oscillator<W> {
    fn synthesize(&mut self, ctx: &Context) -> Result<Vec<f64>> {
        let frequency = self.frequency.resolve(ctx)?;
        let phase = self.phase.resolve(ctx)?;
        let step = TAU / ctx.sample_rate;

        let samples = (0..ctx.num_frames)
            .map(|frame| {
                self.accumulated += step * control_at(&self.frequency, &frequency, frame);
                self.waveform
                    .sample(self.accumulated + control_at(&self.phase, &phase, frame))
            })
            .collect();

        self.accumulated = self.accumulated.rem_euclid(TAU);
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IntoNode, Node, Tick};
    use std::f64::consts::FRAC_PI_2;

    const SAMPLE_RATE: f64 = 44100.0;

    fn blocks(node: &Node<Oscillator<Sine>>, count: usize, frames: usize) -> Vec<f64> {
        let mut tick = Tick::new(0);
        let mut out = Vec::new();
        for _ in 0..count {
            out.extend(node.generate(tick, frames, SAMPLE_RATE).unwrap().samples);
            tick = tick.next();
        }
        out
    }

    #[test]
    fn test_first_sample_includes_one_step() {
        let osc = Node::new(Oscillator::sine(441.0));
        let block = osc.generate(Tick::new(0), 1, SAMPLE_RATE).unwrap();
        let expected = (TAU * 441.0 / SAMPLE_RATE).sin();
        assert!((block.samples[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_phase_continuity_across_blocks() {
        let chunked = Node::new(Oscillator::sine(440.0));
        let whole = Node::new(Oscillator::sine(440.0));

        let joined = blocks(&chunked, 8, 64);
        let single = blocks(&whole, 1, 8 * 64);
        for (a, b) in joined.iter().zip(&single) {
            assert!((a - b).abs() < 1e-9, "{a} != {b}");
        }
    }

    #[test]
    fn test_constant_phase_does_not_accumulate() {
        let shifted = Node::new(Oscillator::sine(440.0).with_phase(FRAC_PI_2));
        let plain = Node::new(Oscillator::sine(440.0));
        let a = blocks(&shifted, 4, 32);
        let b = blocks(&plain, 4, 32);
        // A quarter-turn shift turns sin into cos everywhere, not just in block one.
        for (s, p) in a.iter().zip(&b) {
            let expected_cos = (1.0 - p * p).sqrt();
            assert!((s.abs() - expected_cos).abs() < 1e-6);
        }
    }

    #[test]
    fn test_modulated_frequency() {
        // A constant 0 Hz modulator freezes the oscillator.
        let modulator = Node::new(Oscillator::sine(0.0));
        let osc = Node::new(Oscillator::sine(modulator));
        let out = osc.generate(Tick::new(0), 16, SAMPLE_RATE).unwrap().samples;
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_waveform_family_stays_in_range() {
        let nodes: Vec<Node> = vec![
            Node::new(Oscillator::square(100.0)).into_node(),
            Node::new(Oscillator::sawtooth(100.0)).into_node(),
            Node::new(Oscillator::triangle(100.0)).into_node(),
        ];
        for node in nodes {
            let out = node.generate(Tick::new(0), 1024, SAMPLE_RATE).unwrap().samples;
            assert!(out.iter().all(|s| (-1.0..=1.0).contains(s)));
        }
    }

    #[test]
    fn test_reset() {
        let osc = Node::new(Oscillator::sine(440.0));
        let first = osc.generate(Tick::new(0), 8, SAMPLE_RATE).unwrap().samples;
        osc.with(|o| o.reset());
        let again = osc.generate(Tick::new(1), 8, SAMPLE_RATE).unwrap().samples;
        assert_eq!(first, again);
    }
}
