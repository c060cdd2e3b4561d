//! Transport-controlled playback of a wave source.

use log::{debug, trace};

use super::WaveSource;
use crate::error::check_channels;
use crate::{Context, Result, Synthesize};

/// What a non-looping generator does when its source runs dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndPolicy {
    /// Rewind to the start and keep reporting that more is coming, so the
    /// generator can be played again without rebuilding it.
    Rewind,
    /// Report that the generator is done, letting a mixer prune it.
    #[default]
    Stop,
}

/// Plays a [`WaveSource`] with play, pause, loop and release controls.
///
/// The generator keeps its own read position in the source. It does not move
/// while paused, so playback resumes where it stopped; the node cursor keeps
/// counting blocks either way.
///
/// # Examples
///
/// ```
/// use unitgen::{Node, Tick};
/// use unitgen::wave::{WaveBuffer, WaveGenerator};
///
/// let buffer = WaveBuffer::from_samples(vec![0.25, 0.5, 0.75], 1).unwrap();
/// let player = Node::new(WaveGenerator::new(buffer).unwrap().with_loop(true));
///
/// let block = player.generate(Tick::new(0), 5, 44100.0).unwrap();
/// assert_eq!(block.samples, vec![0.25, 0.5, 0.75, 0.25, 0.5]);
///
/// player.with(|p| p.pause());
/// let block = player.generate(Tick::new(1), 2, 44100.0).unwrap();
/// assert_eq!(block.samples, vec![0.0, 0.0]);
/// ```
pub struct WaveGenerator<S> {
    source: S,
    channels: usize,
    /// Next frame to read from the source
    position: usize,
    paused: bool,
    looping: bool,
    released: bool,
    end_policy: EndPolicy,
    drained: bool,
}

impl<S: WaveSource> WaveGenerator<S> {
    /// Creates a playing, non-looping generator at the start of `source`.
    pub fn new(source: S) -> Result<Self> {
        let channels = check_channels(source.channels())?;
        Ok(Self {
            source,
            channels,
            position: 0,
            paused: false,
            looping: false,
            released: false,
            end_policy: EndPolicy::default(),
            drained: false,
        })
    }

    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_end_policy(mut self, end_policy: EndPolicy) -> Self {
        self.end_policy = end_policy;
        self
    }

    pub fn play(&mut self) {
        self.paused = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn play_toggle(&mut self) {
        self.paused = !self.paused;
    }

    /// Pauses and rewinds to the start, clearing any release.
    pub fn reset(&mut self) {
        self.paused = true;
        self.position = 0;
        self.released = false;
        self.drained = false;
    }

    /// Lets the current pass finish: looping stops and the generator reports
    /// that it is done once the source runs dry.
    pub fn release(&mut self) {
        self.released = true;
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn set_end_policy(&mut self, end_policy: EndPolicy) {
        self.end_policy = end_policy;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Frame of the source that will be read next.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Fills the remainder of `out` from the start of the source, as many
    /// times as needed.
    fn wrap(&mut self, out: &mut Vec<f64>, wanted: usize) -> Result<()> {
        while out.len() < wanted {
            let remaining = (wanted - out.len()) / self.channels;
            let chunk = self.source.get_frames(0, remaining)?;
            if chunk.is_empty() {
                break;
            }
            trace!("wave loop wrapped after {} samples", out.len());
            self.position = chunk.len() / self.channels;
            out.extend(chunk);
        }
        Ok(())
    }
}

impl<S: WaveSource> Synthesize for WaveGenerator<S> {
    fn synthesize(&mut self, ctx: &Context) -> Result<Vec<f64>> {
        let wanted = ctx.num_frames * self.channels;
        if self.paused || self.drained {
            return Ok(vec![0.0; wanted]);
        }

        let mut out = self
            .source
            .get_frames(self.position, self.position + ctx.num_frames)?;
        self.position += out.len() / self.channels;

        if self.looping && !self.released {
            self.wrap(&mut out, wanted)?;
        }

        if out.len() < wanted {
            out.resize(wanted, 0.0);
            if self.released || self.end_policy == EndPolicy::Stop {
                debug!("wave source drained at frame {}", self.position);
                self.drained = true;
            } else {
                self.position = 0;
            }
        }
        Ok(out)
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn is_exhausted(&self) -> bool {
        self.drained
    }
}
