//! Driving a graph: pulling blocks from the root node and handing them on.
//!
//! There is no device I/O here. A [`Renderer`] owns the root node and the
//! tick alternation; whatever consumes the audio (a device callback, a file
//! writer, a test) either takes the returned blocks or registers a
//! [`Listener`].

use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info};

use crate::error::check_channels;
use crate::{Block, Error, IntoNode, Node, Result, Tick};

/// Output format of a [`Renderer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub channels: usize,
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Frames per block for [`Renderer::render_block`] and [`Renderer::render`]
    pub block_frames: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 44100.0,
            block_frames: 512,
        }
    }
}

impl RenderConfig {
    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_block_frames(mut self, block_frames: usize) -> Self {
        self.block_frames = block_frames;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_channels(self.channels)?;
        let rate_ok = self.sample_rate.is_finite() && self.sample_rate > 0.0;
        if !rate_ok {
            return Err(Error::InvalidConfig(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.block_frames == 0 {
            return Err(Error::InvalidConfig("block size must be at least one frame".into()));
        }
        Ok(())
    }
}

/// Receives every block a [`Renderer`] produces.
pub trait Listener: Send {
    fn add_audio(&mut self, samples: &[f64], sample_rate: f64, channels: usize) -> Result<()>;
}

/// Lets a caller keep a handle on a listener it registered.
impl<L: Listener + ?Sized> Listener for Arc<Mutex<L>> {
    fn add_audio(&mut self, samples: &[f64], sample_rate: f64, channels: usize) -> Result<()> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .add_audio(samples, sample_rate, channels)
    }
}

/// Collects audio in memory while recording is switched on.
///
/// Incoming audio is adapted to the recorder's layout: stereo is averaged
/// down to mono, mono is duplicated up to stereo.
///
/// # Examples
///
/// ```
/// use unitgen::driver::{Listener, Recorder};
///
/// let mut recorder = Recorder::new(1, 44100.0).unwrap();
/// recorder.start();
/// recorder.add_audio(&[0.5, 0.25, 1.0, 0.0], 44100.0, 2).unwrap();
/// assert_eq!(recorder.stop(), vec![0.375, 0.5]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Recorder {
    channels: usize,
    sample_rate: f64,
    active: bool,
    samples: Vec<f64>,
}

impl Recorder {
    pub fn new(channels: usize, sample_rate: f64) -> Result<Self> {
        Ok(Self {
            channels: check_channels(channels)?,
            sample_rate,
            active: false,
            samples: Vec::new(),
        })
    }

    /// Starts a fresh recording. Does nothing if already recording.
    pub fn start(&mut self) {
        if !self.active {
            debug!("recorder started");
            self.active = true;
            self.samples.clear();
        }
    }

    /// Stops recording and hands back what was captured.
    pub fn stop(&mut self) -> Vec<f64> {
        if self.active {
            debug!("recorder stopped after {} samples", self.samples.len());
            self.active = false;
        }
        std::mem::take(&mut self.samples)
    }

    /// Starts or stops; a stop returns the recording.
    pub fn toggle(&mut self) -> Option<Vec<f64>> {
        if self.active {
            Some(self.stop())
        } else {
            self.start();
            None
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Audio captured so far.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

impl Listener for Recorder {
    fn add_audio(&mut self, samples: &[f64], sample_rate: f64, channels: usize) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        if sample_rate != self.sample_rate {
            return Err(Error::InvalidConfig(format!(
                "recorder runs at {} Hz but received {sample_rate} Hz",
                self.sample_rate
            )));
        }
        match (check_channels(channels)?, self.channels) {
            (2, 1) => self
                .samples
                .extend(samples.chunks_exact(2).map(|lr| (lr[0] + lr[1]) / 2.0)),
            (1, 2) => self.samples.extend(samples.iter().flat_map(|&s| [s, s])),
            _ => self.samples.extend_from_slice(samples),
        }
        Ok(())
    }
}

/// Pulls blocks from a root node, alternating tick ids between calls.
///
/// # Examples
///
/// ```
/// use unitgen::driver::{RenderConfig, Renderer};
/// use unitgen::{Node, Oscillator, Panner};
///
/// let config = RenderConfig::default().with_block_frames(256);
/// let mut renderer = Renderer::new(config).unwrap();
/// let tone = Node::new(Oscillator::sine(440.0));
/// renderer.set_root(Node::new(Panner::new(tone, 0.5).unwrap())).unwrap();
///
/// let audio = renderer.render(0.01).unwrap();
/// // 441 frames rounded up to whole blocks, two channels each
/// assert_eq!(audio.len(), 512 * 2);
/// ```
pub struct Renderer {
    config: RenderConfig,
    root: Option<Node>,
    tick: Tick,
    listeners: Vec<Box<dyn Listener>>,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            root: None,
            tick: Tick::new(0),
            listeners: Vec::new(),
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Installs the node the renderer pulls from.
    ///
    /// # Errors
    ///
    /// [`Error::ChannelMismatch`] when the node's layout differs from the
    /// configured one.
    pub fn set_root(&mut self, root: impl IntoNode) -> Result<()> {
        let root = root.into_node();
        let found = root.channels();
        if found != self.config.channels {
            return Err(Error::ChannelMismatch {
                expected: self.config.channels,
                found,
            });
        }
        debug!("renderer root set ({found} channel(s))");
        self.root = Some(root);
        Ok(())
    }

    pub fn remove_root(&mut self) -> Option<Node> {
        self.root.take()
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn add_listener(&mut self, listener: impl Listener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Produces the next `num_frames` frames, e.g. to fill a device buffer of
    /// whatever size the device asked for.
    pub fn render_frames(&mut self, num_frames: usize) -> Result<Block> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| Error::InvalidConfig("renderer has no root node".into()))?;
        let block = root.generate(self.tick, num_frames, self.config.sample_rate)?;
        self.tick = self.tick.next();

        for listener in &mut self.listeners {
            listener.add_audio(&block.samples, self.config.sample_rate, self.config.channels)?;
        }
        Ok(block)
    }

    /// Produces one block of the configured size.
    pub fn render_block(&mut self) -> Result<Block> {
        self.render_frames(self.config.block_frames)
    }

    /// Renders at least `seconds` of audio in whole blocks and returns it.
    ///
    /// Rendering continues past the root reporting that it is done; the
    /// remainder is whatever the root produces then, usually silence.
    pub fn render(&mut self, seconds: f64) -> Result<Vec<f64>> {
        if !seconds.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "render length must be finite, got {seconds}"
            )));
        }
        let frames = (seconds * self.config.sample_rate).ceil().max(0.0) as usize;
        let blocks = frames.div_ceil(self.config.block_frames);
        info!(
            "rendering {seconds}s as {blocks} block(s) of {} frames",
            self.config.block_frames
        );

        let mut audio = Vec::with_capacity(blocks * self.config.block_frames * self.config.channels);
        for _ in 0..blocks {
            audio.extend(self.render_block()?.samples);
        }
        info!("render finished: {} samples", audio.len());
        Ok(audio)
    }
}
