//! Unitgen - pull-based unit generator graphs for audio synthesis
//!
//! A graph is built from [`Node`]s: oscillators, noise, envelopes, sample
//! playback, arithmetic combinators and stereo routing. A driver asks the
//! root node for one block at a time; every node pulls its inputs for the
//! same tick, and a node shared by several parents computes its block once.
//!
//! ```
//! use unitgen::driver::{RenderConfig, Renderer};
//! use unitgen::{Envelope, Node, Oscillator, StereoTrack};
//!
//! let lfo = Node::new(Oscillator::sine(4.0));
//! let amp = Node::new(Envelope::new([(0.0, 0.0), (0.05, 0.8), (0.5, 0.0)])?.holding());
//! let voice = Node::new(Oscillator::sawtooth(220.0 + &lfo * 3.0)) * amp;
//!
//! let track = Node::new(StereoTrack::new(&lfo * 0.5)?);
//! track.with(|t| t.add(voice))?;
//!
//! let mut renderer = Renderer::new(RenderConfig::default())?;
//! renderer.set_root(&track)?;
//! let audio = renderer.render(0.25)?;
//! assert!(!audio.is_empty());
//! # Ok::<(), unitgen::Error>(())
//! ```
//!
//! Graphs must be acyclic: a node that (indirectly) pulls itself would wait
//! on its own lock.

pub mod combinators;
pub mod driver;
pub mod envelopes;
mod error;
pub mod noise;
pub mod oscillators;
pub mod routing;
pub mod signals;
pub mod wave;

// Re-export commonly used types at the crate root
pub use combinators::{
    Add, AdditiveInverse, MultiplicativeInverse, Multiply, Scale, Zero, scale,
};
pub use envelopes::{Breakpoint, Envelope, Interpolation};
pub use error::{Error, Result};
pub use noise::Noise;
pub use oscillators::{Oscillator, Sawtooth, Sine, Square, Triangle, Waveform};
pub use routing::{Mixer, MonoToStereo, Panner, StereoTrack};
pub use signals::{
    Block, Context, IntoNode, Node, Operand, Resolved, Synthesize, Tick, UnitGenerator,
};
