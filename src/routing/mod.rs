//! Routing nodes that combine children into one stereo signal.
//!
//! Everything here outputs interleaved stereo. Mono children are spread
//! across both channels; children that report they are done are dropped
//! after the block they finished in.

mod mixer;
mod mono_to_stereo;
mod panner;
mod track;

pub use mixer::Mixer;
pub use mono_to_stereo::MonoToStereo;
pub use panner::Panner;
pub use track::StereoTrack;
