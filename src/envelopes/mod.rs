//! Breakpoint envelopes for controlling parameter changes over time.

mod curve;
mod envelope;

pub use curve::{Breakpoint, Interpolation};
pub use envelope::{Envelope, Extension};
