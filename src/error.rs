//! Error types shared by every node in the graph.
//!
//! Running out of material is not an error: a node that is done reports it
//! through [`Block::continues`](crate::Block). The variants here are wiring and
//! configuration defects that should stop the render.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while building or evaluating a graph.
#[derive(Debug, Error)]
pub enum Error {
    /// Breakpoints are missing, out of order, or unusable for the
    /// configured interpolation.
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// Only mono and stereo layouts are supported.
    #[error("unsupported channel count {0} (expected 1 or 2)")]
    UnsupportedChannels(usize),

    /// A generator was wired into a consumer that expects another layout.
    #[error("channel mismatch: expected {expected} channel(s), found {found}")]
    ChannelMismatch { expected: usize, found: usize },

    /// Playback ran past the last breakpoint and no extension rule is set.
    #[error("envelope has no breakpoint for t = {time:.6}s and no extension rule")]
    EnvelopeExhausted { time: f64 },

    /// A render setting is out of range.
    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "wav")]
    #[error(transparent)]
    Wav(#[from] hound::Error),
}

/// Checks that a channel count is one the graph can carry.
pub(crate) fn check_channels(channels: usize) -> Result<usize> {
    match channels {
        1 | 2 => Ok(channels),
        other => Err(Error::UnsupportedChannels(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_channels() {
        assert_eq!(check_channels(1).unwrap(), 1);
        assert_eq!(check_channels(2).unwrap(), 2);
        assert!(matches!(
            check_channels(6),
            Err(Error::UnsupportedChannels(6))
        ));
    }

    #[test]
    fn test_messages() {
        let err = Error::ChannelMismatch {
            expected: 2,
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "channel mismatch: expected 2 channel(s), found 1"
        );
    }
}
