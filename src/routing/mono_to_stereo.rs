//! Mono to stereo duplication.

use crate::{Context, Error, IntoNode, Node, Result, Synthesize};

/// Copies a mono child onto both channels of a stereo output.
pub struct MonoToStereo {
    source: Node,
    exhausted: bool,
}

impl MonoToStereo {
    /// Fails with [`Error::ChannelMismatch`] unless `source` is mono.
    pub fn new(source: impl IntoNode) -> Result<Self> {
        let source = source.into_node();
        match source.channels() {
            1 => Ok(Self {
                source,
                exhausted: false,
            }),
            found => Err(Error::ChannelMismatch { expected: 1, found }),
        }
    }
}

impl Synthesize for MonoToStereo {
    fn synthesize(&mut self, ctx: &Context) -> Result<Vec<f64>> {
        let block = self.source.pull(ctx)?;
        self.exhausted = !block.continues;
        Ok(block.samples.into_iter().flat_map(|s| [s, s]).collect())
    }

    fn channels(&self) -> usize {
        2
    }

    fn range(&self) -> (f64, f64) {
        self.source.range()
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
