//! Operands: values that are either a constant or another node.

use super::{Block, Context, IntoNode, Node};
use crate::Result;

/// A parameter or combinator input that is either fixed or driven by a node.
///
/// # Examples
///
/// ```
/// use unitgen::{Node, Operand, Oscillator};
///
/// let fixed: Operand = 0.5.into();
/// assert!(fixed.is_scalar());
///
/// let lfo = Node::new(Oscillator::sine(3.0));
/// let modulated: Operand = (&lfo).into();
/// assert_eq!(modulated.channels(), Some(1));
/// ```
#[derive(Clone, Debug)]
pub enum Operand {
    /// A constant, broadcast over every sample
    Scalar(f64),
    /// A node evaluated once per tick
    Node(Node),
}

impl Operand {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Operand::Scalar(_))
    }

    /// Channel count of a node operand. Scalars fit any layout.
    pub fn channels(&self) -> Option<usize> {
        match self {
            Operand::Scalar(_) => None,
            Operand::Node(node) => Some(node.channels()),
        }
    }

    /// Declared output bounds; a scalar is its own range.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Operand::Scalar(v) => (*v, *v),
            Operand::Node(node) => node.range(),
        }
    }

    /// Evaluates the operand for the block described by `ctx`.
    pub fn resolve(&self, ctx: &Context) -> Result<Resolved> {
        match self {
            Operand::Scalar(v) => Ok(Resolved::Scalar(*v)),
            Operand::Node(node) => node.pull(ctx).map(Resolved::Block),
        }
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

impl<K: ?Sized> From<Node<K>> for Operand
where
    Node<K>: IntoNode,
{
    fn from(node: Node<K>) -> Self {
        Operand::Node(node.into_node())
    }
}

impl<K: ?Sized> From<&Node<K>> for Operand
where
    Node<K>: IntoNode,
{
    fn from(node: &Node<K>) -> Self {
        Operand::Node(node.into_node())
    }
}

/// An evaluated operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Scalar(f64),
    Block(Block),
}

impl Resolved {
    /// Sample `index`, broadcasting scalars and reading zero past the end of
    /// a short block.
    pub fn at(&self, index: usize) -> f64 {
        match self {
            Resolved::Scalar(v) => *v,
            Resolved::Block(block) => block.samples.get(index).copied().unwrap_or(0.0),
        }
    }

    /// Number of samples carried, `None` for a scalar.
    pub fn len(&self) -> Option<usize> {
        match self {
            Resolved::Scalar(_) => None,
            Resolved::Block(block) => Some(block.samples.len()),
        }
    }

    pub fn continues(&self) -> bool {
        match self {
            Resolved::Scalar(_) => true,
            Resolved::Block(block) => block.continues,
        }
    }

    /// Exactly `len` samples: scalars broadcast, short blocks zero-padded.
    pub fn into_samples(self, len: usize) -> Vec<f64> {
        match self {
            Resolved::Scalar(v) => vec![v; len],
            Resolved::Block(block) => {
                let mut samples = block.samples;
                samples.resize(len, 0.0);
                samples
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Tick, Zero};

    fn ctx(num_frames: usize) -> Context {
        Context {
            tick: Tick::new(0),
            num_frames,
            sample_rate: 100.0,
            cursor: 0,
        }
    }

    #[test]
    fn test_scalar_resolves_without_allocation() {
        let operand: Operand = 2.5.into();
        let resolved = operand.resolve(&ctx(4)).unwrap();
        assert_eq!(resolved, Resolved::Scalar(2.5));
        assert_eq!(resolved.at(3), 2.5);
        assert_eq!(resolved.len(), None);
        assert_eq!(resolved.into_samples(3), vec![2.5; 3]);
    }

    #[test]
    fn test_node_resolves_to_block() {
        let zero = Node::new(Zero::new());
        let operand: Operand = zero.clone().into();
        let resolved = operand.resolve(&ctx(4)).unwrap();
        assert_eq!(resolved.len(), Some(4));
        assert!(resolved.continues());
        assert_eq!(zero.cursor(), 4);
    }

    #[test]
    fn test_short_block_pads() {
        let resolved = Resolved::Block(Block::new(vec![1.0, 2.0], false));
        assert_eq!(resolved.at(5), 0.0);
        assert!(!resolved.continues());
        assert_eq!(resolved.into_samples(4), vec![1.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_range() {
        assert_eq!(Operand::from(3.0).range(), (3.0, 3.0));
        let zero = Node::new(Zero::new());
        assert_eq!(Operand::from(&zero).range(), (0.0, 0.0));
    }
}
