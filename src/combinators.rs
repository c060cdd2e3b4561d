//! Arithmetic combinators for composing nodes.
//!
//! Each combinator is itself a node kind, so results compose and are cached
//! per tick like any other generator. Inputs are [`Operand`]s: scalars are
//! broadcast, and a mono node feeding a stereo combinator is applied to both
//! channels of each frame.
//!
//! A combinator keeps running when an input finishes; it ends only through
//! its own duration.

use crate::{Context, IntoNode, Node, Operand, Resolved, Result, Synthesize};

/// Largest channel count among the node operands (mono when all are scalars).
fn widest(operands: &[&Operand]) -> usize {
    operands
        .iter()
        .filter_map(|operand| operand.channels())
        .max()
        .unwrap_or(1)
}

/// Reads output sample `index` of a `channels`-wide block from an operand
/// that may be narrower.
fn sample_at(resolved: &Resolved, operand_channels: usize, channels: usize, index: usize) -> f64 {
    if operand_channels == channels {
        resolved.at(index)
    } else {
        resolved.at(index / channels * operand_channels)
    }
}

fn sorted(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// The two inputs of a binary combinator.
struct Operands {
    a: Operand,
    b: Operand,
    channels: usize,
}

impl Operands {
    fn new(a: Operand, b: Operand) -> Self {
        let channels = widest(&[&a, &b]);
        Self { a, b, channels }
    }

    fn apply(&self, ctx: &Context, op: fn(f64, f64) -> f64) -> Result<Vec<f64>> {
        let a = self.a.resolve(ctx)?;
        let b = self.b.resolve(ctx)?;

        let a_channels = self.a.channels().unwrap_or(self.channels);
        let b_channels = self.b.channels().unwrap_or(self.channels);
        Ok((0..ctx.num_frames * self.channels)
            .map(|i| {
                op(
                    sample_at(&a, a_channels, self.channels, i),
                    sample_at(&b, b_channels, self.channels, i),
                )
            })
            .collect())
    }
}

/// Sample-by-sample sum of two operands.
///
/// # Examples
///
/// ```
/// use unitgen::{Node, Oscillator, combinators::Add};
///
/// let low = Node::new(Oscillator::sine(220.0));
/// let high = Node::new(Oscillator::sine(440.0));
/// let both = Node::new(Add::new(low, high));
/// assert_eq!(both.range(), (-2.0, 2.0));
/// ```
pub struct Add {
    operands: Operands,
    range: (f64, f64),
}

impl Add {
    pub fn new(a: impl Into<Operand>, b: impl Into<Operand>) -> Self {
        let (a, b) = (a.into(), b.into());
        let (a_lo, a_hi) = a.range();
        let (b_lo, b_hi) = b.range();
        Self {
            operands: Operands::new(a, b),
            range: (a_lo + b_lo, a_hi + b_hi),
        }
    }
}

impl Synthesize for Add {
    fn synthesize(&mut self, ctx: &Context) -> Result<Vec<f64>> {
        self.operands.apply(ctx, |a, b| a + b)
    }

    fn channels(&self) -> usize {
        self.operands.channels
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Sample-by-sample product of two operands (gain, ring modulation, VCA).
pub struct Multiply {
    operands: Operands,
    range: (f64, f64),
}

impl Multiply {
    pub fn new(a: impl Into<Operand>, b: impl Into<Operand>) -> Self {
        let (a, b) = (a.into(), b.into());
        let (a_lo, a_hi) = a.range();
        let (b_lo, b_hi) = b.range();
        let corners = [a_lo * b_lo, a_lo * b_hi, a_hi * b_lo, a_hi * b_hi];
        let range = corners
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        Self {
            operands: Operands::new(a, b),
            range,
        }
    }
}

impl Synthesize for Multiply {
    fn synthesize(&mut self, ctx: &Context) -> Result<Vec<f64>> {
        self.operands.apply(ctx, |a, b| a * b)
    }

    fn channels(&self) -> usize {
        self.operands.channels
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Shared body of the unary combinators.
struct Unary {
    source: Operand,
    channels: usize,
}

impl Unary {
    fn new(source: Operand) -> Self {
        let channels = widest(&[&source]);
        Self { source, channels }
    }

    fn apply(&self, ctx: &Context, op: fn(f64) -> f64) -> Result<Vec<f64>> {
        Ok(self
            .source
            .resolve(ctx)?
            .into_samples(ctx.num_frames * self.channels)
            .into_iter()
            .map(op)
            .collect())
    }
}

/// Negation of an operand.
pub struct AdditiveInverse {
    inner: Unary,
    range: (f64, f64),
}

impl AdditiveInverse {
    pub fn new(source: impl Into<Operand>) -> Self {
        let source = source.into();
        let (lo, hi) = source.range();
        Self {
            inner: Unary::new(source),
            range: (-hi, -lo),
        }
    }
}

impl Synthesize for AdditiveInverse {
    fn synthesize(&mut self, ctx: &Context) -> Result<Vec<f64>> {
        self.inner.apply(ctx, |x| -x)
    }

    fn channels(&self) -> usize {
        self.inner.channels
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Reciprocal of an operand.
///
/// A zero sample yields an infinity, as IEEE division does.
pub struct MultiplicativeInverse {
    inner: Unary,
    range: (f64, f64),
}

impl MultiplicativeInverse {
    pub fn new(source: impl Into<Operand>) -> Self {
        let source = source.into();
        let (lo, hi) = source.range();
        let range = if lo <= 0.0 && hi >= 0.0 {
            (f64::NEG_INFINITY, f64::INFINITY)
        } else {
            sorted(1.0 / lo, 1.0 / hi)
        };
        Self {
            inner: Unary::new(source),
            range,
        }
    }
}

impl Synthesize for MultiplicativeInverse {
    fn synthesize(&mut self, ctx: &Context) -> Result<Vec<f64>> {
        self.inner.apply(ctx, |x| 1.0 / x)
    }

    fn channels(&self) -> usize {
        self.inner.channels
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Remaps an operand's declared range onto `out_range`.
///
/// The affine map is fixed at construction and built from [`Multiply`] and
/// [`Add`] nodes: `x / multiplier + offset`, with
/// `multiplier = (in_hi - in_lo) / (out_hi - out_lo)` and the offset chosen so
/// the centre of the input range lands on the centre of the output range.
///
/// # Examples
///
/// ```
/// use unitgen::{Node, Oscillator, Tick, combinators::Scale};
///
/// // A [-1, 1] LFO remapped to a 200..600 Hz sweep.
/// let lfo = Node::new(Oscillator::sine(0.5));
/// let sweep = Node::new(Scale::new(lfo, (200.0, 600.0)));
/// let block = sweep.generate(Tick::new(0), 256, 44100.0).unwrap();
/// assert!(block.samples.iter().all(|&f| (200.0..=600.0).contains(&f)));
/// ```
pub struct Scale {
    inner: Node,
    out_range: (f64, f64),
}

impl Scale {
    pub fn new(source: impl Into<Operand>, out_range: (f64, f64)) -> Self {
        let source = source.into();
        let (in_lo, in_hi) = source.range();
        let (out_lo, out_hi) = out_range;
        let in_center = (in_hi + in_lo) / 2.0;
        let out_center = (out_hi + out_lo) / 2.0;

        let inner = if in_hi == in_lo {
            // Nothing to stretch; park on the centre of the target range.
            add(multiply(source, Operand::Scalar(0.0)).into(), out_center.into())
        } else {
            let multiplier = (in_hi - in_lo) / (out_hi - out_lo);
            let offset = out_center - in_center / multiplier;
            add(
                divide(source, Operand::Scalar(multiplier)).into(),
                offset.into(),
            )
        };

        Self {
            inner,
            out_range: sorted(out_lo, out_hi),
        }
    }
}

impl Synthesize for Scale {
    fn synthesize(&mut self, ctx: &Context) -> Result<Vec<f64>> {
        Ok(self.inner.pull(ctx)?.samples)
    }

    fn channels(&self) -> usize {
        self.inner.channels()
    }

    fn range(&self) -> (f64, f64) {
        self.out_range
    }
}

/// Silence; a neutral input and placeholder.
#[derive(Debug, Clone, Copy)]
pub struct Zero {
    channels: usize,
}

impl Zero {
    pub fn new() -> Self {
        Self { channels: 1 }
    }

    pub fn stereo() -> Self {
        Self { channels: 2 }
    }
}

impl Default for Zero {
    fn default() -> Self {
        Self::new()
    }
}

impl Synthesize for Zero {
    fn synthesize(&mut self, ctx: &Context) -> Result<Vec<f64>> {
        Ok(vec![0.0; ctx.num_frames * self.channels])
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn range(&self) -> (f64, f64) {
        (0.0, 0.0)
    }
}

/// Builds an [`Add`] node.
pub fn add(a: Operand, b: Operand) -> Node {
    Node::new(Add::new(a, b)).into_node()
}

/// Builds `a + (-b)`. A scalar `b` is negated in place.
pub fn subtract(a: Operand, b: Operand) -> Node {
    let negated = match b {
        Operand::Scalar(v) => Operand::Scalar(-v),
        node => additive_inverse(node).into(),
    };
    add(a, negated)
}

/// Builds a [`Multiply`] node.
pub fn multiply(a: Operand, b: Operand) -> Node {
    Node::new(Multiply::new(a, b)).into_node()
}

/// Builds `a * (1 / b)`. A scalar `b` is inverted in place.
pub fn divide(a: Operand, b: Operand) -> Node {
    let inverted = match b {
        Operand::Scalar(v) => Operand::Scalar(1.0 / v),
        node => multiplicative_inverse(node).into(),
    };
    multiply(a, inverted)
}

/// Builds an [`AdditiveInverse`] node.
pub fn additive_inverse(source: Operand) -> Node {
    Node::new(AdditiveInverse::new(source)).into_node()
}

/// Builds a [`MultiplicativeInverse`] node.
pub fn multiplicative_inverse(source: Operand) -> Node {
    Node::new(MultiplicativeInverse::new(source)).into_node()
}

/// Builds a [`Scale`] node.
pub fn scale(source: impl Into<Operand>, out_range: (f64, f64)) -> Node {
    Node::new(Scale::new(source, out_range)).into_node()
}
