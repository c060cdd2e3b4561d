//! The unit generator: per-node state, the once-per-tick evaluation rule, and
//! the shared handle graphs are assembled from.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::Tick;
use crate::Result;

/// What a kernel is told about the block it has to produce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Context {
    pub tick: Tick,
    pub num_frames: usize,
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Frame position of this node before the block is produced
    pub cursor: u64,
}

impl Context {
    /// Node time in seconds of frame `offset` within the block.
    pub fn frame_time(&self, offset: usize) -> f64 {
        (self.cursor + offset as u64) as f64 / self.sample_rate
    }
}

/// The synthesis behaviour of one kind of node.
///
/// Implementors only produce samples. Cursor bookkeeping, duration cut-off
/// and the per-tick cache are handled by [`UnitGenerator`], so a kernel is
/// invoked at most once per distinct tick.
pub trait Synthesize: Send {
    /// Produces `ctx.num_frames * self.channels()` interleaved samples.
    ///
    /// A source that ran dry may return fewer; routing nodes zero-pad.
    fn synthesize(&mut self, ctx: &Context) -> Result<Vec<f64>>;

    /// Output layout, fixed at construction: 1 (mono) or 2 (interleaved stereo).
    fn channels(&self) -> usize {
        1
    }

    /// Declared output bounds.
    fn range(&self) -> (f64, f64) {
        (-1.0, 1.0)
    }

    /// Reports that the kernel has nothing left to play after the block it
    /// just produced.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// One block of output together with the continuation flag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    /// Interleaved samples
    pub samples: Vec<f64>,
    /// False once the node has nothing more to produce
    pub continues: bool,
}

impl Block {
    pub fn new(samples: Vec<f64>, continues: bool) -> Self {
        Self { samples, continues }
    }

    /// A block of zeros that keeps going.
    pub fn silent(num_frames: usize, channels: usize) -> Self {
        Self::new(vec![0.0; num_frames * channels], true)
    }
}

/// Base node state wrapped around a kernel.
pub struct UnitGenerator<K: ?Sized> {
    cursor: u64,
    channels: usize,
    range: (f64, f64),
    duration: Option<f64>,
    memo: Option<(Tick, Block)>,
    kernel: K,
}

impl<K: Synthesize> UnitGenerator<K> {
    pub fn new(kernel: K) -> Self {
        Self {
            cursor: 0,
            channels: kernel.channels(),
            range: kernel.range(),
            duration: None,
            memo: None,
            kernel,
        }
    }
}

impl<K: Synthesize + ?Sized> UnitGenerator<K> {
    /// Produces the block for `tick`.
    ///
    /// A repeated tick (other than [`Tick::ALWAYS`]) returns the cached block
    /// without touching the cursor or any child.
    pub fn generate(&mut self, tick: Tick, num_frames: usize, sample_rate: f64) -> Result<Block> {
        if let Some((last, block)) = &self.memo
            && *last == tick
            && !tick.is_always()
        {
            return Ok(block.clone());
        }

        let ctx = Context {
            tick,
            num_frames,
            sample_rate,
            cursor: self.cursor,
        };
        let samples = self.kernel.synthesize(&ctx)?;
        self.cursor += num_frames as u64;

        let elapsed = self
            .duration
            .is_some_and(|duration| self.cursor as f64 / sample_rate > duration);
        let block = Block::new(samples, !elapsed && !self.kernel.is_exhausted());
        self.memo = Some((tick, block.clone()));
        Ok(block)
    }
}

/// Shared handle to a node.
///
/// Cloning a handle shares the node: every parent holding a clone pulls the
/// same cursor and the same per-tick cache. `Node` on its own is the erased
/// form graphs are built from; a typed handle such as `Node<Mixer>` also
/// reaches the kernel's controls through [`Node::with`].
///
/// # Examples
///
/// ```
/// use unitgen::{Node, Oscillator, Tick};
///
/// let lfo = Node::new(Oscillator::sine(2.0));
/// // The same LFO drives pitch and amplitude.
/// let voice = Node::new(Oscillator::sine(440.0 + &lfo * 20.0)) * (0.5 + &lfo * 0.25);
///
/// let block = voice.generate(Tick::new(0), 64, 44100.0).unwrap();
/// assert_eq!(block.samples.len(), 64);
/// assert_eq!(lfo.cursor(), 64);
/// ```
pub struct Node<K: ?Sized = dyn Synthesize> {
    inner: Arc<Mutex<UnitGenerator<K>>>,
}

impl<K: Synthesize + 'static> Node<K> {
    pub fn new(kernel: K) -> Self {
        Self {
            inner: Arc::new(Mutex::new(UnitGenerator::new(kernel))),
        }
    }
}

impl<K: Synthesize + ?Sized> Node<K> {
    // Nodes carry no cross-field invariant a panicking sibling could break,
    // so a poisoned lock is taken over as is.
    fn lock(&self) -> MutexGuard<'_, UnitGenerator<K>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pulls the next block. See [`UnitGenerator::generate`].
    pub fn generate(&self, tick: Tick, num_frames: usize, sample_rate: f64) -> Result<Block> {
        self.lock().generate(tick, num_frames, sample_rate)
    }

    /// Pulls this node for the same block a parent is producing.
    pub fn pull(&self, ctx: &Context) -> Result<Block> {
        self.generate(ctx.tick, ctx.num_frames, ctx.sample_rate)
    }

    /// Runs `f` against the kernel, e.g. to reach transport or mixer controls.
    pub fn with<R>(&self, f: impl FnOnce(&mut K) -> R) -> R {
        f(&mut self.lock().kernel)
    }

    pub fn channels(&self) -> usize {
        self.lock().channels
    }

    pub fn range(&self) -> (f64, f64) {
        self.lock().range
    }

    pub fn cursor(&self) -> u64 {
        self.lock().cursor
    }

    pub fn set_cursor(&self, frame: u64) {
        self.lock().cursor = frame;
    }

    pub fn duration(&self) -> Option<f64> {
        self.lock().duration
    }

    /// Seconds after which the node reports it is done. `None` runs forever.
    pub fn set_duration(&self, seconds: Option<f64>) {
        self.lock().duration = seconds;
    }

    pub fn with_duration(self, seconds: f64) -> Self {
        self.set_duration(Some(seconds));
        self
    }

    /// Overrides the declared output bounds.
    pub fn with_range(self, low: f64, high: f64) -> Self {
        self.lock().range = (low, high);
        self
    }

    /// Identity comparison: true when both handles point at the same node.
    pub fn same_node<J: ?Sized>(&self, other: &Node<J>) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }
}

impl<K: ?Sized> Clone for Node<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: Synthesize + ?Sized> fmt::Debug for Node<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let generator = self.lock();
        f.debug_struct("Node")
            .field("channels", &generator.channels)
            .field("cursor", &generator.cursor)
            .field("duration", &generator.duration)
            .finish_non_exhaustive()
    }
}

/// Conversion of typed and borrowed handles into the erased [`Node`].
pub trait IntoNode {
    fn into_node(self) -> Node;
}

impl<K: Synthesize + 'static> IntoNode for Node<K> {
    fn into_node(self) -> Node {
        Node { inner: self.inner }
    }
}

impl IntoNode for Node {
    fn into_node(self) -> Node {
        self
    }
}

impl<K: ?Sized> IntoNode for &Node<K>
where
    Node<K>: IntoNode,
{
    fn into_node(self) -> Node {
        self.clone().into_node()
    }
}
