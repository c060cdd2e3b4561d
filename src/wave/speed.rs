//! Playback speed change by resampling.

use crate::{Context, Error, IntoNode, Node, Result, Synthesize};

/// Plays a generator faster or slower, trading pitch for tempo.
///
/// For each block of `n` frames the wrapped node is asked for
/// `round(n * speed)` frames, which are stretched or squashed back onto `n`
/// frames per channel with linear interpolation. At speed 1.0 blocks pass
/// through untouched.
///
/// The wrapped node is pulled with a different block size than its parent
/// asks for, so it should not be shared with other parents.
///
/// # Examples
///
/// ```
/// use unitgen::{Node, Tick};
/// use unitgen::wave::{SpeedModulator, WaveBuffer, WaveGenerator};
///
/// let buffer = WaveBuffer::from_samples((0..8).map(f64::from).collect(), 1).unwrap();
/// let player = Node::new(WaveGenerator::new(buffer).unwrap());
/// let fast = Node::new(SpeedModulator::new(player, 2.0).unwrap());
///
/// let block = fast.generate(Tick::new(0), 4, 44100.0).unwrap();
/// assert_eq!(block.samples, vec![0.0, 2.0, 4.0, 6.0]);
/// ```
pub struct SpeedModulator {
    source: Node,
    speed: f64,
    exhausted: bool,
}

fn check_speed(speed: f64) -> Result<f64> {
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(Error::InvalidConfig(format!(
            "playback speed must be positive, got {speed}"
        )))
    }
}

impl SpeedModulator {
    pub fn new(source: impl IntoNode, speed: f64) -> Result<Self> {
        Ok(Self {
            source: source.into_node(),
            speed: check_speed(speed)?,
            exhausted: false,
        })
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        self.speed = check_speed(speed)?;
        Ok(())
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }
}

/// Linearly resamples one de-interleaved channel of `data` onto `num_frames`
/// points spread evenly over `0..source_frames`.
fn resample_channel(
    data: &[f64],
    channels: usize,
    channel: usize,
    source_frames: usize,
    num_frames: usize,
) -> impl Iterator<Item = f64> + '_ {
    let step = source_frames as f64 / num_frames as f64;
    let frame = move |i: usize| data.get(i * channels + channel).copied().unwrap_or(0.0);
    (0..num_frames).map(move |i| {
        let x = i as f64 * step;
        let index = x.floor() as usize;
        if index + 1 >= source_frames {
            return frame(source_frames.saturating_sub(1));
        }
        let frac = x - index as f64;
        let (a, b) = (frame(index), frame(index + 1));
        a + (b - a) * frac
    })
}

impl Synthesize for SpeedModulator {
    fn synthesize(&mut self, ctx: &Context) -> Result<Vec<f64>> {
        if self.speed == 1.0 {
            let block = self.source.pull(ctx)?;
            self.exhausted = !block.continues;
            return Ok(block.samples);
        }

        let channels = self.source.channels();
        let source_frames = ((ctx.num_frames as f64 * self.speed).round() as usize).max(1);
        let block = self
            .source
            .generate(ctx.tick, source_frames, ctx.sample_rate)?;
        self.exhausted = !block.continues;

        let resampled: Vec<Vec<f64>> = (0..channels)
            .map(|channel| {
                resample_channel(&block.samples, channels, channel, source_frames, ctx.num_frames)
                    .collect()
            })
            .collect();

        Ok((0..ctx.num_frames)
            .flat_map(|i| resampled.iter().map(move |channel| channel[i]))
            .collect())
    }

    fn channels(&self) -> usize {
        self.source.channels()
    }

    fn range(&self) -> (f64, f64) {
        self.source.range()
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
