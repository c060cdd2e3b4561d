//! Breakpoint envelope.

use std::fmt;

use log::debug;

use super::{Breakpoint, Interpolation};
use crate::{Context, Error, Result, Synthesize};

/// Produces the breakpoint that follows the last one.
pub type Extension = Box<dyn FnMut(&Breakpoint) -> Breakpoint + Send>;

/// A mono control signal that follows a list of `(time, value)` breakpoints.
///
/// Time is read from the node's cursor, so an envelope restarts when its
/// cursor is set back to zero. Before the first breakpoint the first value
/// is held. When a block reaches past the last breakpoint, the extension
/// rule (if any) is asked for further points until the block is covered;
/// without one the block fails with [`Error::EnvelopeExhausted`].
///
/// # Examples
///
/// ```
/// use unitgen::{Envelope, Node, Oscillator, Tick};
///
/// // 10 ms attack, then a 200 ms fall to silence.
/// let amp = Envelope::new([(0.0, 0.0), (0.01, 1.0), (0.21, 0.0)])
///     .unwrap()
///     .holding();
/// let voice = Node::new(Oscillator::sine(330.0)) * Node::new(amp);
///
/// let block = voice.generate(Tick::new(0), 512, 44100.0).unwrap();
/// assert_eq!(block.samples.len(), 512);
/// ```
pub struct Envelope {
    points: Vec<Breakpoint>,
    interpolation: Interpolation,
    extension: Option<Extension>,
    range: (f64, f64),
}

impl Envelope {
    /// Creates a linear envelope with no extension rule.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidEnvelope`] when `points` is empty, a value or time is
    /// not finite, or times are not strictly increasing.
    pub fn new<P: Into<Breakpoint>>(points: impl IntoIterator<Item = P>) -> Result<Self> {
        let points: Vec<Breakpoint> = points.into_iter().map(Into::into).collect();
        if points.is_empty() {
            return Err(Error::InvalidEnvelope(
                "at least one breakpoint is required".into(),
            ));
        }
        if points.iter().any(|p| !p.time.is_finite() || !p.value.is_finite()) {
            return Err(Error::InvalidEnvelope(
                "breakpoints must be finite".into(),
            ));
        }
        if points.windows(2).any(|pair| pair[1].time <= pair[0].time) {
            return Err(Error::InvalidEnvelope(
                "breakpoint times must be strictly increasing".into(),
            ));
        }

        let range = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.value), hi.max(p.value))
        });
        Ok(Self {
            points,
            interpolation: Interpolation::Linear,
            extension: None,
            range,
        })
    }

    /// Switches the interpolation mode.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidEnvelope`] when a breakpoint value is not usable with
    /// `interpolation` (logarithmic needs strictly positive values).
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Result<Self> {
        if let Some(bad) = self.points.iter().find(|p| !interpolation.accepts(p.value)) {
            return Err(Error::InvalidEnvelope(format!(
                "value {} at t = {}s is not valid for {interpolation:?} interpolation",
                bad.value, bad.time
            )));
        }
        self.interpolation = interpolation;
        Ok(self)
    }

    /// Sets the rule that synthesizes a breakpoint after the last one.
    pub fn with_extension(
        mut self,
        extension: impl FnMut(&Breakpoint) -> Breakpoint + Send + 'static,
    ) -> Self {
        self.extension = Some(Box::new(extension));
        self
    }

    /// Extends the envelope by holding its last value, one second at a time.
    pub fn holding(self) -> Self {
        self.with_extension(|last| Breakpoint::new(last.time + 1.0, last.value))
    }

    pub fn points(&self) -> &[Breakpoint] {
        &self.points
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Appends breakpoints until one reaches `time`.
    fn extend_to(&mut self, time: f64) -> Result<()> {
        while let Some(last) = self.points.last().copied()
            && last.time < time
        {
            let Some(extension) = self.extension.as_mut() else {
                return Err(Error::EnvelopeExhausted { time });
            };
            let next = extension(&last);
            let advances = next.time > last.time;
            if !advances || !self.interpolation.accepts(next.value) {
                return Err(Error::InvalidEnvelope(format!(
                    "extension produced ({}, {}) after ({}, {})",
                    next.time, next.value, last.time, last.value
                )));
            }
            debug!("envelope extended to t = {}s", next.time);
            self.points.push(next);
        }
        Ok(())
    }

    /// Envelope value at `time` seconds.
    ///
    /// Times past the last breakpoint hold its value.
    pub fn value_at(&self, time: f64) -> f64 {
        let after = self.points.partition_point(|p| p.time <= time);
        match (after.checked_sub(1), self.points.get(after)) {
            (Some(i), Some(next)) => self.interpolation.between(&self.points[i], next, time),
            (Some(i), None) => self.points[i].value,
            (None, _) => self.points.first().map_or(0.0, |p| p.value),
        }
    }
}

impl Synthesize for Envelope {
    fn synthesize(&mut self, ctx: &Context) -> Result<Vec<f64>> {
        if ctx.num_frames == 0 {
            return Ok(Vec::new());
        }
        self.extend_to(ctx.frame_time(ctx.num_frames - 1))?;

        Ok((0..ctx.num_frames)
            .map(|i| self.value_at(ctx.frame_time(i)))
            .collect())
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("points", &self.points)
            .field("interpolation", &self.interpolation)
            .field("extends", &self.extension.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Node, Tick};

    #[test]
    fn test_rejects_bad_shapes() {
        let empty: [(f64, f64); 0] = [];
        assert!(matches!(Envelope::new(empty), Err(Error::InvalidEnvelope(_))));
        assert!(Envelope::new([(0.0, 1.0), (0.0, 2.0)]).is_err());
        assert!(Envelope::new([(1.0, 1.0), (0.5, 2.0)]).is_err());
        assert!(Envelope::new([(0.0, f64::NAN)]).is_err());
    }

    #[test]
    fn test_log_needs_positive_values() {
        let env = Envelope::new([(0.0, 0.0), (1.0, 1.0)]).unwrap();
        assert!(env.with_interpolation(Interpolation::Logarithmic).is_err());

        let env = Envelope::new([(0.0, 0.5), (1.0, 1.0)]).unwrap();
        assert!(env.with_interpolation(Interpolation::Logarithmic).is_ok());
    }

    #[test]
    fn test_linear_ramp_follows_cursor() {
        // 10 Hz: frame k is at k/10 seconds
        let env = Node::new(Envelope::new([(0.0, 0.0), (1.0, 1.0)]).unwrap());
        let first = env.generate(Tick::new(0), 5, 10.0).unwrap().samples;
        let second = env.generate(Tick::new(1), 5, 10.0).unwrap().samples;
        let expected = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
        for (got, want) in first.iter().chain(&second).zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_before_first_breakpoint_holds_first_value() {
        let env = Envelope::new([(0.5, 2.0), (1.0, 4.0)]).unwrap();
        assert_eq!(env.value_at(0.0), 2.0);
        assert_eq!(env.value_at(0.75), 3.0);
        assert_eq!(env.value_at(5.0), 4.0);
    }

    #[test]
    fn test_missing_extension_fails() {
        let env = Node::new(Envelope::new([(0.0, 1.0), (0.2, 0.0)]).unwrap());
        // frames 0..=2 at 10 Hz reach t = 0.2 exactly
        assert!(env.generate(Tick::new(0), 3, 10.0).is_ok());
        let err = env.generate(Tick::new(1), 3, 10.0).unwrap_err();
        assert!(matches!(err, Error::EnvelopeExhausted { .. }));
    }

    #[test]
    fn test_extension_covers_whole_block() {
        let mut calls = 0;
        let env = Envelope::new([(0.0, 0.0)]).unwrap().with_extension(move |last| {
            calls += 1;
            Breakpoint::new(last.time + 0.1, calls as f64)
        });
        let node = Node::new(env);
        node.generate(Tick::new(0), 10, 10.0).unwrap();
        // frames 0..=9 at 10 Hz end at 0.9 seconds
        node.with(|e| {
            let last = e.points().last().unwrap();
            assert!(last.time >= 0.9 - 1e-12);
        });
    }

    #[test]
    fn test_extension_must_advance() {
        let env = Node::new(
            Envelope::new([(0.0, 1.0)])
                .unwrap()
                .with_extension(|last| *last),
        );
        assert!(matches!(
            env.generate(Tick::new(0), 4, 10.0),
            Err(Error::InvalidEnvelope(_))
        ));
    }

    #[test]
    fn test_holding() {
        let env = Node::new(Envelope::new([(0.0, 0.0), (0.1, 0.7)]).unwrap().holding());
        let samples = env.generate(Tick::new(0), 40, 10.0).unwrap().samples;
        assert_eq!(samples[0], 0.0);
        assert!(samples[1..].iter().all(|&s| (s - 0.7).abs() < 1e-12));
    }

    #[test]
    fn test_logarithmic_sweep() {
        let env = Envelope::new([(0.0, 100.0), (1.0, 10_000.0)])
            .unwrap()
            .with_interpolation(Interpolation::Logarithmic)
            .unwrap();
        assert!((env.value_at(0.5) - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_declared_range_spans_breakpoints() {
        let env = Node::new(Envelope::new([(0.0, 200.0), (1.0, 800.0), (2.0, 400.0)]).unwrap());
        assert_eq!(env.range(), (200.0, 800.0));
    }
}
