//! Interpolation between envelope breakpoints.

/// A `(time, value)` pair on an envelope, time in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub time: f64,
    pub value: f64,
}

impl Breakpoint {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

impl From<(f64, f64)> for Breakpoint {
    fn from((time, value): (f64, f64)) -> Self {
        Self::new(time, value)
    }
}

/// How values move between two breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Straight line between the values
    #[default]
    Linear,

    /// Straight line between the logarithms of the values, which sounds even
    /// for gain and frequency sweeps.
    ///
    /// Every value must be strictly positive.
    Logarithmic,
}

impl Interpolation {
    /// Value at `time` on the segment `from -> to`.
    ///
    /// `time` is clamped to the segment, so a zero-length segment or a time
    /// outside it yields an endpoint value.
    ///
    /// # Examples
    ///
    /// ```
    /// use unitgen::envelopes::{Breakpoint, Interpolation};
    ///
    /// let from = Breakpoint::new(0.0, 1.0);
    /// let to = Breakpoint::new(1.0, 100.0);
    /// assert_eq!(Interpolation::Linear.between(&from, &to, 0.5), 50.5);
    /// assert!((Interpolation::Logarithmic.between(&from, &to, 0.5) - 10.0).abs() < 1e-9);
    /// ```
    pub fn between(&self, from: &Breakpoint, to: &Breakpoint, time: f64) -> f64 {
        let span = to.time - from.time;
        if span <= 0.0 {
            return to.value;
        }
        let t = ((time - from.time) / span).clamp(0.0, 1.0);
        match self {
            Interpolation::Linear => from.value + (to.value - from.value) * t,
            Interpolation::Logarithmic => {
                let (lo, hi) = (from.value.ln(), to.value.ln());
                (lo + (hi - lo) * t).exp()
            }
        }
    }

    /// Whether `value` can sit on an envelope using this interpolation.
    pub fn accepts(&self, value: f64) -> bool {
        match self {
            Interpolation::Linear => value.is_finite(),
            Interpolation::Logarithmic => value.is_finite() && value > 0.0,
        }
    }
}
