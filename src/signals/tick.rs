//! Tick identifiers used to deduplicate evaluations within one driver call.

/// Identifies one pull of the root node by the driver.
///
/// Drivers alternate between two ids on successive blocks. A node that is
/// asked for the same tick twice (because two parents share it) hands back
/// what it computed the first time. Ticks carry no timing information; a
/// node's position in time comes from its cursor alone.
///
/// # Examples
///
/// ```
/// use unitgen::Tick;
///
/// let tick = Tick::new(0);
/// assert_eq!(tick.next(), Tick::new(1));
/// assert_eq!(tick.next().next(), tick);
/// assert!(Tick::ALWAYS.is_always());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tick(u32);

impl Tick {
    /// Sentinel that forces every node to recompute, even when its last
    /// evaluation carried the same id.
    pub const ALWAYS: Tick = Tick(u32::MAX);

    pub const fn new(id: u32) -> Self {
        Tick(id)
    }

    /// The id a driver uses for the block after this one.
    ///
    /// `ALWAYS` stays `ALWAYS`.
    pub fn next(self) -> Self {
        if self.is_always() {
            self
        } else {
            Tick((self.0 + 1) % 2)
        }
    }

    pub fn is_always(self) -> bool {
        self == Self::ALWAYS
    }

    pub fn id(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternation() {
        let mut tick = Tick::default();
        let ids: Vec<u32> = (0..5)
            .map(|_| {
                let id = tick.id();
                tick = tick.next();
                id
            })
            .collect();
        assert_eq!(ids, vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_always_is_sticky() {
        assert_eq!(Tick::ALWAYS.next(), Tick::ALWAYS);
        assert!(!Tick::new(1).is_always());
    }

    #[test]
    fn test_next_folds_large_ids() {
        assert_eq!(Tick::new(7).next(), Tick::new(0));
    }
}
