//! Intervals: level pairs on the vertical axis.

use std::fmt;

use crate::level::Level;

/// A closed range `[from, to]` of vertical levels, with
/// `from.index() <= to.index()`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    from: Level,
    to: Level,
}

impl Interval {
    /// Create an interval. Panics if the levels are out of order.
    pub fn new(from: Level, to: Level) -> Self {
        assert!(
            from.index() <= to.index(),
            "interval levels out of order: {from:?} comes after {to:?}"
        );
        Interval { from, to }
    }

    pub fn from_level(self) -> Level {
        self.from
    }

    pub fn to_level(self) -> Level {
        self.to
    }

    /// Whether `next` starts exactly one grid position after `self`
    /// ends.
    pub fn is_contiguous_with(self, next: Interval) -> bool {
        self.to.index() + 1 == next.from.index()
    }

    /// Concatenate two adjacent intervals into one.
    ///
    /// Panics when the intervals are not contiguous: gluing levels with
    /// a gap or an overlap is a logic error in the caller, not a
    /// recoverable condition.
    pub fn concat(self, next: Interval) -> Interval {
        assert!(
            self.is_contiguous_with(next),
            "cannot concatenate non-contiguous intervals {self:?} and {next:?}"
        );
        Interval {
            from: self.from,
            to: next.to,
        }
    }
}

impl fmt::Debug for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}..{:?}]", self.from, self.to)
    }
}
