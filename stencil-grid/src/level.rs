//! Levels: positions relative to the vertical axis' splitters.

use std::fmt;

/// Maximum magnitude of a level offset.
///
/// Bounding the offset keeps [`Level::index`] a bijection, which the
/// interval contiguity checks rely on.
pub const OFFSET_LIMIT: i32 = 2;

/// Map a level offset to its raw displacement from the splitter.
///
/// Offsets are 1-based on the positive side: `+1` means "exactly at the
/// splitter", `+2` one point past it, while `-1` means one point before
/// it. Hence `v > 0` maps to `v - 1` and `v <= 0` maps to `v`. This
/// asymmetry is load-bearing for all interval arithmetic; treat it as a
/// fixed rule.
pub const fn real_offset(v: i32) -> i64 {
    if v > 0 {
        (v - 1) as i64
    } else {
        v as i64
    }
}

/// A position on the vertical axis: a splitter index plus a signed,
/// non-zero offset with `|offset| <= OFFSET_LIMIT`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Level {
    splitter: usize,
    offset: i32,
}

impl Level {
    /// Create a level. Panics on a zero or out-of-range offset: those
    /// do not denote positions and would break the index bijection.
    pub fn new(splitter: usize, offset: i32) -> Self {
        assert!(
            offset != 0 && offset.abs() <= OFFSET_LIMIT,
            "level offset must be non-zero with |offset| <= {OFFSET_LIMIT}, got {offset}"
        );
        Level { splitter, offset }
    }

    pub fn splitter(self) -> usize {
        self.splitter
    }

    pub fn offset(self) -> i32 {
        self.offset
    }

    /// Total-order index of this level along the axis.
    ///
    /// Consecutive indices denote adjacent grid positions, so two
    /// intervals are contiguous exactly when the first ends at index
    /// `n` and the second starts at index `n + 1`.
    pub fn index(self) -> i64 {
        2 * OFFSET_LIMIT as i64 * self.splitter as i64
            + OFFSET_LIMIT as i64
            + real_offset(self.offset)
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level({}, {:+})", self.splitter, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_offset_is_asymmetric() {
        assert_eq!(real_offset(1), 0);
        assert_eq!(real_offset(2), 1);
        assert_eq!(real_offset(-1), -1);
        assert_eq!(real_offset(-2), -2);
    }

    #[test]
    fn index_is_monotone_in_splitter_then_offset() {
        let order = [
            Level::new(0, -2),
            Level::new(0, -1),
            Level::new(0, 1),
            Level::new(0, 2),
            Level::new(1, -2),
            Level::new(1, -1),
            Level::new(1, 1),
        ];
        for pair in order.windows(2) {
            assert_eq!(pair[0].index() + 1, pair[1].index());
        }
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn zero_offset_is_rejected() {
        let _ = Level::new(0, 0);
    }

    #[test]
    #[should_panic(expected = "level offset")]
    fn out_of_range_offset_is_rejected() {
        let _ = Level::new(0, OFFSET_LIMIT + 1);
    }
}
