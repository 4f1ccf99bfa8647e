//! The user-facing description of the vertical partition.

use crate::interval::Interval;
use crate::level::Level;

/// A vertical axis split into consecutive regions.
///
/// `n` region sizes give `n + 1` splitters. The axis' full interval is
/// one level bigger than the largest usable k interval, which makes the
/// full-interval point count equal the summed region sizes.
#[derive(Clone, Debug)]
pub struct Axis {
    interval_sizes: Vec<i64>,
}

impl Axis {
    /// Create an axis from per-region vertical extents.
    pub fn new(interval_sizes: impl Into<Vec<i64>>) -> Self {
        let interval_sizes = interval_sizes.into();
        assert!(!interval_sizes.is_empty(), "axis needs at least one region");
        assert!(
            interval_sizes.iter().all(|&s| s > 0),
            "axis region sizes must be positive, got {interval_sizes:?}"
        );
        Axis { interval_sizes }
    }

    /// Single-region axis of `dk` vertical points.
    pub fn flat(dk: i64) -> Self {
        Axis::new(vec![dk])
    }

    pub fn interval_sizes(&self) -> &[i64] {
        &self.interval_sizes
    }

    pub fn num_regions(&self) -> usize {
        self.interval_sizes.len()
    }

    pub fn num_splitters(&self) -> usize {
        self.interval_sizes.len() + 1
    }

    /// The interval spanning the whole axis.
    pub fn full_interval(&self) -> Interval {
        Interval::new(Level::new(0, 1), Level::new(self.num_regions(), -1))
    }

    /// The atomic interval of region `r`: from splitter `r` up to (but
    /// not including) splitter `r + 1`.
    pub fn region(&self, r: usize) -> Interval {
        assert!(r < self.num_regions(), "axis has no region {r}");
        Interval::new(Level::new(r, 1), Level::new(r + 1, -1))
    }
}
