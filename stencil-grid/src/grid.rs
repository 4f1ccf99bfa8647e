//! The grid: horizontal halo-aware ranges plus the vertical level table.

use crate::axis::Axis;
use crate::execution::ExecutionOrder;
use crate::extent::Extent;
use crate::halo::HaloDescriptor;
use crate::interval::Interval;
use crate::level::{real_offset, Level};

/// Owns the iteration bounds of one computation: low bound and size per
/// horizontal axis, and the cumulative start value of every vertical
/// splitter.
#[derive(Clone, Debug)]
pub struct Grid {
    i_low_bound: isize,
    i_size: isize,
    j_low_bound: isize,
    j_size: isize,
    value_list: Vec<i64>,
    interval: Interval,
}

impl Grid {
    /// Build a grid from two horizontal halo descriptors and a vertical
    /// axis.
    pub fn new(direction_i: &HaloDescriptor, direction_j: &HaloDescriptor, axis: &Axis) -> Self {
        Grid::from_parts(
            direction_i,
            direction_j,
            axis.full_interval(),
            axis.interval_sizes(),
        )
    }

    /// Build a grid from an explicit interval and per-splitter sizes.
    ///
    /// Panics when the number of sizes does not match the interval's
    /// splitter count: the level table would be ill-formed, which is a
    /// construction-time programming error.
    pub fn from_parts(
        direction_i: &HaloDescriptor,
        direction_j: &HaloDescriptor,
        interval: Interval,
        interval_sizes: &[i64],
    ) -> Self {
        let splitters = interval.to_level().splitter() - interval.from_level().splitter() + 1;
        assert_eq!(
            interval_sizes.len() + 1,
            splitters,
            "interval spans {splitters} splitters but {} sizes were supplied",
            interval_sizes.len()
        );
        let mut value_list = Vec::with_capacity(splitters);
        value_list.push(0);
        for &size in interval_sizes {
            value_list.push(value_list.last().unwrap() + size);
        }
        Grid {
            i_low_bound: direction_i.begin(),
            i_size: direction_i.end() + 1 - direction_i.begin(),
            j_low_bound: direction_j.begin(),
            j_size: direction_j.end() + 1 - direction_j.begin(),
            value_list,
            interval,
        }
    }

    /// The full vertical interval this grid was built over.
    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn i_low_bound(&self) -> isize {
        self.i_low_bound
    }

    pub fn j_low_bound(&self) -> isize {
        self.j_low_bound
    }

    /// Horizontal i extent, padded by the stencil's footprint.
    pub fn i_size(&self, extent: Extent) -> isize {
        self.i_size + extent.iplus as isize - extent.iminus as isize
    }

    /// Horizontal j extent, padded by the stencil's footprint.
    pub fn j_size(&self, extent: Extent) -> isize {
        self.j_size + extent.jplus as isize - extent.jminus as isize
    }

    /// Absolute vertical position of `level`.
    pub fn value_at(&self, level: Level) -> i64 {
        self.value_list[level.splitter()] + real_offset(level.offset())
    }

    /// Number of grid points spanned by `[from, to]`, inclusive of both
    /// ends and symmetric under direction.
    pub fn count(&self, from: Level, to: Level) -> i64 {
        if from.splitter() == to.splitter() {
            let delta = real_offset(to.offset()) - real_offset(from.offset());
            1 + delta.abs()
        } else if from.splitter() < to.splitter() {
            self.value_list[to.splitter()] - self.value_list[from.splitter()]
                + real_offset(to.offset())
                - real_offset(from.offset())
                + 1
        } else {
            self.value_list[from.splitter()] - self.value_list[to.splitter()]
                + real_offset(from.offset())
                - real_offset(to.offset())
                + 1
        }
    }

    /// First vertical index of `interval` for the given execution
    /// order, relative to [`Grid::k_min`].
    pub fn k_start(&self, interval: Interval, execution: ExecutionOrder) -> i64 {
        let level = match execution {
            ExecutionOrder::Forward => interval.from_level(),
            ExecutionOrder::Backward => interval.to_level(),
        };
        self.value_at(level) - self.k_min()
    }

    /// Vertical point count of `interval`.
    pub fn k_size(&self, interval: Interval) -> i64 {
        self.count(interval.from_level(), interval.to_level())
    }

    /// Absolute position of the grid's lowest vertical point.
    pub fn k_min(&self) -> i64 {
        real_offset(self.interval.from_level().offset())
    }

    /// Total length of the vertical axis.
    pub fn k_total_length(&self) -> i64 {
        self.value_at(self.interval.to_level()) - self.k_min() + 1
    }
}

/// Dense convenience grid: `di` by `dj` horizontal points, single
/// vertical region of `dk` points.
pub fn make_grid(di: usize, dj: usize, dk: i64) -> Grid {
    Grid::new(
        &HaloDescriptor::dense(di),
        &HaloDescriptor::dense(dj),
        &Axis::flat(dk),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_region_grid() -> Grid {
        // Vertical regions of 4, 2 and 6 points.
        Grid::new(
            &HaloDescriptor::dense(8),
            &HaloDescriptor::dense(9),
            &Axis::new(vec![4, 2, 6]),
        )
    }

    #[test]
    fn value_at_is_the_cumulative_region_sum() {
        let grid = three_region_grid();
        assert_eq!(grid.value_at(Level::new(0, 1)), 0);
        assert_eq!(grid.value_at(Level::new(1, 1)), 4);
        assert_eq!(grid.value_at(Level::new(2, 1)), 6);
        assert_eq!(grid.value_at(Level::new(3, 1)), 12);
        // Offsets displace around the splitter.
        assert_eq!(grid.value_at(Level::new(1, -1)), 3);
        assert_eq!(grid.value_at(Level::new(1, 2)), 5);
    }

    #[test]
    fn full_interval_count_is_the_total_size() {
        let grid = three_region_grid();
        let full = grid.interval();
        assert_eq!(grid.count(full.from_level(), full.to_level()), 12);
        assert_eq!(grid.k_size(full), 12);
        assert_eq!(grid.k_total_length(), 12);
    }

    #[test]
    fn count_is_symmetric_under_direction() {
        let grid = three_region_grid();
        let a = Level::new(0, 2);
        let b = Level::new(2, -1);
        assert_eq!(grid.count(a, b), grid.count(b, a));
        // points 1..=5 inclusive
        assert_eq!(grid.count(a, b), 5);
    }

    #[test]
    fn count_within_one_splitter_is_closed_form() {
        let grid = three_region_grid();
        assert_eq!(grid.count(Level::new(1, -2), Level::new(1, 2)), 4);
        assert_eq!(grid.count(Level::new(1, 2), Level::new(1, -2)), 4);
        assert_eq!(grid.count(Level::new(1, 1), Level::new(1, 1)), 1);
    }

    #[test]
    fn k_start_dispatches_on_execution_order() {
        let grid = three_region_grid();
        let middle = Interval::new(Level::new(1, 1), Level::new(2, -1));
        assert_eq!(grid.k_start(middle, ExecutionOrder::Forward), 4);
        assert_eq!(grid.k_start(middle, ExecutionOrder::Backward), 5);
        assert_eq!(grid.k_size(middle), 2);
    }

    #[test]
    fn horizontal_sizes_are_extent_padded() {
        let grid = three_region_grid();
        assert_eq!(grid.i_size(Extent::ZERO), 8);
        assert_eq!(grid.j_size(Extent::ZERO), 9);
        let ext = Extent::horizontal(-1, 2, -1, 1);
        assert_eq!(grid.i_size(ext), 11);
        assert_eq!(grid.j_size(ext), 11);
    }

    #[test]
    fn haloed_grid_starts_at_the_halo_boundary() {
        let grid = Grid::new(
            &HaloDescriptor::new(2, 2, 2, 7, 10),
            &HaloDescriptor::dense(3),
            &Axis::flat(1),
        );
        assert_eq!(grid.i_low_bound(), 2);
        assert_eq!(grid.i_size(Extent::ZERO), 6);
    }

    #[test]
    #[should_panic(expected = "sizes were supplied")]
    fn size_count_mismatch_panics() {
        let interval = Interval::new(Level::new(0, 1), Level::new(3, -1));
        let _ = Grid::from_parts(
            &HaloDescriptor::dense(4),
            &HaloDescriptor::dense(4),
            interval,
            &[4, 2],
        );
    }
}
