//! Lowering user stages onto the fusion matrix and running the plan.

use stencil_grid::{ExecutionOrder, Extent, Grid, Interval, Level};
use stencil_plan::{PlhMap, StageMatrix, StageRow};
use stencil_traits::{dim_map, DimMap, I, J, K};

/// The vertical range one cell executes over.
#[derive(Clone, Copy, Debug)]
pub struct KRange {
    /// First vertical index in execution order, relative to the grid's
    /// lowest point.
    pub start: i64,
    /// Number of vertical points.
    pub size: i64,
    pub execution: ExecutionOrder,
}

impl KRange {
    /// The lowest vertical index of the range, independent of
    /// direction.
    pub fn lowest(&self) -> i64 {
        match self.execution {
            ExecutionOrder::Forward => self.start,
            ExecutionOrder::Backward => self.start - self.size + 1,
        }
    }
}

/// One user stage: plan metadata plus the runnable that applies it over
/// a vertical range.
pub struct StageDesc<'a> {
    pub name: &'static str,
    pub interval: Interval,
    pub extent: Extent,
    pub plh_map: PlhMap,
    pub execution: ExecutionOrder,
    pub need_sync: bool,
    run: Box<dyn FnMut(KRange) + 'a>,
}

impl<'a> StageDesc<'a> {
    pub fn new(
        name: &'static str,
        interval: Interval,
        execution: ExecutionOrder,
        run: impl FnMut(KRange) + 'a,
    ) -> Self {
        StageDesc {
            name,
            interval,
            extent: Extent::ZERO,
            plh_map: PlhMap::new(),
            execution,
            need_sync: false,
            run: Box::new(run),
        }
    }

    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_plhs(mut self, plh_map: PlhMap) -> Self {
        self.plh_map = plh_map;
        self
    }

    /// Require a barrier before this stage; fusion will not cross it.
    pub fn with_sync(mut self) -> Self {
        self.need_sync = true;
        self
    }
}

/// Collects stages against one grid, fuses them, and runs the plan.
///
/// Stage intervals must start and end on splitter boundaries of the
/// grid's axis; the matrix columns are the axis' atomic regions.
pub struct Schedule<'a> {
    grid: &'a Grid,
    stages: Vec<StageDesc<'a>>,
}

impl<'a> Schedule<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Schedule {
            grid,
            stages: Vec::new(),
        }
    }

    pub fn add_stage(&mut self, stage: StageDesc<'a>) -> &mut Self {
        self.stages.push(stage);
        self
    }

    /// The atomic column intervals of the grid's axis.
    fn columns(&self) -> Vec<Interval> {
        let interval = self.grid.interval();
        let first = interval.from_level().splitter();
        let last = interval.to_level().splitter();
        (first..last)
            .map(|s| Interval::new(Level::new(s, 1), Level::new(s + 1, -1)))
            .collect()
    }

    /// Fuse and execute all stages in user order.
    ///
    /// Stages are laid out on the stage matrix, the split view is taken
    /// (stage fusion across sync-free boundaries, interval
    /// concatenation, trimming), and each surviving cell runs over its
    /// grid-derived vertical range. Returns the number of cells
    /// executed.
    pub fn run(mut self) -> usize {
        if self.stages.is_empty() {
            return 0;
        }
        let columns = self.columns();
        let rows: Vec<StageRow<usize>> = self
            .stages
            .iter()
            .enumerate()
            .map(|(n, stage)| StageRow {
                fun: n,
                interval: stage.interval,
                plh_map: stage.plh_map.clone(),
                extent: stage.extent,
                execution: stage.execution,
                need_sync: stage.need_sync,
            })
            .collect();
        let view = StageMatrix::from_stage_rows(&columns, &rows).split_view();

        let mut cells_run = 0;
        for item in &view.items {
            for cell in &item.cells {
                let krange = KRange {
                    start: self.grid.k_start(cell.interval, cell.execution),
                    size: self.grid.k_size(cell.interval),
                    execution: cell.execution,
                };
                for &stage_index in &cell.funs {
                    (self.stages[stage_index].run)(krange);
                }
                cells_run += 1;
            }
        }
        cells_run
    }
}

/// Horizontal-plus-vertical sizes and starting offsets for a stage
/// application over `k`, padded by the stencil's extent.
///
/// Sizes nest i, then j, then k; offsets position the envelope at the
/// grid's halo-aware low bounds (widened by the minus extents) and at
/// the lowest vertical index of `k`.
pub fn domain_sizes(grid: &Grid, extent: Extent, k: KRange) -> (DimMap<usize>, DimMap<isize>) {
    let sizes = dim_map! {
        I => grid.i_size(extent) as usize,
        J => grid.j_size(extent) as usize,
        K => k.size as usize,
    };
    let offsets = dim_map! {
        I => grid.i_low_bound() + extent.iminus as isize,
        J => grid.j_low_bound() + extent.jminus as isize,
        K => k.lowest() as isize,
    };
    (sizes, offsets)
}

/// Run one stage over the grid's full vertical interval, routed through
/// the fusion pipeline (a single stage is its identity case).
pub fn run_single_stage<'a>(grid: &'a Grid, extent: Extent, run: impl FnMut(KRange) + 'a) {
    let mut schedule = Schedule::new(grid);
    schedule.add_stage(
        StageDesc::new("stage", grid.interval(), ExecutionOrder::Forward, run).with_extent(extent),
    );
    schedule.run();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use stencil_grid::{make_grid, Axis, HaloDescriptor};

    fn grid_with_regions(sizes: Vec<i64>) -> Grid {
        Grid::new(
            &HaloDescriptor::dense(4),
            &HaloDescriptor::dense(4),
            &Axis::new(sizes),
        )
    }

    #[test]
    fn single_stage_runs_once_over_the_full_axis() {
        let grid = make_grid(4, 4, 6);
        let ranges = RefCell::new(Vec::new());
        run_single_stage(&grid, Extent::ZERO, |k| ranges.borrow_mut().push(k));
        let ranges = ranges.into_inner();
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].start, 0);
        assert_eq!(ranges[0].size, 6);
    }

    #[test]
    fn fused_stages_share_a_cell_and_preserve_order() {
        let grid = grid_with_regions(vec![3, 2]);
        let log = RefCell::new(Vec::new());
        let mut schedule = Schedule::new(&grid);
        schedule.add_stage(StageDesc::new(
            "first",
            grid.interval(),
            ExecutionOrder::Forward,
            |_| log.borrow_mut().push("first"),
        ));
        schedule.add_stage(StageDesc::new(
            "second",
            grid.interval(),
            ExecutionOrder::Forward,
            |_| log.borrow_mut().push("second"),
        ));
        let cells = schedule.run();
        assert_eq!(cells, 1);
        assert_eq!(log.into_inner(), vec!["first", "second"]);
    }

    #[test]
    fn sync_splits_execution_into_two_cells() {
        let grid = make_grid(4, 4, 5);
        let log = RefCell::new(Vec::new());
        let mut schedule = Schedule::new(&grid);
        schedule.add_stage(StageDesc::new(
            "first",
            grid.interval(),
            ExecutionOrder::Forward,
            |_| log.borrow_mut().push("first"),
        ));
        schedule.add_stage(
            StageDesc::new("second", grid.interval(), ExecutionOrder::Forward, |_| {
                log.borrow_mut().push("second")
            })
            .with_sync(),
        );
        let cells = schedule.run();
        assert_eq!(cells, 2);
        assert_eq!(log.into_inner(), vec!["first", "second"]);
    }

    #[test]
    fn partial_interval_stage_gets_its_regions_range() {
        let grid = grid_with_regions(vec![3, 2]);
        let upper = Interval::new(Level::new(1, 1), Level::new(2, -1));
        let ranges = RefCell::new(Vec::new());
        let mut schedule = Schedule::new(&grid);
        schedule.add_stage(StageDesc::new(
            "upper",
            upper,
            ExecutionOrder::Forward,
            |k| ranges.borrow_mut().push(k),
        ));
        schedule.run();
        let ranges = ranges.into_inner();
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].start, 3);
        assert_eq!(ranges[0].size, 2);
    }

    #[test]
    fn backward_ranges_start_at_the_top() {
        let grid = make_grid(4, 4, 6);
        let ranges = RefCell::new(Vec::new());
        let mut schedule = Schedule::new(&grid);
        schedule.add_stage(StageDesc::new(
            "down",
            grid.interval(),
            ExecutionOrder::Backward,
            |k| ranges.borrow_mut().push(k),
        ));
        schedule.run();
        let ranges = ranges.into_inner();
        assert_eq!(ranges[0].start, 5);
        assert_eq!(ranges[0].size, 6);
        assert_eq!(ranges[0].lowest(), 0);
    }

    #[test]
    fn domain_sizes_cover_the_halo_padded_envelope() {
        let grid = make_grid(5, 4, 3);
        let k = KRange {
            start: 0,
            size: 3,
            execution: ExecutionOrder::Forward,
        };
        let extent = Extent::horizontal(-1, 1, 0, 0);
        let (sizes, offsets) = domain_sizes(&grid, extent, k);
        assert_eq!(sizes.get(I), Some(&7));
        assert_eq!(sizes.get(J), Some(&4));
        assert_eq!(sizes.get(K), Some(&3));
        assert_eq!(offsets.get(I), Some(&-1));
        assert_eq!(offsets.get(J), Some(&0));
        assert_eq!(offsets.get(K), Some(&0));
    }
}
