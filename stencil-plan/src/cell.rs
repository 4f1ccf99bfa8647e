//! Cells: one stage bound to one interval.

use stencil_grid::{ExecutionOrder, Extent, Interval};

use crate::plh::PlhMap;

/// One unit of stencil computation: a functor list bound to an
/// interval, a placeholder map, an enclosing extent, an execution
/// order, and a synchronisation requirement.
///
/// `F` is the functor handle type. The fusion algebra never looks
/// inside it; planning tests use plain labels, backends use type-erased
/// runnables.
#[derive(Clone, PartialEq, Debug)]
pub struct Cell<F> {
    pub funs: Vec<F>,
    pub interval: Interval,
    pub plh_map: PlhMap,
    pub extent: Extent,
    pub execution: ExecutionOrder,
    /// A barrier must complete before this cell runs. Fusion never
    /// crosses it.
    pub need_sync: bool,
}

impl<F: Clone> Cell<F> {
    /// Single-functor cell.
    pub fn new(
        fun: F,
        interval: Interval,
        plh_map: PlhMap,
        extent: Extent,
        execution: ExecutionOrder,
        need_sync: bool,
    ) -> Self {
        Cell {
            funs: vec![fun],
            interval,
            plh_map,
            extent,
            execution,
            need_sync,
        }
    }

    /// Cell with nothing to run, filling a matrix slot.
    pub fn empty(interval: Interval, execution: ExecutionOrder) -> Self {
        Cell {
            funs: Vec::new(),
            interval,
            plh_map: PlhMap::new(),
            extent: Extent::ZERO,
            execution,
            need_sync: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.funs.is_empty()
    }

    /// Whether `next` may fuse onto a run of stage cells: fusing is
    /// forbidden across a synchronisation boundary.
    pub fn can_fuse_stage(next: &Cell<F>) -> bool {
        !next.need_sync
    }

    /// Merge a run of same-interval stage cells into one.
    ///
    /// Functor lists concatenate in order, placeholder maps merge,
    /// extents widen, and the sync requirement survives if any cell had
    /// it.
    pub fn fuse_stages(cells: &[Cell<F>]) -> Cell<F> {
        assert!(!cells.is_empty(), "cannot fuse an empty run of cells");
        let first = &cells[0];
        let mut funs = Vec::new();
        let mut plh_map = PlhMap::new();
        let mut extent = Extent::ZERO;
        let mut need_sync = false;
        for cell in cells {
            assert_eq!(
                cell.interval, first.interval,
                "stage fusion requires cells of the same interval"
            );
            assert_eq!(
                cell.execution, first.execution,
                "stage fusion requires cells of the same execution order"
            );
            funs.extend(cell.funs.iter().cloned());
            plh_map = plh_map.merge(&cell.plh_map);
            extent = extent.enclosing(cell.extent);
            need_sync |= cell.need_sync;
        }
        Cell {
            funs,
            interval: first.interval,
            plh_map,
            extent,
            execution: first.execution,
            need_sync,
        }
    }
}

impl<F: Clone + PartialEq> Cell<F> {
    /// Whether two cells are identical apart from their intervals, the
    /// precondition for concatenating them along the axis.
    pub fn can_fuse_intervals(a: &Cell<F>, b: &Cell<F>) -> bool {
        a.funs == b.funs
            && a.plh_map == b.plh_map
            && a.extent == b.extent
            && a.execution == b.execution
            && a.need_sync == b.need_sync
    }

    /// Concatenate a run of interval-adjacent identical cells.
    ///
    /// Panics if the intervals are not contiguous.
    pub fn fuse_intervals(cells: &[Cell<F>]) -> Cell<F> {
        assert!(!cells.is_empty(), "cannot fuse an empty run of cells");
        let mut out = cells[0].clone();
        for cell in &cells[1..] {
            debug_assert!(Cell::can_fuse_intervals(&out, cell));
            out.interval = out.interval.concat(cell.interval);
        }
        out
    }
}
