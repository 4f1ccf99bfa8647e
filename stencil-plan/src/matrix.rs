//! The stage matrix and its fusion passes.

use tracing::debug;

use stencil_grid::{ExecutionOrder, Extent, Interval};

use crate::cell::Cell;
use crate::plh::PlhMap;

/// Description of one user stage before it is laid out on the matrix.
#[derive(Clone, Debug)]
pub struct StageRow<F> {
    pub fun: F,
    pub interval: Interval,
    pub plh_map: PlhMap,
    pub extent: Extent,
    pub execution: ExecutionOrder,
    pub need_sync: bool,
}

/// A 2D arrangement of cells: rows are stages, columns are intervals.
///
/// All rows share the same column interval sequence; a stage that does
/// not cover a column holds an empty cell there.
#[derive(Clone, Debug)]
pub struct StageMatrix<F> {
    rows: Vec<Vec<Cell<F>>>,
}

/// Greedily group maximal runs of adjacent elements.
///
/// `can_append(group, next)` decides whether `next` joins the current
/// run; each finished run is folded through `fuse`. Adjacency is the
/// only merge opportunity considered — elements are never reordered.
fn group_adjacent<T>(
    items: Vec<T>,
    mut can_append: impl FnMut(&[T], &T) -> bool,
    mut fuse: impl FnMut(&[T]) -> T,
) -> Vec<T> {
    let mut out = Vec::new();
    let mut run: Vec<T> = Vec::new();
    for item in items {
        if !run.is_empty() && !can_append(&run, &item) {
            out.push(fuse(&run));
            run.clear();
        }
        run.push(item);
    }
    if !run.is_empty() {
        out.push(fuse(&run));
    }
    out
}

impl<F: Clone> StageMatrix<F> {
    /// Build a matrix from explicit rows.
    ///
    /// Panics unless the rows are rectangular and agree on the column
    /// intervals.
    pub fn new(rows: Vec<Vec<Cell<F>>>) -> Self {
        assert!(!rows.is_empty(), "stage matrix needs at least one row");
        let columns = rows[0].len();
        assert!(columns > 0, "stage matrix needs at least one column");
        for row in &rows[1..] {
            assert_eq!(row.len(), columns, "stage matrix rows must be rectangular");
            for (cell, head) in row.iter().zip(&rows[0]) {
                assert_eq!(
                    cell.interval, head.interval,
                    "cells of one column must share an interval"
                );
            }
        }
        StageMatrix { rows }
    }

    /// Lay user stages out over the given column intervals.
    ///
    /// A stage covers every column its interval encloses; other slots
    /// get empty cells. Panics if a stage's interval does not line up
    /// with the column decomposition.
    pub fn from_stage_rows(columns: &[Interval], stages: &[StageRow<F>]) -> Self {
        assert!(!columns.is_empty(), "stage matrix needs at least one column");
        let rows = stages
            .iter()
            .map(|stage| {
                let covered: Vec<bool> = columns
                    .iter()
                    .map(|col| {
                        stage.interval.from_level().index() <= col.from_level().index()
                            && col.to_level().index() <= stage.interval.to_level().index()
                    })
                    .collect();
                let n_covered = covered.iter().filter(|&&c| c).count() as i64;
                let span: i64 = columns
                    .iter()
                    .zip(&covered)
                    .filter(|(_, &c)| c)
                    .map(|(col, _)| col.to_level().index() - col.from_level().index() + 1)
                    .sum();
                let stage_span =
                    stage.interval.to_level().index() - stage.interval.from_level().index() + 1;
                assert!(
                    n_covered > 0 && span == stage_span,
                    "stage interval {:?} does not align with the column decomposition",
                    stage.interval
                );
                columns
                    .iter()
                    .zip(&covered)
                    .map(|(col, &c)| {
                        if c {
                            Cell::new(
                                stage.fun.clone(),
                                *col,
                                stage.plh_map.clone(),
                                stage.extent,
                                stage.execution,
                                stage.need_sync,
                            )
                        } else {
                            Cell::empty(*col, stage.execution)
                        }
                    })
                    .collect()
            })
            .collect();
        StageMatrix::new(rows)
    }

    pub fn rows(&self) -> &[Vec<Cell<F>>] {
        &self.rows
    }

    /// Swap rows and columns.
    pub fn transpose(&self) -> Vec<Vec<Cell<F>>> {
        let cols = self.rows[0].len();
        (0..cols)
            .map(|j| self.rows.iter().map(|row| row[j].clone()).collect())
            .collect()
    }

    /// Merge adjacent stage rows separated by no synchronisation
    /// barrier.
    ///
    /// A row may join the run only if every one of its cells is
    /// sync-free; the merge is performed column by column.
    pub fn fuse_stages(&self) -> StageMatrix<F> {
        let before = self.rows.len();
        let rows = group_adjacent(
            self.rows.clone(),
            |_, next| next.iter().all(Cell::can_fuse_stage),
            |run| {
                let columns = run[0].len();
                (0..columns)
                    .map(|j| {
                        let column: Vec<Cell<F>> =
                            run.iter().map(|row| row[j].clone()).collect();
                        Cell::fuse_stages(&column)
                    })
                    .collect()
            },
        );
        debug!(stages = before, fused = rows.len(), "stage rows fused");
        StageMatrix { rows }
    }
}

/// One executable item of a [`SplitView`]: a run of cells of one stage
/// group, in execution order.
#[derive(Clone, Debug)]
pub struct SplitViewItem<F> {
    /// Cells to run, already reversed for backward execution.
    pub cells: Vec<Cell<F>>,
    /// The concatenated interval all cells together span.
    pub interval: Interval,
    pub execution: ExecutionOrder,
    pub extent: Extent,
    pub plh_map: PlhMap,
}

/// Flattened execution plan: one item per surviving stage group, in
/// user order.
#[derive(Clone, Debug)]
pub struct SplitView<F> {
    pub items: Vec<SplitViewItem<F>>,
    /// All placeholders of the plan, merged.
    pub plh_map: PlhMap,
}

impl<F> SplitView<F> {
    /// The plan's temporaries, in first-use order.
    pub fn tmp_plhs(&self) -> impl Iterator<Item = &crate::plh::PlhInfo> + '_ {
        self.plh_map.tmps()
    }
}

/// One interval's worth of a [`FusedView`]: the non-empty cells of all
/// stage groups covering that interval, in stage order.
#[derive(Clone, Debug)]
pub struct FusedViewItem<F> {
    pub interval: Interval,
    pub cells: Vec<Cell<F>>,
    pub execution: ExecutionOrder,
    pub extent: Extent,
}

/// Per-interval execution plan for backends that iterate intervals
/// explicitly.
#[derive(Clone, Debug)]
pub struct FusedView<F> {
    pub items: Vec<FusedViewItem<F>>,
}

impl<F: Clone + PartialEq> StageMatrix<F> {
    /// Flatten into the split view: stage-fuse, then per row
    /// concatenate contiguous identical cells and trim empty slots.
    pub fn split_view(&self) -> SplitView<F> {
        let fused = self.fuse_stages();
        let mut items = Vec::new();
        for row in fused.rows {
            let mut cells = group_adjacent(
                row,
                |run, next| Cell::can_fuse_intervals(run.last().expect("run is non-empty"), next),
                Cell::fuse_intervals,
            );
            // Empty slots survive only at the edges of a stage's span;
            // drop them there.
            while cells.first().is_some_and(Cell::is_empty) {
                cells.remove(0);
            }
            while cells.last().is_some_and(Cell::is_empty) {
                cells.pop();
            }
            if cells.is_empty() {
                continue;
            }
            let interval = cells[1..]
                .iter()
                .fold(cells[0].interval, |acc, cell| acc.concat(cell.interval));
            let execution = cells[0].execution;
            let extent = cells
                .iter()
                .fold(Extent::ZERO, |acc, cell| acc.enclosing(cell.extent));
            let plh_map = cells
                .iter()
                .fold(PlhMap::new(), |acc, cell| acc.merge(&cell.plh_map));
            if execution.is_backward() {
                cells.reverse();
            }
            items.push(SplitViewItem {
                cells,
                interval,
                execution,
                extent,
                plh_map,
            });
        }
        let plh_map = items
            .iter()
            .fold(PlhMap::new(), |acc, item| acc.merge(&item.plh_map));
        debug!(items = items.len(), plhs = plh_map.len(), "split view built");
        SplitView { items, plh_map }
    }

    /// Group by interval: stage-fuse, transpose so rows become
    /// intervals, concatenate whole interval rows whose cells all agree,
    /// and trim rows with nothing to run.
    pub fn fused_view(&self) -> FusedView<F> {
        let fused = self.fuse_stages();
        let interval_rows = group_adjacent(
            fused.transpose(),
            |run, next| {
                let last = run.last().expect("run is non-empty");
                last.iter()
                    .zip(next.iter())
                    .all(|(a, b)| Cell::can_fuse_intervals(a, b))
            },
            |run| {
                let columns = run[0].len();
                (0..columns)
                    .map(|j| {
                        let column: Vec<Cell<F>> =
                            run.iter().map(|row| row[j].clone()).collect();
                        Cell::fuse_intervals(&column)
                    })
                    .collect()
            },
        );
        let items: Vec<FusedViewItem<F>> = interval_rows
            .into_iter()
            .filter_map(|row| {
                let interval = row[0].interval;
                let execution = row[0].execution;
                let cells: Vec<Cell<F>> =
                    row.into_iter().filter(|cell| !cell.is_empty()).collect();
                if cells.is_empty() {
                    return None;
                }
                let extent = cells
                    .iter()
                    .fold(Extent::ZERO, |acc, cell| acc.enclosing(cell.extent));
                Some(FusedViewItem {
                    interval,
                    cells,
                    execution,
                    extent,
                })
            })
            .collect();
        debug!(items = items.len(), "fused view built");
        FusedView { items }
    }
}
