//! Stage/cell fusion planning.
//!
//! A computation arrives as a matrix of [`Cell`]s: one row per stage,
//! one column per vertical interval. This crate performs the fusion
//! passes that turn the raw matrix into an execution plan:
//!
//! 1. **Stage fusion** — adjacent stage rows merge when no row after the
//!    first demands a synchronisation barrier; functor lists concatenate
//!    and placeholder maps merge.
//! 2. **Interval fusion** — adjacent cells that are identical except for
//!    contiguous intervals collapse into one cell spanning the
//!    concatenated interval.
//! 3. **Trimming** — cells whose functor list emptied out are dropped.
//!
//! Fusion only ever merges *adjacent* cells: user-specified evaluation
//! order is preserved, which is what keeps data dependencies through
//! shared temporaries correct.
//!
//! The output is either a [`SplitView`] (flat per-stage item list, for
//! backends that run one k-loop per item) or a [`FusedView`] (grouped
//! per interval, for backends that iterate intervals explicitly). Both
//! are plain construction-time data: nothing here runs a loop.
//!
//! Merging placeholder maps reconciles data types; a conflict is a
//! programming error and panics at plan construction, as does
//! concatenating non-contiguous intervals.

pub mod cell;
pub mod matrix;
pub mod plh;

pub use cell::Cell;
pub use matrix::{FusedView, FusedViewItem, SplitView, SplitViewItem, StageMatrix, StageRow};
pub use plh::{CacheIoPolicy, CacheType, DataType, Intent, Plh, PlhInfo, PlhMap};
