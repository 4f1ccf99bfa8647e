//! Structured-grid stencil composition.
//!
//! `stencil-rs` expresses finite-difference / finite-volume style
//! kernels over structured grids as *stencil stages* bound to vertical
//! intervals, fuses compatible stages at plan-construction time, and
//! drives them through a reference loop backend. The workspace is split
//! by concern:
//!
//! - `stencil-traits`: the iteration-domain contract — anything that
//!   can produce an origin cursor, per-dimension strides, and a shift
//!   operation is loopable
//! - `stencil-sid`: concrete domains — strided field views, owned
//!   storage, composites, dimension folding, positional domains
//! - `stencil-grid`: the vertical level/interval algebra and
//!   halo-aware grids
//! - `stencil-plan`: the stage matrix and its fusion passes
//! - `stencil-naive`: the single-threaded reference apply engine
//!
//! This crate re-exports the public surface of all of them and adds the
//! [`Schedule`] driver that lowers user stages onto the fusion matrix
//! and executes the resulting plan.
//!
//! # Example: a copy stencil
//!
//! ```
//! use stencil_rs::{
//!     apply_stencil1, dim_map, domain_sizes, make_grid, run_single_stage, Extent, FieldArray,
//!     I, J, K,
//! };
//!
//! let input = FieldArray::from_fn(dim_map! { I => 3, J => 3, K => 1 }, |idx| {
//!     (idx[0] + idx[1] + idx[2]) as f64
//! });
//! let mut output: FieldArray<f64> = FieldArray::zeroed(dim_map! { I => 3, J => 3, K => 1 });
//!
//! let grid = make_grid(3, 3, 1);
//! {
//!     let out_view = output.view_mut();
//!     let in_view = input.view();
//!     run_single_stage(&grid, Extent::ZERO, |k| {
//!         let (sizes, offsets) = domain_sizes(&grid, Extent::ZERO, k);
//!         apply_stencil1(&sizes, &offsets, &out_view, &in_view, |inp| inp.value());
//!     });
//! }
//! assert_eq!(output.as_slice(), input.as_slice());
//! ```

pub mod schedule;

pub use schedule::{domain_sizes, run_single_stage, KRange, Schedule, StageDesc};

pub use stencil_traits::{
    dim_map, multi_shift, Cursor, CursorRead, CursorWrite, Dim, DimMap, Sid, StrideOf, Tag, I, J,
    K,
};

pub use stencil_sid::{
    contiguous_strides, dimension_to_array, dimension_to_tuple, remove_dimension, shift_origin,
    Composite, DimToArray, FieldArray, FieldError, FieldPtr, FieldPtrMut, FieldView, FieldViewMut,
    Positional, PtrArray, RemoveDim, ShiftOrigin,
};

pub use stencil_grid::{
    make_grid, Axis, ExecutionOrder, Extent, Grid, HaloDescriptor, Interval, Level, OFFSET_LIMIT,
};

pub use stencil_plan::{
    Cell, DataType, FusedView, FusedViewItem, Intent, Plh, PlhInfo, PlhMap, SplitView,
    SplitViewItem, StageMatrix, StageRow,
};

pub use stencil_naive::{
    apply_stencil1, apply_stencil2, apply_stencil3, apply_stencil4, nested_loops, StridedIter,
};
