//! The reference loop/apply backend.
//!
//! This backend is deliberately the simplest possible implementation of
//! the iteration contract: one nested scalar loop per dimension, in the
//! order dimensions appear in the sizes map, visiting every point of the
//! hyper-rectangle exactly once. No blocking, no vectorisation, no
//! threads — it is the correctness oracle optimised backends are
//! validated against, and its deterministic point order is what makes
//! floating-point results reproducible.
//!
//! Entry points are the [`apply_stencil1`]..[`apply_stencil4`] family:
//! each bundles its output and inputs into a composite domain, shifts
//! the composite origin by the starting offsets, and evaluates the
//! stencil closure once per point, handing it one [`StridedIter`] per
//! input and writing the returned value through the output cursor.

pub mod apply;
pub mod iter;
pub mod loops;

pub use apply::{apply_stencil1, apply_stencil2, apply_stencil3, apply_stencil4};
pub use iter::StridedIter;
pub use loops::nested_loops;
