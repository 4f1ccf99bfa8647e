//! Concrete iteration domains and domain combinators.
//!
//! This crate supplies everything that *is* a stencil iteration domain:
//!
//! - [`FieldView`] / [`FieldViewMut`]: zero-copy strided views over
//!   caller-owned slices, with the full iteration envelope validated at
//!   construction
//! - [`FieldArray`]: owned dense storage with `from_fn` initializers
//! - [`Composite`]: a tagged bundle of several domains presented as one
//! - [`dimension_to_array`] / [`dimension_to_tuple`]: reinterpret one
//!   dimension as a fixed-size per-point value
//! - [`remove_dimension`] / [`shift_origin`]: the underlying delegating
//!   combinators
//! - [`Positional`]: a synthetic domain whose elements are their own
//!   (i, j, k) coordinates
//!
//! Construction-time contract violations (bundling duplicate tags,
//! folding a dimension the base does not span) panic; failures that
//! depend on runtime-supplied data (a stride table that escapes its
//! backing slice) are reported as [`FieldError`].

pub mod composite;
pub mod dim_to_array;
pub mod dim_to_tuple;
pub mod field;
pub mod positional;

pub use composite::Composite;
pub use dim_to_array::{dimension_to_array, DimToArray, PtrArray};
pub use dim_to_tuple::{dimension_to_tuple, remove_dimension, shift_origin, RemoveDim, ShiftOrigin};
pub use field::{
    contiguous_strides, FieldArray, FieldPtr, FieldPtrMut, FieldView, FieldViewMut,
};
pub use positional::{PosStride, Positional, PositionPtr};

/// Errors from constructing field views over runtime-supplied layouts.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    /// Sizes and strides do not describe the same dimension set.
    #[error("size/stride dimension mismatch: sizes cover {sizes:?}, strides cover {strides:?}")]
    DimMismatch {
        sizes: Vec<&'static str>,
        strides: Vec<&'static str>,
    },

    /// Some reachable offset escapes the backing slice.
    #[error("iteration envelope escapes backing storage of {len} elements")]
    OutOfBounds { len: usize },

    /// Integer overflow while computing the iteration envelope.
    #[error("offset overflow while computing iteration envelope")]
    OffsetOverflow,
}

/// Result type for field construction.
pub type Result<T> = std::result::Result<T, FieldError>;
