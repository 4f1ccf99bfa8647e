//! Grid and interval algebra for the bounded (vertical) axis.
//!
//! The vertical axis is partitioned by named *splitters*; a [`Level`] is
//! a position relative to a splitter, an [`Interval`] a pair of levels,
//! and an [`Axis`] the user-facing description of the whole partition.
//! A [`Grid`] combines the vertical partition with halo-aware horizontal
//! ranges and answers every bound query the loop backends need:
//! absolute level positions, interval point counts, start indices per
//! execution order, and extent-padded horizontal sizes.
//!
//! Level offsets follow a fixed asymmetric convention: a positive offset
//! `v` denotes `v - 1` raw points past its splitter while a non-positive
//! offset denotes `v` raw points before it (see [`level::real_offset`]).
//! All interval arithmetic in this crate is built on that rule;
//! replicate it bit-exactly when interoperating.

pub mod axis;
pub mod execution;
pub mod extent;
pub mod grid;
pub mod halo;
pub mod interval;
pub mod level;

pub use axis::Axis;
pub use execution::ExecutionOrder;
pub use extent::Extent;
pub use grid::{make_grid, Grid};
pub use halo::HaloDescriptor;
pub use interval::Interval;
pub use level::{Level, OFFSET_LIMIT};
