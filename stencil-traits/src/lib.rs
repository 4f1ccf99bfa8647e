//! Shared traits for the stencil-rs ecosystem.
//!
//! This crate defines the iteration-domain contract that every loopable
//! entity (field views, composites, reinterpreted domains, synthetic
//! domains) must satisfy, plus the dimension-tag containers the contract
//! is phrased in.
//!
//! The contract has three capabilities:
//!
//! - **origin**: produce a fresh, independent [`Cursor`] positioned at the
//!   domain's logical origin ([`Sid::origin`]),
//! - **strides**: report one stride per logical dimension
//!   ([`Sid::strides`]),
//! - **shift**: move a cursor along a stride by an integer offset
//!   ([`Cursor::shift`]).
//!
//! Downstream crates (`stencil-sid`, `stencil-naive`) build every view
//! combinator and loop engine on top of these three operations alone.

pub mod bundle;
pub mod dim;
pub mod sid;

pub use dim::{Dim, DimMap, Tag, I, J, K};
pub use sid::{multi_shift, Cursor, CursorRead, CursorWrite, Sid, StrideOf};

/// Build a [`DimMap`] literal in insertion order.
///
/// ```
/// use stencil_traits::{dim_map, DimMap, I, J};
///
/// let sizes: DimMap<usize> = dim_map! { I => 3, J => 4 };
/// assert_eq!(sizes.get(I), Some(&3));
/// ```
#[macro_export]
macro_rules! dim_map {
    () => { $crate::DimMap::new() };
    ($($dim:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::DimMap::new();
        $( map.insert($dim, $value); )+
        map
    }};
}
