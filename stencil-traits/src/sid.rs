//! The stencil iteration domain (SID) contract.
//!
//! A SID is anything that can hand out a cursor into its backing storage
//! together with per-dimension strides to shift that cursor by. The
//! contract is deliberately minimal: the whole loop machinery downstream
//! is expressed in terms of `origin`, `strides` and `shift` alone, so any
//! storage layout that can describe itself this way is loopable.

use crate::dim::DimMap;

/// A cursor into a domain's backing storage.
///
/// Cursors are cheap to clone; a clone is an independent position.
/// Shifting is additive: shifting by `a` and then by `b` along the same
/// stride lands on the same element as shifting once by `a + b`, and a
/// zero offset is a no-op.
pub trait Cursor: Clone {
    /// The per-dimension stride bundle this cursor shifts by.
    ///
    /// For a plain field cursor this is a scalar element stride; for a
    /// composite cursor it is a bundle of per-component strides.
    type Stride: Clone;

    /// Move this cursor by `offset` steps along `stride`, in place.
    fn shift(&mut self, stride: &Self::Stride, offset: isize);
}

/// A stencil iteration domain: the origin/strides/shift capability set.
pub trait Sid {
    /// The cursor type produced by this domain.
    type Ptr: Cursor;

    /// A fresh cursor positioned at the domain's logical origin.
    ///
    /// Pure and repeatable: two calls yield two independent, unaliased
    /// cursors positioned identically.
    fn origin(&self) -> Self::Ptr;

    /// One stride per logical dimension this domain spans.
    fn strides(&self) -> DimMap<StrideOf<Self>>;

    /// Inclusive lower iteration bounds, per dimension, where known.
    ///
    /// Empty by default; domains that know their extents (field views)
    /// report them so engines can check requested envelopes.
    fn lower_bounds(&self) -> DimMap<isize> {
        DimMap::new()
    }

    /// Exclusive upper iteration bounds, per dimension, where known.
    fn upper_bounds(&self) -> DimMap<isize> {
        DimMap::new()
    }
}

/// The stride type of a domain's cursor.
pub type StrideOf<S> = <<S as Sid>::Ptr as Cursor>::Stride;

/// Read access to the element under a cursor.
pub trait CursorRead: Cursor {
    /// The element value produced by a read.
    type Item;

    /// Read the element under the cursor.
    ///
    /// # Safety
    ///
    /// The cursor must lie within the envelope that was validated when
    /// the underlying domain was constructed.
    unsafe fn read(&self) -> Self::Item;
}

/// Write access to the element under a cursor.
pub trait CursorWrite: CursorRead {
    /// Write `value` to the element under the cursor.
    ///
    /// # Safety
    ///
    /// Same positional requirement as [`CursorRead::read`], and the
    /// cursor must originate from a mutable domain.
    unsafe fn write(&self, value: Self::Item);
}

/// Shift `ptr` along every dimension present in both `strides` and
/// `offsets`.
///
/// Dimensions named in `offsets` that the stride map does not know are
/// skipped: the domain does not span them, so there is nothing to move.
pub fn multi_shift<P: Cursor>(ptr: &mut P, strides: &DimMap<P::Stride>, offsets: &DimMap<isize>) {
    for (dim, offset) in offsets.iter() {
        if let Some(stride) = strides.get(dim) {
            ptr.shift(stride, *offset);
        }
    }
}

/// Domains can be bundled and looped by reference.
impl<S: Sid> Sid for &S {
    type Ptr = S::Ptr;

    fn origin(&self) -> Self::Ptr {
        (**self).origin()
    }

    fn strides(&self) -> DimMap<StrideOf<Self>> {
        (**self).strides()
    }

    fn lower_bounds(&self) -> DimMap<isize> {
        (**self).lower_bounds()
    }

    fn upper_bounds(&self) -> DimMap<isize> {
        (**self).upper_bounds()
    }
}
