//! Per-input accessors handed to stencil closures.

use stencil_traits::{Cursor, CursorRead, Dim, DimMap};

/// A positioned, read-only accessor over one input domain.
///
/// Wraps the input's cursor at the current grid point together with the
/// input's own stride map, so a stencil can read its centre value and
/// its neighbours without knowing anything about layout.
pub struct StridedIter<'s, P: Cursor> {
    ptr: P,
    strides: &'s DimMap<P::Stride>,
}

impl<'s, P: CursorRead> StridedIter<'s, P> {
    pub fn new(ptr: P, strides: &'s DimMap<P::Stride>) -> Self {
        StridedIter { ptr, strides }
    }

    /// The value at the current grid point.
    ///
    /// The backend only constructs iterators at points inside the
    /// validated iteration envelope, so the centre read is always
    /// in-bounds.
    pub fn value(&self) -> P::Item {
        unsafe { self.ptr.read() }
    }

    /// The value at the given offsets from the current point.
    ///
    /// Offsets along dimensions the input does not span are ignored.
    ///
    /// # Safety
    ///
    /// The offsets must stay within the access extent this stencil
    /// declared, i.e. inside the storage the caller allocated around the
    /// compute domain.
    pub unsafe fn at(&self, offsets: &[(Dim, isize)]) -> P::Item {
        let mut ptr = self.ptr.clone();
        for &(dim, offset) in offsets {
            if let Some(stride) = self.strides.get(dim) {
                ptr.shift(stride, offset);
            }
        }
        ptr.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_sid::FieldArray;
    use stencil_traits::{dim_map, Sid, I, J};

    #[test]
    fn centre_and_neighbour_reads() {
        let a = FieldArray::from_fn(dim_map! { I => 3, J => 3 }, |idx| {
            (idx[0] * 10 + idx[1]) as f64
        });
        let view = a.view();
        let strides = view.strides();

        let mut ptr = view.origin();
        ptr.shift(strides.get(I).unwrap(), 1);
        ptr.shift(strides.get(J).unwrap(), 1);

        let it = StridedIter::new(ptr, &strides);
        assert_eq!(it.value(), 11.0);
        assert_eq!(unsafe { it.at(&[(I, -1)]) }, 1.0);
        assert_eq!(unsafe { it.at(&[(I, 1), (J, 1)]) }, 22.0);
        // Reading a neighbour does not move the iterator.
        assert_eq!(it.value(), 11.0);
    }

    #[test]
    fn offsets_along_unknown_dims_are_ignored() {
        let a = FieldArray::from_fn(dim_map! { I => 2 }, |idx| idx[0] as f64);
        let view = a.view();
        let strides = view.strides();
        let it = StridedIter::new(view.origin(), &strides);
        assert_eq!(unsafe { it.at(&[(J, 5)]) }, 0.0);
    }
}
