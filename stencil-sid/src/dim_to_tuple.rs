//! Tuple-flavoured dimension folding, built from two smaller
//! combinators: origin shifting and dimension removal.
//!
//! [`dimension_to_tuple`] bundles `N` copies of the base domain, the
//! k-th copy origin-shifted by `k` along the folded dimension and with
//! that dimension removed from its stride map. The result is an
//! anonymous composite whose cursors read and write all `N` elements at
//! once, and which can be folded again along a different dimension.

use stencil_traits::{Cursor, Dim, DimMap, Sid, StrideOf};

use crate::composite::Composite;

/// A domain with one dimension hidden from its stride and bound maps.
///
/// All other operations are forwarded to the owned inner domain.
#[derive(Clone)]
pub struct RemoveDim<S: Sid> {
    inner: S,
    dim: Dim,
}

/// Hide `dim` from `sid`'s stride map.
///
/// Panics if `sid` does not span `dim`.
pub fn remove_dimension<S: Sid>(sid: S, dim: Dim) -> RemoveDim<S> {
    assert!(
        sid.strides().contains(dim),
        "cannot remove dimension {dim}: base domain does not span it"
    );
    RemoveDim { inner: sid, dim }
}

impl<S: Sid> Sid for RemoveDim<S> {
    type Ptr = S::Ptr;

    fn origin(&self) -> Self::Ptr {
        self.inner.origin()
    }

    fn strides(&self) -> DimMap<StrideOf<S>> {
        let mut strides = self.inner.strides();
        strides.remove(self.dim);
        strides
    }

    fn lower_bounds(&self) -> DimMap<isize> {
        let mut bounds = self.inner.lower_bounds();
        bounds.remove(self.dim);
        bounds
    }

    fn upper_bounds(&self) -> DimMap<isize> {
        let mut bounds = self.inner.upper_bounds();
        bounds.remove(self.dim);
        bounds
    }
}

/// A domain whose origin is pre-shifted along one dimension.
#[derive(Clone)]
pub struct ShiftOrigin<S: Sid> {
    inner: S,
    dim: Dim,
    offset: isize,
}

/// Shift `sid`'s logical origin by `offset` along `dim`.
///
/// Panics if `sid` does not span `dim`.
pub fn shift_origin<S: Sid>(sid: S, dim: Dim, offset: isize) -> ShiftOrigin<S> {
    assert!(
        sid.strides().contains(dim),
        "cannot shift origin along {dim}: base domain does not span it"
    );
    ShiftOrigin {
        inner: sid,
        dim,
        offset,
    }
}

impl<S: Sid> Sid for ShiftOrigin<S> {
    type Ptr = S::Ptr;

    fn origin(&self) -> Self::Ptr {
        let mut ptr = self.inner.origin();
        let strides = self.inner.strides();
        let stride = strides.get(self.dim).expect("checked at construction");
        ptr.shift(stride, self.offset);
        ptr
    }

    fn strides(&self) -> DimMap<StrideOf<S>> {
        self.inner.strides()
    }

    fn lower_bounds(&self) -> DimMap<isize> {
        let mut bounds = self.inner.lower_bounds();
        if let Some(b) = bounds.get_mut(self.dim) {
            *b -= self.offset;
        }
        bounds
    }

    fn upper_bounds(&self) -> DimMap<isize> {
        let mut bounds = self.inner.upper_bounds();
        if let Some(b) = bounds.get_mut(self.dim) {
            *b -= self.offset;
        }
        bounds
    }
}

/// Fold `dim` (extent `N`) of `sid` into an anonymous composite of `N`
/// origin-shifted, dimension-removed copies.
///
/// The composite's cursors dereference to `[T; N]` and expose the k-th
/// element as component `k`; because the result is itself a full
/// iteration domain, several dimensions can be folded in sequence.
pub fn dimension_to_tuple<const N: usize, S: Sid + Clone>(
    sid: S,
    dim: Dim,
) -> Composite<[RemoveDim<ShiftOrigin<S>>; N]> {
    Composite::from_array(std::array::from_fn(|k| {
        remove_dimension(shift_origin(sid.clone(), dim, k as isize), dim)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldArray;
    use stencil_traits::{dim_map, Cursor, CursorRead, CursorWrite, I, J};

    #[test]
    fn remove_dimension_hides_the_dim_but_keeps_the_cursor() {
        let a = FieldArray::from_fn(dim_map! { I => 2, J => 3 }, |idx| {
            (idx[0] * 3 + idx[1]) as f64
        });
        let r = remove_dimension(a.view(), J);
        assert!(!r.strides().contains(J));
        assert!(r.strides().contains(I));
        assert_eq!(unsafe { r.origin().read() }, 0.0);
    }

    #[test]
    fn shift_origin_pre_positions_cursors() {
        let a = FieldArray::from_fn(dim_map! { J => 5 }, |idx| idx[0] as f64);
        let s = shift_origin(a.view(), J, 2);
        assert_eq!(unsafe { s.origin().read() }, 2.0);
        // Bounds move opposite to the origin.
        assert_eq!(s.upper_bounds().get(J), Some(&3));
        assert_eq!(s.lower_bounds().get(J), Some(&-2));
    }

    #[test]
    fn tuple_fold_reads_all_elements_at_a_point() {
        let a = FieldArray::from_fn(dim_map! { I => 2, J => 3 }, |idx| {
            (idx[0] * 10 + idx[1]) as f64
        });
        let folded = dimension_to_tuple::<3, _>(a.view(), J);
        let strides = folded.strides();
        assert!(!strides.contains(J));

        let mut ptr = folded.origin();
        assert_eq!(unsafe { ptr.read() }, [0.0, 1.0, 2.0]);
        ptr.shift(strides.get(I).unwrap(), 1);
        assert_eq!(unsafe { ptr.read() }, [10.0, 11.0, 12.0]);
    }

    #[test]
    fn tuple_fold_writes_back_to_the_base() {
        let mut a = FieldArray::from_fn(dim_map! { J => 3 }, |_| 0.0f64);
        {
            let folded = dimension_to_tuple::<3, _>(a.view_mut(), J);
            let ptr = folded.origin();
            unsafe { ptr.write([1.0, 2.0, 3.0]) };
        }
        assert_eq!(a.get(&[0]), 1.0);
        assert_eq!(a.get(&[1]), 2.0);
        assert_eq!(a.get(&[2]), 3.0);
    }

    #[test]
    fn folding_two_dimensions_in_sequence() {
        let a = FieldArray::from_fn(dim_map! { I => 2, J => 2 }, |idx| {
            (idx[0] * 2 + idx[1]) as f64
        });
        let folded = dimension_to_tuple::<2, _>(dimension_to_tuple::<2, _>(a.view(), J), I);
        let ptr = folded.origin();
        let value: [[f64; 2]; 2] = unsafe { ptr.read() };
        for i in 0..2 {
            for j in 0..2 {
                assert_eq!(value[i][j], a.get(&[i, j]));
            }
        }
    }

    #[test]
    #[should_panic(expected = "does not span")]
    fn shifting_along_an_unknown_dimension_panics() {
        let a = FieldArray::from_fn(dim_map! { I => 2 }, |_| 0.0f64);
        let _ = shift_origin(a.view(), J, 1);
    }
}
