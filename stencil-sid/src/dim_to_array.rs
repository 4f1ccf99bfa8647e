//! Reinterpret one dimension as a fixed-size array value at each point.
//!
//! Folding dimension `d` with extent `N` produces a domain whose stride
//! map no longer lists `d`; instead, dereferencing a cursor yields the
//! `N` elements reachable along `d` as one `[T; N]` value. Writes go
//! element-wise straight back to the base storage — the folded view is
//! an alias, not a copy.

use stencil_traits::{Cursor, CursorRead, CursorWrite, Dim, DimMap, Sid, StrideOf};

/// Cursor of a folded domain: the base cursor plus the folded stride.
pub struct PtrArray<P: Cursor, const N: usize> {
    ptr: P,
    stride: P::Stride,
}

impl<P: Cursor, const N: usize> Clone for PtrArray<P, N> {
    fn clone(&self) -> Self {
        PtrArray {
            ptr: self.ptr.clone(),
            stride: self.stride.clone(),
        }
    }
}

impl<P: Cursor, const N: usize> PtrArray<P, N> {
    /// Base cursor shifted to folded position `k`.
    fn element_ptr(&self, k: usize) -> P {
        debug_assert!(k < N, "folded index {k} out of range");
        let mut p = self.ptr.clone();
        p.shift(&self.stride, k as isize);
        p
    }

    /// Read the element at folded position `k`.
    ///
    /// # Safety
    ///
    /// Same positional requirement as [`CursorRead::read`].
    pub unsafe fn read_at(&self, k: usize) -> P::Item
    where
        P: CursorRead,
    {
        self.element_ptr(k).read()
    }

    /// Write the element at folded position `k`.
    ///
    /// # Safety
    ///
    /// Same positional requirement as [`CursorWrite::write`].
    pub unsafe fn write_at(&self, k: usize, value: P::Item)
    where
        P: CursorWrite,
    {
        self.element_ptr(k).write(value)
    }
}

impl<P: Cursor, const N: usize> Cursor for PtrArray<P, N> {
    type Stride = P::Stride;

    fn shift(&mut self, stride: &Self::Stride, offset: isize) {
        self.ptr.shift(stride, offset);
    }
}

impl<P: CursorRead, const N: usize> CursorRead for PtrArray<P, N> {
    type Item = [P::Item; N];

    unsafe fn read(&self) -> Self::Item {
        std::array::from_fn(|k| unsafe { self.element_ptr(k).read() })
    }
}

impl<P: CursorWrite, const N: usize> CursorWrite for PtrArray<P, N> {
    unsafe fn write(&self, value: Self::Item) {
        for (k, v) in value.into_iter().enumerate() {
            self.element_ptr(k).write(v);
        }
    }
}

/// A domain with one dimension folded into `[T; N]` point values.
#[derive(Clone)]
pub struct DimToArray<S: Sid, const N: usize> {
    inner: S,
    dim: Dim,
}

/// Fold `dim` (extent `N`) of `sid` into per-point array values.
///
/// Panics if `sid` does not span `dim`: a folded dimension the base
/// knows nothing about is a programming error, caught at construction.
pub fn dimension_to_array<const N: usize, S: Sid>(sid: S, dim: Dim) -> DimToArray<S, N> {
    assert!(
        sid.strides().contains(dim),
        "cannot fold dimension {dim}: base domain does not span it"
    );
    DimToArray { inner: sid, dim }
}

impl<S: Sid, const N: usize> Sid for DimToArray<S, N> {
    type Ptr = PtrArray<S::Ptr, N>;

    fn origin(&self) -> Self::Ptr {
        let stride = self
            .inner
            .strides()
            .get(self.dim)
            .expect("checked at construction")
            .clone();
        PtrArray {
            ptr: self.inner.origin(),
            stride,
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldArray;
    use stencil_traits::{dim_map, I, J};

    #[test]
    fn folded_dimension_disappears_from_the_stride_map() {
        let a = FieldArray::from_fn(dim_map! { I => 3, J => 4 }, |idx| {
            (idx[0] * 10 + idx[1]) as f64
        });
        let folded = dimension_to_array::<4, _>(a.view(), J);
        let strides = folded.strides();
        assert!(strides.contains(I));
        assert!(!strides.contains(J));
        assert!(!folded.upper_bounds().contains(J));
    }

    #[test]
    fn fold_then_index_matches_direct_indexing() {
        // B[i][j]: fold j with extent 4; origin at row i0 yields B[i0][k].
        let b = FieldArray::from_fn(dim_map! { I => 3, J => 4 }, |idx| {
            (idx[0] * 100 + idx[1]) as f64
        });
        let folded = dimension_to_array::<4, _>(b.view(), J);
        let strides = folded.strides();

        for i0 in 0..3 {
            let mut ptr = folded.origin();
            ptr.shift(strides.get(I).unwrap(), i0 as isize);
            for k in 0..4 {
                assert_eq!(unsafe { ptr.read_at(k) }, b.get(&[i0, k]));
            }
            assert_eq!(unsafe { ptr.read() }, [
                b.get(&[i0, 0]),
                b.get(&[i0, 1]),
                b.get(&[i0, 2]),
                b.get(&[i0, 3]),
            ]);
        }
    }

    #[test]
    fn writes_through_the_folded_view_land_in_the_base() {
        let mut b = FieldArray::from_fn(dim_map! { I => 2, J => 3 }, |_| 0.0f64);
        {
            let folded = dimension_to_array::<3, _>(b.view_mut(), J);
            let strides = folded.strides();
            let mut ptr = folded.origin();
            ptr.shift(strides.get(I).unwrap(), 1);
            unsafe { ptr.write([7.0, 8.0, 9.0]) };
            unsafe { ptr.write_at(0, 42.0) };
        }
        assert_eq!(b.get(&[1, 0]), 42.0);
        assert_eq!(b.get(&[1, 1]), 8.0);
        assert_eq!(b.get(&[1, 2]), 9.0);
        assert_eq!(b.get(&[0, 0]), 0.0);
    }

    #[test]
    fn folding_the_unit_stride_dimension_aliases_correctly() {
        // j is the fastest-varying axis here; folding it must still
        // alias element-for-element.
        let mut b = FieldArray::from_fn(dim_map! { I => 2, J => 2 }, |idx| {
            (idx[0] * 2 + idx[1]) as f64
        });
        let folded = dimension_to_array::<2, _>(b.view_mut(), J);
        let ptr = folded.origin();
        assert_eq!(unsafe { ptr.read() }, [0.0, 1.0]);
        unsafe { ptr.write_at(1, 10.0) };
        drop(folded);
        assert_eq!(b.get(&[0, 1]), 10.0);
    }

    #[test]
    fn nested_folding_commutes_with_direct_indexing() {
        // Fold j (inner), then i (outer): reading [a][b] must equal
        // direct access data[a][b].
        let b = FieldArray::from_fn(dim_map! { I => 2, J => 3 }, |idx| {
            (idx[0] * 3 + idx[1]) as f64
        });
        let folded = dimension_to_array::<2, _>(dimension_to_array::<3, _>(b.view(), J), I);
        let ptr = folded.origin();
        let value: [[f64; 3]; 2] = unsafe { ptr.read() };
        for a in 0..2 {
            for k in 0..3 {
                assert_eq!(value[a][k], b.get(&[a, k]));
            }
        }
    }

    #[test]
    #[should_panic(expected = "does not span")]
    fn folding_an_unknown_dimension_panics() {
        let a = FieldArray::from_fn(dim_map! { I => 2 }, |_| 0.0f64);
        let _ = dimension_to_array::<2, _>(a.view(), J);
    }
}
