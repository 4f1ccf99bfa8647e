//! Strided field views and owned field storage.
//!
//! A field view is the canonical iteration domain: a raw base pointer
//! plus one (size, stride) pair per dimension tag. Views never own their
//! data; [`FieldArray`] provides owned backing storage for tests and
//! standalone use.

use std::marker::PhantomData;

use num_traits::Zero;
use stencil_traits::{Cursor, CursorRead, CursorWrite, Dim, DimMap, Sid};

use crate::{FieldError, Result};

/// Validate that every offset reachable from `offset` through the
/// (size, stride) table stays within `[0, len)`.
fn validate_envelope(
    len: usize,
    sizes: &DimMap<usize>,
    strides: &DimMap<isize>,
    offset: isize,
) -> Result<()> {
    let size_keys: Vec<_> = sizes.keys().collect();
    let stride_keys: Vec<_> = strides.keys().collect();
    if size_keys.len() != stride_keys.len() || size_keys.iter().any(|d| !strides.contains(*d)) {
        return Err(FieldError::DimMismatch {
            sizes: size_keys.iter().map(|d| d.name()).collect(),
            strides: stride_keys.iter().map(|d| d.name()).collect(),
        });
    }
    // Empty field: nothing is ever accessed.
    if sizes.values().any(|&s| s == 0) {
        return Ok(());
    }
    let mut min_offset = offset;
    let mut max_offset = offset;
    for (dim, &size) in sizes.iter() {
        let stride = *strides.get(dim).expect("checked above");
        if size > 1 {
            let end = stride
                .checked_mul(size as isize - 1)
                .ok_or(FieldError::OffsetOverflow)?;
            if end >= 0 {
                max_offset = max_offset
                    .checked_add(end)
                    .ok_or(FieldError::OffsetOverflow)?;
            } else {
                min_offset = min_offset
                    .checked_add(end)
                    .ok_or(FieldError::OffsetOverflow)?;
            }
        }
    }
    if min_offset < 0 || max_offset < 0 || max_offset as usize >= len {
        return Err(FieldError::OutOfBounds { len });
    }
    Ok(())
}

/// Dense strides for the given sizes, last-inserted dimension fastest.
pub fn contiguous_strides(sizes: &DimMap<usize>) -> DimMap<isize> {
    let dims: Vec<(Dim, usize)> = sizes.iter().map(|(d, &s)| (d, s)).collect();
    let mut stride = 1isize;
    let mut rev: Vec<(Dim, isize)> = Vec::with_capacity(dims.len());
    for &(dim, size) in dims.iter().rev() {
        rev.push((dim, stride));
        stride *= size as isize;
    }
    // Re-emit in the original key order.
    let mut out = DimMap::new();
    for (dim, _) in dims {
        let s = rev.iter().find(|(d, _)| *d == dim).expect("same keys").1;
        out.insert(dim, s);
    }
    out
}

// ============================================================================
// Cursors
// ============================================================================

/// Read-only cursor into a field's backing storage.
pub struct FieldPtr<T> {
    ptr: *const T,
}

impl<T> Clone for FieldPtr<T> {
    fn clone(&self) -> Self {
        FieldPtr { ptr: self.ptr }
    }
}

impl<T> Cursor for FieldPtr<T> {
    type Stride = isize;

    fn shift(&mut self, stride: &isize, offset: isize) {
        self.ptr = self.ptr.wrapping_offset(stride * offset);
    }
}

impl<T: Copy> CursorRead for FieldPtr<T> {
    type Item = T;

    unsafe fn read(&self) -> T {
        *self.ptr
    }
}

/// Mutable cursor into a field's backing storage.
pub struct FieldPtrMut<T> {
    ptr: *mut T,
}

impl<T> Clone for FieldPtrMut<T> {
    fn clone(&self) -> Self {
        FieldPtrMut { ptr: self.ptr }
    }
}

impl<T> Cursor for FieldPtrMut<T> {
    type Stride = isize;

    fn shift(&mut self, stride: &isize, offset: isize) {
        self.ptr = self.ptr.wrapping_offset(stride * offset);
    }
}

impl<T: Copy> CursorRead for FieldPtrMut<T> {
    type Item = T;

    unsafe fn read(&self) -> T {
        *self.ptr
    }
}

impl<T: Copy> CursorWrite for FieldPtrMut<T> {
    unsafe fn write(&self, value: T) {
        *self.ptr = value;
    }
}

// ============================================================================
// FieldView
// ============================================================================

/// Read-only strided view over a borrowed slice.
#[derive(Debug)]
pub struct FieldView<'a, T> {
    ptr: *const T,
    sizes: DimMap<usize>,
    strides: DimMap<isize>,
    _marker: PhantomData<&'a [T]>,
}

unsafe impl<T: Sync> Send for FieldView<'_, T> {}
unsafe impl<T: Sync> Sync for FieldView<'_, T> {}

impl<T> Clone for FieldView<'_, T> {
    fn clone(&self) -> Self {
        FieldView {
            ptr: self.ptr,
            sizes: self.sizes.clone(),
            strides: self.strides.clone(),
            _marker: PhantomData,
        }
    }
}

impl<'a, T> FieldView<'a, T> {
    /// Create a view with the origin at `data[offset]`.
    ///
    /// The full iteration envelope is validated here; cursors derived
    /// from the view may then be shifted anywhere inside `sizes` safely.
    pub fn new(
        data: &'a [T],
        sizes: DimMap<usize>,
        strides: DimMap<isize>,
        offset: isize,
    ) -> Result<Self> {
        validate_envelope(data.len(), &sizes, &strides, offset)?;
        Ok(FieldView {
            ptr: data.as_ptr().wrapping_offset(offset),
            sizes,
            strides,
            _marker: PhantomData,
        })
    }

    pub fn sizes(&self) -> &DimMap<usize> {
        &self.sizes
    }
}

impl<T> Sid for FieldView<'_, T> {
    type Ptr = FieldPtr<T>;

    fn origin(&self) -> FieldPtr<T> {
        FieldPtr { ptr: self.ptr }
    }

    fn strides(&self) -> DimMap<isize> {
        self.strides.clone()
    }

    fn lower_bounds(&self) -> DimMap<isize> {
        self.sizes.map_values(|_, _| 0)
    }

    fn upper_bounds(&self) -> DimMap<isize> {
        self.sizes.map_values(|_, &s| s as isize)
    }
}

// ============================================================================
// FieldViewMut
// ============================================================================

/// Mutable strided view over a borrowed slice.
pub struct FieldViewMut<'a, T> {
    ptr: *mut T,
    sizes: DimMap<usize>,
    strides: DimMap<isize>,
    _marker: PhantomData<&'a mut [T]>,
}

unsafe impl<T: Send> Send for FieldViewMut<'_, T> {}
unsafe impl<T: Sync> Sync for FieldViewMut<'_, T> {}

impl<T> Clone for FieldViewMut<'_, T> {
    fn clone(&self) -> Self {
        FieldViewMut {
            ptr: self.ptr,
            sizes: self.sizes.clone(),
            strides: self.strides.clone(),
            _marker: PhantomData,
        }
    }
}

impl<'a, T> FieldViewMut<'a, T> {
    /// Create a mutable view with the origin at `data[offset]`.
    pub fn new(
        data: &'a mut [T],
        sizes: DimMap<usize>,
        strides: DimMap<isize>,
        offset: isize,
    ) -> Result<Self> {
        validate_envelope(data.len(), &sizes, &strides, offset)?;
        Ok(FieldViewMut {
            ptr: data.as_mut_ptr().wrapping_offset(offset),
            sizes,
            strides,
            _marker: PhantomData,
        })
    }

    pub fn sizes(&self) -> &DimMap<usize> {
        &self.sizes
    }
}

impl<T> Sid for FieldViewMut<'_, T> {
    type Ptr = FieldPtrMut<T>;

    fn origin(&self) -> FieldPtrMut<T> {
        FieldPtrMut { ptr: self.ptr }
    }

    fn strides(&self) -> DimMap<isize> {
        self.strides.clone()
    }

    fn lower_bounds(&self) -> DimMap<isize> {
        self.sizes.map_values(|_, _| 0)
    }

    fn upper_bounds(&self) -> DimMap<isize> {
        self.sizes.map_values(|_, &s| s as isize)
    }
}

// ============================================================================
// FieldArray
// ============================================================================

/// Owned dense field storage, contiguous with last dimension fastest.
pub struct FieldArray<T> {
    data: Vec<T>,
    sizes: DimMap<usize>,
    strides: DimMap<isize>,
}

impl<T: Copy> FieldArray<T> {
    /// Build a field by evaluating `f` at every multi-index.
    ///
    /// `f` receives indices in the key order of `sizes`.
    pub fn from_fn(sizes: DimMap<usize>, mut f: impl FnMut(&[usize]) -> T) -> Self {
        let strides = contiguous_strides(&sizes);
        let total: usize = sizes.values().product();
        let dims: Vec<usize> = sizes.values().copied().collect();
        let mut idx = vec![0usize; dims.len()];
        let mut data = Vec::with_capacity(total);
        for _ in 0..total {
            data.push(f(&idx));
            for axis in (0..dims.len()).rev() {
                idx[axis] += 1;
                if idx[axis] < dims[axis] {
                    break;
                }
                idx[axis] = 0;
            }
        }
        FieldArray {
            data,
            sizes,
            strides,
        }
    }

    /// A field filled with zeros.
    pub fn zeroed(sizes: DimMap<usize>) -> Self
    where
        T: Zero,
    {
        Self::from_fn(sizes, |_| T::zero())
    }

    pub fn sizes(&self) -> &DimMap<usize> {
        &self.sizes
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn view(&self) -> FieldView<'_, T> {
        FieldView::new(&self.data, self.sizes.clone(), self.strides.clone(), 0)
            .expect("own layout is always valid")
    }

    pub fn view_mut(&mut self) -> FieldViewMut<'_, T> {
        FieldViewMut::new(&mut self.data, self.sizes.clone(), self.strides.clone(), 0)
            .expect("own layout is always valid")
    }

    fn flat_index(&self, idx: &[usize]) -> usize {
        assert_eq!(idx.len(), self.sizes.len(), "index rank mismatch");
        let mut flat = 0isize;
        for ((dim, &size), &i) in self.sizes.iter().zip(idx.iter()) {
            assert!(i < size, "index {i} out of range for dimension {dim}");
            flat += *self.strides.get(dim).expect("dense layout") * i as isize;
        }
        flat as usize
    }

    /// Element at `idx` (key order of `sizes`).
    pub fn get(&self, idx: &[usize]) -> T {
        self.data[self.flat_index(idx)]
    }

    pub fn set(&mut self, idx: &[usize], value: T) {
        let flat = self.flat_index(idx);
        self.data[flat] = value;
    }
}
