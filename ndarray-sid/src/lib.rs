//! Foreign-array adapters: present `ndarray` views (and raw
//! pointer+extents descriptors, the shape a C binding marshals) as
//! stencil iteration domains.
//!
//! Unlike the contract violations inside the core — which panic — the
//! failures here depend on runtime-supplied data (an array of
//! unexpected rank, a stride table escaping its allocation), so they
//! surface as recoverable [`AdapterError`]s the caller can catch and
//! report.

use ndarray::{ArrayViewD, ArrayViewMutD};
use stencil_sid::{FieldError, FieldView, FieldViewMut};
use stencil_traits::{Dim, DimMap};

/// Errors from adapting foreign arrays.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The array's rank does not match the dimension names supplied.
    #[error("unsupported rank {rank}: expected {expected} dimensions")]
    RankMismatch { rank: usize, expected: usize },

    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Result type for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Min and max element offset reachable from index `[0, 0, ...]`.
///
/// Negative strides (reversed views) make the minimum negative relative
/// to the view's base pointer.
fn offset_range(shape: &[usize], strides: &[isize]) -> (isize, isize) {
    let mut min_off = 0isize;
    let mut max_off = 0isize;
    for (&d, &s) in shape.iter().zip(strides.iter()) {
        if d == 0 {
            continue;
        }
        let end = s * (d as isize - 1);
        if end < 0 {
            min_off += end;
        } else {
            max_off += end;
        }
    }
    (min_off, max_off)
}

fn check_rank(rank: usize, dims: &[Dim]) -> Result<()> {
    if rank != dims.len() {
        return Err(AdapterError::RankMismatch {
            rank,
            expected: dims.len(),
        });
    }
    Ok(())
}

fn layout_maps(shape: &[usize], strides: &[isize], dims: &[Dim]) -> (DimMap<usize>, DimMap<isize>) {
    let sizes = dims.iter().copied().zip(shape.iter().copied()).collect();
    let stride_map = dims.iter().copied().zip(strides.iter().copied()).collect();
    (sizes, stride_map)
}

/// Wrap a dynamic ndarray view as a read-only field, axis `n` named
/// `dims[n]` (zero-copy).
pub fn view_to_sid<'a, T>(view: &ArrayViewD<'a, T>, dims: &[Dim]) -> Result<FieldView<'a, T>> {
    check_rank(view.ndim(), dims)?;
    let shape = view.shape().to_vec();
    let strides = view.strides().to_vec();
    let (min_off, max_off) = offset_range(&shape, &strides);
    let base_ptr = unsafe { view.as_ptr().offset(min_off) };
    let len = (max_off - min_off + 1) as usize;
    let data = unsafe { std::slice::from_raw_parts(base_ptr, len) };
    let (sizes, stride_map) = layout_maps(&shape, &strides, dims);
    Ok(FieldView::new(data, sizes, stride_map, -min_off)?)
}

/// Wrap a mutable dynamic ndarray view as a writable field (zero-copy).
pub fn view_mut_to_sid<'a, T>(
    view: &'a mut ArrayViewMutD<'a, T>,
    dims: &[Dim],
) -> Result<FieldViewMut<'a, T>> {
    check_rank(view.ndim(), dims)?;
    let shape = view.shape().to_vec();
    let strides = view.strides().to_vec();
    let (min_off, max_off) = offset_range(&shape, &strides);
    let base_ptr = unsafe { view.as_mut_ptr().offset(min_off) };
    let len = (max_off - min_off + 1) as usize;
    let data = unsafe { std::slice::from_raw_parts_mut(base_ptr, len) };
    let (sizes, stride_map) = layout_maps(&shape, &strides, dims);
    Ok(FieldViewMut::new(data, sizes, stride_map, -min_off)?)
}

/// Build a dense row-major field from a raw extents descriptor:
/// unit strides computed from the dimension sizes, last axis fastest.
///
/// This is the form a foreign-language shim hands over: a buffer plus
/// per-axis extents, no stride table.
pub fn from_descriptor<'a, T>(
    data: &'a [T],
    dims: &[Dim],
    extents: &[usize],
) -> Result<FieldView<'a, T>> {
    check_rank(extents.len(), dims)?;
    let mut strides = vec![1isize; extents.len()];
    for axis in (0..extents.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * extents[axis + 1] as isize;
    }
    let (sizes, stride_map) = layout_maps(extents, &strides, dims);
    Ok(FieldView::new(data, sizes, stride_map, 0)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{s, ArrayD};
    use stencil_sid::FieldArray;
    use stencil_traits::{dim_map, Cursor, CursorRead, CursorWrite, Sid, I, J, K};

    #[test]
    fn row_major_2d_view_passes_through() {
        let arr = ArrayD::from_shape_vec(vec![2, 3], (0..6).map(|n| n as f64).collect()).unwrap();
        let view = arr.view();
        let sid = view_to_sid(&view, &[I, J]).unwrap();

        assert_eq!(sid.sizes().get(I), Some(&2));
        assert_eq!(sid.sizes().get(J), Some(&3));
        let strides = sid.strides();
        assert_eq!(strides.get(I), Some(&3));
        assert_eq!(strides.get(J), Some(&1));

        let mut ptr = sid.origin();
        ptr.shift(strides.get(I).unwrap(), 1);
        ptr.shift(strides.get(J).unwrap(), 2);
        assert_eq!(unsafe { ptr.read() }, 5.0);
    }

    #[test]
    fn rank_mismatch_is_a_recoverable_error() {
        let arr = ArrayD::from_shape_vec(vec![2, 3, 4], vec![0.0f64; 24]).unwrap();
        let view = arr.view();
        let err = view_to_sid(&view, &[I, J]).unwrap_err();
        assert!(matches!(
            err,
            AdapterError::RankMismatch {
                rank: 3,
                expected: 2
            }
        ));
        // The message is usable for reporting at the binding boundary.
        assert!(err.to_string().contains("unsupported rank 3"));
    }

    #[test]
    fn negative_stride_views_keep_their_orientation() {
        let arr = ArrayD::from_shape_vec(vec![3], vec![10.0f64, 20.0, 30.0]).unwrap();
        let reversed = arr.slice(s![..;-1]).into_dyn();
        let sid = view_to_sid(&reversed, &[K]).unwrap();
        let strides = sid.strides();
        assert_eq!(strides.get(K), Some(&-1));

        let mut ptr = sid.origin();
        assert_eq!(unsafe { ptr.read() }, 30.0);
        ptr.shift(strides.get(K).unwrap(), 2);
        assert_eq!(unsafe { ptr.read() }, 10.0);
    }

    #[test]
    fn mutable_views_write_back_into_the_array() {
        let mut arr = ArrayD::from_shape_vec(vec![2, 2], vec![0.0f64; 4]).unwrap();
        {
            let mut view = arr.view_mut();
            let sid = view_mut_to_sid(&mut view, &[I, J]).unwrap();
            let strides = sid.strides();
            let mut ptr = sid.origin();
            ptr.shift(strides.get(I).unwrap(), 1);
            unsafe { ptr.write(7.0) };
        }
        assert_eq!(arr[[1, 0]], 7.0);
    }

    #[test]
    fn descriptor_adapter_computes_unit_strides() {
        let data: Vec<f64> = (0..24).map(|n| n as f64).collect();
        let sid = from_descriptor(&data, &[I, J, K], &[2, 3, 4]).unwrap();
        let strides = sid.strides();
        assert_eq!(strides.get(I), Some(&12));
        assert_eq!(strides.get(J), Some(&4));
        assert_eq!(strides.get(K), Some(&1));

        let err = from_descriptor(&data, &[I, J], &[2, 3, 4]).unwrap_err();
        assert!(matches!(err, AdapterError::RankMismatch { .. }));
    }

    #[test]
    fn adapted_views_interoperate_with_native_fields() {
        // Copy an ndarray input into a native field through cursors.
        let arr =
            ArrayD::from_shape_vec(vec![2, 3], (0..6).map(|n| n as f64 * 2.0).collect()).unwrap();
        let view = arr.view();
        let src = view_to_sid(&view, &[I, J]).unwrap();
        let mut dst = FieldArray::zeroed(dim_map! { I => 2, J => 3 });

        {
            let dview = dst.view_mut();
            let s_strides = src.strides();
            let d_strides = dview.strides();
            for i in 0..2isize {
                for j in 0..3isize {
                    let mut sp = src.origin();
                    sp.shift(s_strides.get(I).unwrap(), i);
                    sp.shift(s_strides.get(J).unwrap(), j);
                    let mut dp = dview.origin();
                    dp.shift(d_strides.get(I).unwrap(), i);
                    dp.shift(d_strides.get(J).unwrap(), j);
                    unsafe { dp.write(sp.read()) };
                }
            }
        }
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(dst.get(&[i, j]), arr[[i, j]]);
            }
        }
    }
}
