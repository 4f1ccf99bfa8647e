//! Nested loop construction over a cursor.

use stencil_traits::{Cursor, Dim, DimMap};

/// Run `body` once per point of the hyper-rectangle described by
/// `sizes`, moving `ptr` through it.
///
/// The loop nest follows the key order of `sizes`: the first dimension
/// is the outermost loop. Each level shifts the cursor one stride step
/// per iteration and shifts it back afterwards, so on return `ptr` sits
/// where it started. A dimension without a stride entry still
/// contributes its trip count, with the cursor left untouched.
pub fn nested_loops<P: Cursor>(
    sizes: &DimMap<usize>,
    strides: &DimMap<P::Stride>,
    ptr: &mut P,
    body: &mut impl FnMut(&P),
) {
    let dims: Vec<(Dim, usize)> = sizes.iter().map(|(d, &s)| (d, s)).collect();
    loop_level(&dims, strides, ptr, body);
}

fn loop_level<P: Cursor>(
    dims: &[(Dim, usize)],
    strides: &DimMap<P::Stride>,
    ptr: &mut P,
    body: &mut impl FnMut(&P),
) {
    let Some((&(dim, size), rest)) = dims.split_first() else {
        body(ptr);
        return;
    };
    let stride = strides.get(dim);
    for _ in 0..size {
        loop_level(rest, strides, ptr, body);
        if let Some(stride) = stride {
            ptr.shift(stride, 1);
        }
    }
    // Restore the cursor for the enclosing level.
    if let Some(stride) = stride {
        ptr.shift(stride, -(size as isize));
    }
}
