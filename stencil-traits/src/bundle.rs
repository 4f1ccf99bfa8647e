//! Cursor bundles: tuples and arrays of cursors move as one.
//!
//! A composite domain's cursor is the tuple (or array) of its component
//! cursors, and its stride for a dimension is the bundle of per-component
//! strides for that dimension. A component that does not span the
//! dimension carries `None` in the bundle — distinct from a real zero
//! stride — and is left untouched by the shift.

use crate::sid::{Cursor, CursorRead, CursorWrite};

macro_rules! impl_cursor_tuple {
    ($($idx:tt $t:ident),+) => {
        impl<$($t: Cursor),+> Cursor for ($($t,)+) {
            type Stride = ($(Option<$t::Stride>,)+);

            fn shift(&mut self, stride: &Self::Stride, offset: isize) {
                $(
                    if let Some(s) = &stride.$idx {
                        self.$idx.shift(s, offset);
                    }
                )+
            }
        }
    };
}

impl_cursor_tuple!(0 A);
impl_cursor_tuple!(0 A, 1 B);
impl_cursor_tuple!(0 A, 1 B, 2 C);
impl_cursor_tuple!(0 A, 1 B, 2 C, 3 D);
impl_cursor_tuple!(0 A, 1 B, 2 C, 3 D, 4 E);
impl_cursor_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
impl_cursor_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G);
impl_cursor_tuple!(0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H);

impl<P: Cursor, const N: usize> Cursor for [P; N] {
    type Stride = [Option<P::Stride>; N];

    fn shift(&mut self, stride: &Self::Stride, offset: isize) {
        for (ptr, s) in self.iter_mut().zip(stride.iter()) {
            if let Some(s) = s {
                ptr.shift(s, offset);
            }
        }
    }
}

/// Reading a homogeneous cursor bundle reads every component.
impl<P: CursorRead, const N: usize> CursorRead for [P; N] {
    type Item = [P::Item; N];

    unsafe fn read(&self) -> Self::Item {
        std::array::from_fn(|k| unsafe { self[k].read() })
    }
}

impl<P: CursorWrite, const N: usize> CursorWrite for [P; N] {
    unsafe fn write(&self, value: Self::Item) {
        for (ptr, v) in self.iter().zip(value) {
            ptr.write(v);
        }
    }
}
