//! The point-loop apply engines.

use stencil_sid::Composite;
use stencil_traits::{multi_shift, CursorRead, CursorWrite, DimMap, Sid, Tag};

use crate::iter::StridedIter;
use crate::loops::nested_loops;

const OUT_TAG: Tag = Tag::new("out");
const IN_TAGS: [Tag; 4] = [
    Tag::new("in0"),
    Tag::new("in1"),
    Tag::new("in2"),
    Tag::new("in3"),
];

/// Panic if the requested envelope escapes the bounds the bundled
/// domains declared. A mismatch here is a wiring error in the caller,
/// detectable before touching any data.
fn check_envelope(sizes: &DimMap<usize>, offsets: &DimMap<isize>, lower: &DimMap<isize>, upper: &DimMap<isize>) {
    for (dim, &size) in sizes.iter() {
        let offset = offsets.get(dim).copied().unwrap_or(0);
        if let Some(&up) = upper.get(dim) {
            let low = lower.get(dim).copied().unwrap_or(0);
            assert!(
                offset >= low && offset + size as isize <= up,
                "iteration envelope [{offset}, {}) escapes bounds [{low}, {up}) along {dim}",
                offset + size as isize
            );
        }
    }
}

macro_rules! define_apply {
    ($(#[$doc:meta])* $name:ident; $($In:ident, $in_:ident, $in_strides:ident, $idx:tt);+ | $out_idx:tt) => {
        $(#[$doc])*
        pub fn $name<Out, $($In,)+ F>(
            sizes: &DimMap<usize>,
            offsets: &DimMap<isize>,
            out: &Out,
            $($in_: &$In,)+
            mut stencil: F,
        ) where
            Out: Sid,
            Out::Ptr: CursorWrite,
            $(
                $In: Sid,
                $In::Ptr: CursorRead,
            )+
            F: FnMut($(&StridedIter<'_, $In::Ptr>),+) -> <Out::Ptr as CursorRead>::Item,
        {
            $(let $in_strides = $in_.strides();)+
            let composite = Composite::<($(&$In,)+ &Out)>::new(
                [$(IN_TAGS[$idx],)+ OUT_TAG],
                ($($in_,)+ out),
            );
            check_envelope(
                sizes,
                offsets,
                &composite.lower_bounds(),
                &composite.upper_bounds(),
            );
            let strides = composite.strides();
            let mut ptr = composite.origin();
            multi_shift(&mut ptr, &strides, offsets);
            nested_loops(sizes, &strides, &mut ptr, &mut |ptr| {
                let value = stencil($(&StridedIter::new(ptr.$idx.clone(), &$in_strides)),+);
                // In-envelope by construction: the nest stays inside the
                // bounds checked above.
                unsafe { ptr.$out_idx.write(value) };
            });
        }
    };
}

define_apply!(
    /// Apply a one-input stencil over the hyper-rectangle `sizes`,
    /// starting `offsets` away from the domains' origins.
    ///
    /// Iteration is deterministic: dimensions nest in `sizes` order,
    /// first dimension outermost, every point visited exactly once.
    apply_stencil1;
    In0, in0, s0, 0 | 1
);

define_apply!(
    /// Two-input variant of [`apply_stencil1`].
    apply_stencil2;
    In0, in0, s0, 0;
    In1, in1, s1, 1 | 2
);

define_apply!(
    /// Three-input variant of [`apply_stencil1`].
    apply_stencil3;
    In0, in0, s0, 0;
    In1, in1, s1, 1;
    In2, in2, s2, 2 | 3
);

define_apply!(
    /// Four-input variant of [`apply_stencil1`].
    apply_stencil4;
    In0, in0, s0, 0;
    In1, in1, s1, 1;
    In2, in2, s2, 2;
    In3, in3, s3, 3 | 4
);
