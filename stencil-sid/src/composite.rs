//! Bundling several iteration domains into one.
//!
//! A composite presents a tuple of tagged domains as a single domain:
//! its cursor is the tuple of component cursors, its dimension set is
//! the union of the components' dimension sets, and its stride for a
//! dimension is the bundle of per-component strides. A component that
//! does not span a dimension contributes `None` to the bundle — kept
//! distinct from a real zero stride so that shifting the composite along
//! a dimension moves exactly the components that declare it.

use stencil_traits::{Dim, DimMap, Sid, StrideOf, Tag};

/// A tagged bundle of iteration domains.
///
/// Construct with [`Composite::new`] (heterogeneous tuples, arity up to
/// eight) or [`Composite::from_array`] (homogeneous components).
#[derive(Clone)]
pub struct Composite<P> {
    tags: Vec<Tag>,
    parts: P,
}

impl<P> Composite<P> {
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Position of `tag` among the components.
    pub fn index_of(&self, tag: Tag) -> Option<usize> {
        self.tags.iter().position(|t| *t == tag)
    }

    pub fn parts(&self) -> &P {
        &self.parts
    }

    fn check_tags(tags: &[Tag]) {
        for (n, tag) in tags.iter().enumerate() {
            assert!(
                !tags[..n].contains(tag),
                "duplicate component tag `{tag}` in composite"
            );
        }
    }
}

/// Per-dimension bound aggregation: tightest bound wins.
fn merge_bounds(acc: &mut DimMap<isize>, part: DimMap<isize>, tighter_is_greater: bool) {
    for (dim, value) in part {
        match acc.get_mut(dim) {
            Some(existing) => {
                if (value > *existing) == tighter_is_greater {
                    *existing = value;
                }
            }
            None => {
                acc.insert(dim, value);
            }
        }
    }
}

macro_rules! impl_composite {
    ($n:literal; $($idx:tt $t:ident),+) => {
        impl<$($t: Sid),+> Composite<($($t,)+)> {
            /// Bundle the given components. Panics on duplicate tags.
            pub fn new(tags: [Tag; $n], parts: ($($t,)+)) -> Self {
                Self::check_tags(&tags);
                Composite { tags: tags.to_vec(), parts }
            }
        }

        impl<$($t: Sid),+> Sid for Composite<($($t,)+)> {
            type Ptr = ($($t::Ptr,)+);

            fn origin(&self) -> Self::Ptr {
                ($(self.parts.$idx.origin(),)+)
            }

            fn strides(&self) -> DimMap<StrideOf<Self>> {
                let part_strides = ($(self.parts.$idx.strides(),)+);
                let mut dims: Vec<Dim> = Vec::new();
                $(
                    for d in part_strides.$idx.keys() {
                        if !dims.contains(&d) {
                            dims.push(d);
                        }
                    }
                )+
                let mut out = DimMap::new();
                for d in dims {
                    out.insert(d, ($(part_strides.$idx.get(d).cloned(),)+));
                }
                out
            }

            fn lower_bounds(&self) -> DimMap<isize> {
                let mut acc = DimMap::new();
                $( merge_bounds(&mut acc, self.parts.$idx.lower_bounds(), true); )+
                acc
            }

            fn upper_bounds(&self) -> DimMap<isize> {
                let mut acc = DimMap::new();
                $( merge_bounds(&mut acc, self.parts.$idx.upper_bounds(), false); )+
                acc
            }
        }
    };
}

impl_composite!(1; 0 A);
impl_composite!(2; 0 A, 1 B);
impl_composite!(3; 0 A, 1 B, 2 C);
impl_composite!(4; 0 A, 1 B, 2 C, 3 D);
impl_composite!(5; 0 A, 1 B, 2 C, 3 D, 4 E);
impl_composite!(6; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F);
impl_composite!(7; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G);
impl_composite!(8; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F, 6 G, 7 H);

/// Component tags synthesized for anonymous homogeneous bundles.
const INDEX_TAGS: [Tag; 16] = [
    Tag::new("0"),
    Tag::new("1"),
    Tag::new("2"),
    Tag::new("3"),
    Tag::new("4"),
    Tag::new("5"),
    Tag::new("6"),
    Tag::new("7"),
    Tag::new("8"),
    Tag::new("9"),
    Tag::new("10"),
    Tag::new("11"),
    Tag::new("12"),
    Tag::new("13"),
    Tag::new("14"),
    Tag::new("15"),
];

impl<S: Sid, const N: usize> Composite<[S; N]> {
    /// Bundle `N` homogeneous components under synthesized index tags.
    pub fn from_array(parts: [S; N]) -> Self {
        assert!(
            N <= INDEX_TAGS.len(),
            "homogeneous composites support up to {} components",
            INDEX_TAGS.len()
        );
        Composite {
            tags: INDEX_TAGS[..N].to_vec(),
            parts,
        }
    }
}

impl<S: Sid, const N: usize> Sid for Composite<[S; N]> {
    type Ptr = [S::Ptr; N];

    fn origin(&self) -> Self::Ptr {
        std::array::from_fn(|k| self.parts[k].origin())
    }

    fn strides(&self) -> DimMap<[Option<StrideOf<S>>; N]> {
        let part_strides: Vec<DimMap<StrideOf<S>>> =
            self.parts.iter().map(|p| p.strides()).collect();
        let mut dims: Vec<Dim> = Vec::new();
        for map in &part_strides {
            for d in map.keys() {
                if !dims.contains(&d) {
                    dims.push(d);
                }
            }
        }
        let mut out = DimMap::new();
        for d in dims {
            out.insert(d, std::array::from_fn(|k| part_strides[k].get(d).cloned()));
        }
        out
    }

    fn lower_bounds(&self) -> DimMap<isize> {
        let mut acc = DimMap::new();
        for p in &self.parts {
            merge_bounds(&mut acc, p.lower_bounds(), true);
        }
        acc
    }

    fn upper_bounds(&self) -> DimMap<isize> {
        let mut acc = DimMap::new();
        for p in &self.parts {
            merge_bounds(&mut acc, p.upper_bounds(), false);
        }
        acc
    }
}
