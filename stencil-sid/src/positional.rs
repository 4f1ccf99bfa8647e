//! A synthetic domain whose elements are their own coordinates.
//!
//! `Positional` spans a single dimension; shifting its cursor along that
//! dimension moves the coordinate, and dereferencing yields the current
//! coordinate value. Bundle one per axis into a composite to give a
//! stencil access to its (i, j, k) position without any backing storage.

use stencil_traits::{Cursor, CursorRead, Dim, DimMap, Sid};

/// Marker stride of a positional domain: the shift offset is the whole
/// story, there is no memory to scale it by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PosStride;

/// Cursor carrying a coordinate value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionPtr {
    val: isize,
}

impl Cursor for PositionPtr {
    type Stride = PosStride;

    fn shift(&mut self, _stride: &PosStride, offset: isize) {
        self.val += offset;
    }
}

impl CursorRead for PositionPtr {
    type Item = isize;

    unsafe fn read(&self) -> isize {
        self.val
    }
}

/// Iteration domain over one dimension whose element at coordinate `c`
/// is `c` itself.
#[derive(Clone, Copy, Debug)]
pub struct Positional {
    dim: Dim,
    start: isize,
}

impl Positional {
    /// Positional domain along `dim`, starting at coordinate zero.
    pub fn new(dim: Dim) -> Self {
        Positional { dim, start: 0 }
    }

    /// Positional domain along `dim`, starting at `start`.
    pub fn starting_at(dim: Dim, start: isize) -> Self {
        Positional { dim, start }
    }
}

impl Sid for Positional {
    type Ptr = PositionPtr;

    fn origin(&self) -> PositionPtr {
        PositionPtr { val: self.start }
    }

    fn strides(&self) -> DimMap<PosStride> {
        [(self.dim, PosStride)].into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_traits::{I, K};

    #[test]
    fn coordinate_tracks_shifts() {
        let pos = Positional::new(K);
        let strides = pos.strides();
        let mut ptr = pos.origin();
        assert_eq!(unsafe { ptr.read() }, 0);
        ptr.shift(strides.get(K).unwrap(), 5);
        ptr.shift(strides.get(K).unwrap(), -2);
        assert_eq!(unsafe { ptr.read() }, 3);
    }

    #[test]
    fn start_offsets_the_origin() {
        let pos = Positional::starting_at(I, -1);
        assert_eq!(unsafe { pos.origin().read() }, -1);
    }

    #[test]
    fn spans_only_its_own_dimension() {
        let pos = Positional::new(I);
        let strides = pos.strides();
        assert_eq!(strides.len(), 1);
        assert!(strides.contains(I));
    }
}
