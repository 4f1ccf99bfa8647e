//! Dimension and component tags, and the ordered dimension map.

use std::fmt;

use indexmap::IndexMap;

/// A logical dimension tag.
///
/// Dimensions are identified by name, not by position: a domain exposes a
/// stride per `Dim` it knows about, and shifting along a `Dim` a domain
/// does not know is a no-op for it. The three cartesian dimensions are
/// predefined as [`I`], [`J`], [`K`]; additional axes (a components axis,
/// a time axis) are created with [`Dim::new`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Dim(&'static str);

/// First horizontal dimension.
pub const I: Dim = Dim("i");
/// Second horizontal dimension.
pub const J: Dim = Dim("j");
/// Vertical dimension.
pub const K: Dim = Dim("k");

impl Dim {
    /// Create a dimension tag with the given name.
    pub const fn new(name: &'static str) -> Self {
        Dim(name)
    }

    /// The tag's name.
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A component tag naming one member of a composite domain.
///
/// Distinct from [`Dim`]: tags name *fields* bundled together, dims name
/// *axes* iterated over.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Tag(&'static str);

impl Tag {
    pub const fn new(name: &'static str) -> Self {
        Tag(name)
    }

    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// An insertion-ordered map from [`Dim`] to a value.
///
/// Iteration order is the order keys were first inserted. This order is
/// load-bearing: the backend nests its loops in the order dimensions
/// appear in the sizes map, so two `DimMap`s with the same keys in a
/// different order describe different loop nests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DimMap<V> {
    inner: IndexMap<Dim, V>,
}

impl<V> DimMap<V> {
    pub fn new() -> Self {
        DimMap {
            inner: IndexMap::new(),
        }
    }

    /// Insert a value for `dim`, returning the previous value if any.
    pub fn insert(&mut self, dim: Dim, value: V) -> Option<V> {
        self.inner.insert(dim, value)
    }

    pub fn get(&self, dim: Dim) -> Option<&V> {
        self.inner.get(&dim)
    }

    pub fn get_mut(&mut self, dim: Dim) -> Option<&mut V> {
        self.inner.get_mut(&dim)
    }

    pub fn contains(&self, dim: Dim) -> bool {
        self.inner.contains_key(&dim)
    }

    /// Remove `dim`, preserving the order of the remaining entries.
    pub fn remove(&mut self, dim: Dim) -> Option<V> {
        self.inner.shift_remove(&dim)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dim, &V)> + '_ {
        self.inner.iter().map(|(d, v)| (*d, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = Dim> + '_ {
        self.inner.keys().copied()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.inner.values()
    }

    /// Map every value through `f`, preserving key order.
    pub fn map_values<W>(&self, mut f: impl FnMut(Dim, &V) -> W) -> DimMap<W> {
        let mut out = DimMap::new();
        for (d, v) in self.iter() {
            out.insert(d, f(d, v));
        }
        out
    }
}

impl<V> Default for DimMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(Dim, V)> for DimMap<V> {
    fn from_iter<T: IntoIterator<Item = (Dim, V)>>(iter: T) -> Self {
        DimMap {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<V> IntoIterator for DimMap<V> {
    type Item = (Dim, V);
    type IntoIter = indexmap::map::IntoIter<Dim, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_is_preserved() {
        let mut m = DimMap::new();
        m.insert(K, 3usize);
        m.insert(I, 1);
        m.insert(J, 2);
        let keys: Vec<_> = m.keys().collect();
        assert_eq!(keys, vec![K, I, J]);
    }

    #[test]
    fn remove_keeps_order() {
        let mut m: DimMap<i32> = [(I, 1), (J, 2), (K, 3)].into_iter().collect();
        m.remove(J);
        let keys: Vec<_> = m.keys().collect();
        assert_eq!(keys, vec![I, K]);
        assert!(!m.contains(J));
    }

    #[test]
    fn custom_dims_are_distinct() {
        let t = Dim::new("t");
        assert_ne!(t, K);
        assert_eq!(t, Dim::new("t"));
        assert_eq!(t.name(), "t");
    }

    #[test]
    fn map_values_preserves_keys() {
        let m: DimMap<usize> = [(I, 3), (J, 4)].into_iter().collect();
        let doubled = m.map_values(|_, v| v * 2);
        assert_eq!(doubled.get(I), Some(&6));
        assert_eq!(doubled.get(J), Some(&8));
    }
}
