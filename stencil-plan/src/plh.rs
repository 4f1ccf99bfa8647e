//! Placeholders and their merge algebra.

use std::any::TypeId;
use std::fmt;

use indexmap::IndexMap;
use stencil_grid::Extent;

/// A field placeholder: names one logical argument of a stage.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Plh(&'static str);

impl Plh {
    pub const fn new(name: &'static str) -> Self {
        Plh(name)
    }

    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Plh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Runtime identity of a placeholder's element type.
#[derive(Clone, Copy, Debug)]
pub struct DataType {
    id: TypeId,
    name: &'static str,
}

impl DataType {
    pub fn of<T: 'static>() -> Self {
        DataType {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for DataType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DataType {}

/// Access intent of a placeholder within a stage.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Intent {
    /// Read-only input.
    In,
    /// Written (and possibly read) output.
    InOut,
}

impl Intent {
    fn merge(self, other: Intent) -> Intent {
        if self == Intent::In && other == Intent::In {
            Intent::In
        } else {
            Intent::InOut
        }
    }
}

/// Requested software-cache placement for a placeholder.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CacheType {
    IJ,
    K,
}

/// Fill/flush behaviour of a cached placeholder.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CacheIoPolicy {
    Fill,
    Flush,
    FillAndFlush,
    Local,
}

/// Dedup merge for cache requests: agreement survives, disagreement
/// dissolves the request.
fn merge_cache<T: PartialEq>(a: Option<T>, b: Option<T>) -> Option<T> {
    match (a, b) {
        (Some(x), Some(y)) if x == y => Some(x),
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        _ => None,
    }
}

/// Everything a plan needs to know about one placeholder of one cell.
#[derive(Clone, PartialEq, Debug)]
pub struct PlhInfo {
    pub plh: Plh,
    pub is_tmp: bool,
    pub data: DataType,
    pub intent: Intent,
    pub extent: Extent,
    pub cache: Option<CacheType>,
    pub cache_io: Option<CacheIoPolicy>,
}

impl PlhInfo {
    /// Plain field argument with no cache request.
    pub fn field<T: 'static>(plh: Plh, intent: Intent, extent: Extent) -> Self {
        PlhInfo {
            plh,
            is_tmp: false,
            data: DataType::of::<T>(),
            intent,
            extent,
            cache: None,
            cache_io: None,
        }
    }

    /// Temporary argument: owned by the computation, not user-visible.
    pub fn tmp<T: 'static>(plh: Plh, intent: Intent, extent: Extent) -> Self {
        PlhInfo {
            is_tmp: true,
            ..Self::field::<T>(plh, intent, extent)
        }
    }

    /// Reconcile two infos for the same placeholder.
    ///
    /// Extents widen to the enclosing footprint and intents combine;
    /// conflicting data types are a programming error and panic, since
    /// one buffer cannot satisfy both stages.
    pub fn merge(&self, other: &PlhInfo) -> PlhInfo {
        assert_eq!(self.plh, other.plh, "merging infos of different placeholders");
        assert!(
            self.data == other.data,
            "conflicting data types for placeholder {}: {} vs {}",
            self.plh,
            self.data.name(),
            other.data.name()
        );
        assert_eq!(
            self.is_tmp, other.is_tmp,
            "placeholder {} is temporary in one stage and not in another",
            self.plh
        );
        PlhInfo {
            plh: self.plh,
            is_tmp: self.is_tmp,
            data: self.data,
            intent: self.intent.merge(other.intent),
            extent: self.extent.enclosing(other.extent),
            cache: merge_cache(self.cache, other.cache),
            cache_io: merge_cache(self.cache_io, other.cache_io),
        }
    }
}

/// Insertion-ordered placeholder map of one cell (or one whole plan).
#[derive(Clone, PartialEq, Debug, Default)]
pub struct PlhMap {
    inner: IndexMap<Plh, PlhInfo>,
}

impl PlhMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an info, merging with an existing entry for the same
    /// placeholder.
    pub fn insert(&mut self, info: PlhInfo) {
        match self.inner.get_mut(&info.plh) {
            Some(existing) => *existing = existing.merge(&info),
            None => {
                self.inner.insert(info.plh, info);
            }
        }
    }

    /// Key-union merge; shared placeholders reconcile via
    /// [`PlhInfo::merge`].
    pub fn merge(&self, other: &PlhMap) -> PlhMap {
        let mut out = self.clone();
        for info in other.inner.values() {
            out.insert(info.clone());
        }
        out
    }

    pub fn get(&self, plh: Plh) -> Option<&PlhInfo> {
        self.inner.get(&plh)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlhInfo> + '_ {
        self.inner.values()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The temporaries of this map, in order.
    pub fn tmps(&self) -> impl Iterator<Item = &PlhInfo> + '_ {
        self.inner.values().filter(|info| info.is_tmp)
    }
}

impl FromIterator<PlhInfo> for PlhMap {
    fn from_iter<T: IntoIterator<Item = PlhInfo>>(iter: T) -> Self {
        let mut map = PlhMap::new();
        for info in iter {
            map.insert(info);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IN: Plh = Plh::new("in");
    const OUT: Plh = Plh::new("out");

    #[test]
    fn merge_widens_extent_and_intent() {
        let a = PlhInfo::field::<f64>(IN, Intent::In, Extent::horizontal(-1, 0, 0, 0));
        let b = PlhInfo::field::<f64>(IN, Intent::InOut, Extent::horizontal(0, 2, -1, 0));
        let merged = a.merge(&b);
        assert_eq!(merged.intent, Intent::InOut);
        assert_eq!(merged.extent, Extent::horizontal(-1, 2, -1, 0));
    }

    #[test]
    #[should_panic(expected = "conflicting data types")]
    fn conflicting_data_types_panic() {
        let a = PlhInfo::field::<f64>(IN, Intent::In, Extent::ZERO);
        let b = PlhInfo::field::<f32>(IN, Intent::In, Extent::ZERO);
        let _ = a.merge(&b);
    }

    #[test]
    fn disagreeing_cache_requests_dissolve() {
        let mut a = PlhInfo::field::<f64>(IN, Intent::In, Extent::ZERO);
        a.cache = Some(CacheType::IJ);
        let mut b = a.clone();
        b.cache = Some(CacheType::K);
        assert_eq!(a.merge(&b).cache, None);

        let mut c = a.clone();
        c.cache = Some(CacheType::IJ);
        assert_eq!(a.merge(&c).cache, Some(CacheType::IJ));
    }

    #[test]
    fn map_merge_is_a_key_union_in_order() {
        let m1: PlhMap = [
            PlhInfo::field::<f64>(OUT, Intent::InOut, Extent::ZERO),
            PlhInfo::field::<f64>(IN, Intent::In, Extent::ZERO),
        ]
        .into_iter()
        .collect();
        let m2: PlhMap = [
            PlhInfo::field::<f64>(IN, Intent::In, Extent::horizontal(-1, 1, 0, 0)),
            PlhInfo::tmp::<f64>(Plh::new("lap"), Intent::InOut, Extent::ZERO),
        ]
        .into_iter()
        .collect();

        let merged = m1.merge(&m2);
        let names: Vec<_> = merged.iter().map(|i| i.plh.name()).collect();
        assert_eq!(names, vec!["out", "in", "lap"]);
        assert_eq!(
            merged.get(IN).unwrap().extent,
            Extent::horizontal(-1, 1, 0, 0)
        );
        assert_eq!(merged.tmps().count(), 1);
    }

    #[test]
    fn data_type_compares_by_type_identity() {
        assert_eq!(DataType::of::<f64>(), DataType::of::<f64>());
        assert_ne!(DataType::of::<f64>(), DataType::of::<f32>());
    }
}
