//! Ordered name index.
//!
//! The zone store only needs a handful of operations from its index: exact
//! lookup, insertion, removal, in-order iteration and the nearest neighbours
//! of a key. [`OrderedIndex`] captures that contract so the store can sit on
//! top of any ordered map (a radix tree, a B-tree, a skip list).
//! [`BTreeIndex`] is the default implementation.

use crate::key::CanonicalKey;
use std::collections::BTreeMap;
use std::ops::Bound;

/// Iterator over index entries in key order.
pub type Entries<'a, V> = Box<dyn Iterator<Item = (&'a CanonicalKey, &'a V)> + 'a>;

/// Ordered map from canonical keys to values.
///
/// Implementations must iterate and answer neighbour queries in
/// [`CanonicalKey`] order.
pub trait OrderedIndex<V> {
    /// Inserts a value, returning the previous value under the key.
    fn insert(&mut self, key: CanonicalKey, value: V) -> Option<V>;

    /// Exact-match lookup.
    fn get(&self, key: &CanonicalKey) -> Option<&V>;

    /// Removes a key, returning its value.
    fn remove(&mut self, key: &CanonicalKey) -> Option<V>;

    /// Entry with the largest key strictly less than `key`.
    fn predecessor(&self, key: &CanonicalKey) -> Option<(&CanonicalKey, &V)>;

    /// Entry with the smallest key strictly greater than `key`.
    fn successor(&self, key: &CanonicalKey) -> Option<(&CanonicalKey, &V)>;

    /// Entry with the smallest key.
    fn first(&self) -> Option<(&CanonicalKey, &V)>;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns true if the index holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over all entries in key order.
    fn entries(&self) -> Entries<'_, V>;
}

/// [`OrderedIndex`] backed by a [`BTreeMap`].
#[derive(Debug, Clone)]
pub struct BTreeIndex<V> {
    map: BTreeMap<CanonicalKey, V>,
}

impl<V> BTreeIndex<V> {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }
}

impl<V> Default for BTreeIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(CanonicalKey, V)> for BTreeIndex<V> {
    fn from_iter<T: IntoIterator<Item = (CanonicalKey, V)>>(iter: T) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

impl<V> OrderedIndex<V> for BTreeIndex<V> {
    fn insert(&mut self, key: CanonicalKey, value: V) -> Option<V> {
        self.map.insert(key, value)
    }

    fn get(&self, key: &CanonicalKey) -> Option<&V> {
        self.map.get(key)
    }

    fn remove(&mut self, key: &CanonicalKey) -> Option<V> {
        self.map.remove(key)
    }

    fn predecessor(&self, key: &CanonicalKey) -> Option<(&CanonicalKey, &V)> {
        self.map
            .range((Bound::Unbounded, Bound::Excluded(key)))
            .next_back()
    }

    fn successor(&self, key: &CanonicalKey) -> Option<(&CanonicalKey, &V)> {
        self.map
            .range((Bound::Excluded(key), Bound::Unbounded))
            .next()
    }

    fn first(&self) -> Option<(&CanonicalKey, &V)> {
        self.map.first_key_value()
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn entries(&self) -> Entries<'_, V> {
        Box::new(self.map.iter())
    }
}
