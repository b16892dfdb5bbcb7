//! View Module
//!
//! Read-only views over the live and expired stores.
//!
//! Every view holds a shared borrow of the backing map. Callers can iterate
//! and query through a view but never mutate, and the owning `ExpiringMap`
//! stays frozen for as long as a view is alive.

use std::borrow::Borrow;
use std::collections::hash_map;
use std::collections::HashMap;
use std::hash::Hash;

// == Keys ==
/// Read-only view of a store's keys.
#[derive(Debug)]
pub struct Keys<'a, K, V> {
    inner: &'a HashMap<K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(inner: &'a HashMap<K, V>) -> Self {
        Self { inner }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> hash_map::Keys<'a, K, V> {
        self.inner.keys()
    }
}

impl<K: Eq + Hash, V> Keys<'_, K, V> {
    /// Returns true if the view holds `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.contains_key(key)
    }
}

impl<'a, K, V> IntoIterator for Keys<'a, K, V> {
    type Item = &'a K;
    type IntoIter = hash_map::Keys<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.keys()
    }
}

impl<'a, K, V> IntoIterator for &Keys<'a, K, V> {
    type Item = &'a K;
    type IntoIter = hash_map::Keys<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// == Values ==
/// Read-only view of a store's values.
#[derive(Debug)]
pub struct Values<'a, K, V> {
    inner: &'a HashMap<K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(inner: &'a HashMap<K, V>) -> Self {
        Self { inner }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> hash_map::Values<'a, K, V> {
        self.inner.values()
    }
}

impl<K, V: PartialEq> Values<'_, K, V> {
    /// Returns true if any value in the view equals `value`.
    pub fn contains(&self, value: &V) -> bool {
        self.inner.values().any(|v| v == value)
    }
}

impl<'a, K, V> IntoIterator for Values<'a, K, V> {
    type Item = &'a V;
    type IntoIter = hash_map::Values<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.values()
    }
}

impl<'a, K, V> IntoIterator for &Values<'a, K, V> {
    type Item = &'a V;
    type IntoIter = hash_map::Values<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// == Entries ==
/// Read-only view of a store's key-value pairs.
///
/// Values come out as shared references, so they cannot be changed through
/// the view:
///
/// ```compile_fail
/// use std::time::Duration;
/// use expiring_map::ExpiringMap;
///
/// let mut map = ExpiringMap::new(Duration::from_secs(60)).unwrap();
/// map.put("a".to_string(), 1);
///
/// for (_, value) in map.entries() {
///     *value += 1;
/// }
/// ```
///
/// Nor can the map be changed while a view is held:
///
/// ```compile_fail
/// use std::time::Duration;
/// use expiring_map::ExpiringMap;
///
/// let mut map = ExpiringMap::new(Duration::from_secs(60)).unwrap();
/// map.put("a".to_string(), 1);
///
/// let entries = map.entries();
/// map.put("b".to_string(), 2);
/// assert_eq!(entries.len(), 1);
/// ```
///
/// Reading through the view is fine:
///
/// ```
/// use std::time::Duration;
/// use expiring_map::ExpiringMap;
///
/// let mut map = ExpiringMap::new(Duration::from_secs(60)).unwrap();
/// map.put("a".to_string(), 1);
///
/// let entries = map.entries();
/// assert_eq!(entries.get("a"), Some(&1));
/// assert_eq!(entries.len(), 1);
/// ```
#[derive(Debug)]
pub struct Entries<'a, K, V> {
    inner: &'a HashMap<K, V>,
}

impl<'a, K, V> Entries<'a, K, V> {
    pub(crate) fn new(inner: &'a HashMap<K, V>) -> Self {
        Self { inner }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'a, K, V> {
        self.inner.iter()
    }
}

impl<'a, K: Eq + Hash, V> Entries<'a, K, V> {
    /// Looks up the value paired with `key` in the view.
    pub fn get<Q>(&self, key: &Q) -> Option<&'a V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.get(key)
    }
}

impl<'a, K, V> IntoIterator for Entries<'a, K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = hash_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<'a, K, V> IntoIterator for &Entries<'a, K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = hash_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
