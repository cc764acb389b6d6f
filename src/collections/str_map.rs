//! A persistent map from strings to values.

use std::fmt;
use std::iter::FusedIterator;

use super::value::StrKeyValue;
use crate::hamt::{Element, Hamt, HamtIterator, Probe};

/// Maps larger than this print one entry per line.
const INLINE_DISPLAY_LIMIT: usize = 5;

// =============================================================================
// StrMap Definition
// =============================================================================

/// A persistent (immutable) map with string keys.
///
/// Keys are hashed with [`str_hash`](super::str_hash), so the traversal
/// order of a given set of keys is the same on every run.
///
/// # Examples
///
/// ```rust
/// use persistent_hamt::collections::StrMap;
///
/// let empty = StrMap::new();
/// let first = empty.insert("Hello", 123);
/// let second = empty.insert("Hello", 456).insert("Sun", 9);
/// let third = second.remove("Hello");
///
/// assert_eq!(first.to_string(), r#"{"Hello": 123}"#);
/// assert_eq!(second.get("Hello"), Some(&456));
/// assert_eq!(third.to_string(), r#"{"Sun": 9}"#);
/// ```
pub struct StrMap<V> {
    length: usize,
    trie: Hamt<StrKeyValue<V>>,
}

impl<V> StrMap<V> {
    /// The empty map.
    pub const EMPTY: Self = Self {
        length: 0,
        trie: Hamt::EMPTY,
    };

    /// Creates an empty map.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entry(key).map(StrKeyValue::value)
    }

    /// Returns the stored key and value for `key`.
    #[must_use]
    pub fn get_key_value(&self, key: &str) -> Option<(&str, &V)> {
        self.entry(key).map(|entry| (entry.key(), entry.value()))
    }

    /// Returns `true` if the map has an entry for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entry(key).is_some()
    }

    /// Returns an iterator over `(key, &value)` pairs in traversal order.
    #[must_use]
    pub fn iter(&self) -> StrMapIterator<'_, V> {
        StrMapIterator {
            inner: self.trie.iter(),
            remaining: self.length,
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Calls `visitor` for every entry until it returns `false`.
    ///
    /// Returns `true` if every entry was visited.
    pub fn traverse<F>(&self, mut visitor: F) -> bool
    where
        F: FnMut(&str, &V) -> bool,
    {
        self.trie.traverse(|entry| visitor(entry.key(), entry.value()))
    }

    fn entry(&self, key: &str) -> Option<&StrKeyValue<V>> {
        self.trie.lookup(Probe::<StrKeyValue<V>>::probe_key(key), key)
    }
}

impl<V: Clone> StrMap<V> {
    /// Returns a map with `value` stored under `key`.
    ///
    /// An existing entry for `key` is replaced.
    #[must_use]
    pub fn insert(&self, key: &str, value: V) -> Self {
        let entry = StrKeyValue::new(key, value);
        let (trie, replaced) = self.trie.insert(entry.hash_key(), entry);
        Self {
            length: if replaced { self.length } else { self.length + 1 },
            trie,
        }
    }

    /// Returns a map without the entry for `key`.
    ///
    /// If `key` is absent the result shares its root with `self`.
    #[must_use]
    pub fn remove(&self, key: &str) -> Self {
        let trie = self
            .trie
            .remove(Probe::<StrKeyValue<V>>::probe_key(key), key);
        if trie.ptr_eq(&self.trie) {
            return self.clone();
        }
        Self {
            length: self.length - 1,
            trie,
        }
    }
}

// =============================================================================
// Iterator
// =============================================================================

/// An iterator over the entries of a [`StrMap`].
pub struct StrMapIterator<'a, V> {
    inner: HamtIterator<'a, StrKeyValue<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for StrMapIterator<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next()?;
        self.remaining = self.remaining.saturating_sub(1);
        Some((entry.key(), entry.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for StrMapIterator<'_, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<V> FusedIterator for StrMapIterator<'_, V> {}

impl<V> Clone for StrMapIterator<'_, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            remaining: self.remaining,
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<V> Clone for StrMap<V> {
    fn clone(&self) -> Self {
        Self {
            length: self.length,
            trie: self.trie.clone(),
        }
    }
}

impl<V> Default for StrMap<V> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<'k, V: Clone> FromIterator<(&'k str, V)> for StrMap<V> {
    fn from_iter<I: IntoIterator<Item = (&'k str, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (key, value)| map.insert(key, value))
    }
}

impl<'a, V> IntoIterator for &'a StrMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = StrMapIterator<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: PartialEq> PartialEq for StrMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length
            && self
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<V: Eq> Eq for StrMap<V> {}

impl<V: fmt::Debug> fmt::Debug for StrMap<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

/// Writes `{"key": value, ...}`, one entry per line once the map holds
/// more than five entries.
impl<V: fmt::Display> fmt::Display for StrMap<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let multiline = self.length > INLINE_DISPLAY_LIMIT;
        let separator = if multiline { ",\n  " } else { ", " };
        formatter.write_str(if multiline { "{\n  " } else { "{" })?;
        let mut first = true;
        for entry in &self.trie {
            if first {
                first = false;
            } else {
                formatter.write_str(separator)?;
            }
            write!(formatter, "{entry}")?;
        }
        formatter.write_str(if multiline { ",\n}" } else { "}" })
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<V: serde::Serialize> serde::Serialize for StrMap<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.length))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct StrMapVisitor<V> {
    marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<'de, V> serde::de::Visitor<'de> for StrMapVisitor<V>
where
    V: serde::Deserialize<'de> + Clone,
{
    type Value = StrMap<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map with string keys")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = StrMap::new();
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            map = map.insert(&key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, V> serde::Deserialize<'de> for StrMap<V>
where
    V: serde::Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(StrMapVisitor {
            marker: std::marker::PhantomData,
        })
    }
}
