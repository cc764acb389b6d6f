//! Sparse, integer-indexed persistent array.

use std::fmt;
use std::iter::FusedIterator;

use crate::hamt::{Element, Hamt, HamtIterator, HashKey, Probe};

/// One slot of a [`PersistentArray`]: the index routes, the value rides along.
#[derive(Clone)]
struct Indexed<V> {
    index: usize,
    value: V,
}

impl<V> Element for Indexed<V> {
    #[inline]
    fn hash_key(&self) -> HashKey {
        self.index
    }

    #[inline]
    fn key_equals(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<V> Probe<Indexed<V>> for usize {
    #[inline]
    fn probe_key(&self) -> HashKey {
        *self
    }

    #[inline]
    fn matches(&self, element: &Indexed<V>) -> bool {
        element.index == *self
    }
}

// =============================================================================
// PersistentArray Definition
// =============================================================================

/// A persistent array indexed by arbitrary `usize` positions.
///
/// Indices are stored sparsely: setting index `911` on an empty array holds
/// exactly one entry. Because an index is its own hash key, iteration visits
/// entries in the trie's chunk order, which is ascending for indices below
/// [`BRANCH_FACTOR`](crate::hamt::BRANCH_FACTOR).
///
/// # Examples
///
/// ```rust
/// use persistent_hamt::collections::PersistentArray;
///
/// let first = PersistentArray::new().set(0, "A").set(1, "B").set(2, "C");
/// let second = first.remove(1).set(911, "D");
///
/// assert_eq!(first.to_string(), "[A, B, C]");
/// assert_eq!(second.to_string(), "[A, C, D]");
/// assert_eq!(second.get(911), Some(&"D"));
/// ```
pub struct PersistentArray<V> {
    length: usize,
    trie: Hamt<Indexed<V>>,
}

impl<V> PersistentArray<V> {
    /// The empty array.
    pub const EMPTY: Self = Self {
        length: 0,
        trie: Hamt::EMPTY,
    };

    /// Creates an empty array.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Returns the number of occupied indices.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if no index is occupied.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the value at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&V> {
        self.trie.lookup(index, &index).map(|entry| &entry.value)
    }

    /// Returns `true` if `index` is occupied.
    #[must_use]
    pub fn contains_index(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Returns an iterator over `(index, &value)` pairs.
    #[must_use]
    pub fn iter(&self) -> PersistentArrayIterator<'_, V> {
        PersistentArrayIterator {
            inner: self.trie.iter(),
            remaining: self.length,
        }
    }

    /// Calls `visitor` for every entry until it returns `false`.
    ///
    /// Returns `true` if every entry was visited.
    pub fn traverse<F>(&self, mut visitor: F) -> bool
    where
        F: FnMut(usize, &V) -> bool,
    {
        self.trie.traverse(|entry| visitor(entry.index, &entry.value))
    }
}

impl<V: Clone> PersistentArray<V> {
    /// Returns an array with `value` at `index`, replacing any previous value.
    #[must_use]
    pub fn set(&self, index: usize, value: V) -> Self {
        let (trie, replaced) = self.trie.insert(index, Indexed { index, value });
        Self {
            length: if replaced { self.length } else { self.length + 1 },
            trie,
        }
    }

    /// Returns an array without the value at `index`.
    ///
    /// If `index` is not occupied the result shares its root with `self`.
    #[must_use]
    pub fn remove(&self, index: usize) -> Self {
        let trie = self.trie.remove(index, &index);
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

/// An iterator over the entries of a [`PersistentArray`].
pub struct PersistentArrayIterator<'a, V> {
    inner: HamtIterator<'a, Indexed<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for PersistentArrayIterator<'a, V> {
    type Item = (usize, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next()?;
        self.remaining = self.remaining.saturating_sub(1);
        Some((entry.index, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for PersistentArrayIterator<'_, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<V> FusedIterator for PersistentArrayIterator<'_, V> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<V> Clone for PersistentArray<V> {
    fn clone(&self) -> Self {
        Self {
            length: self.length,
            trie: self.trie.clone(),
        }
    }
}

impl<V> Default for PersistentArray<V> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<V: Clone> FromIterator<(usize, V)> for PersistentArray<V> {
    fn from_iter<I: IntoIterator<Item = (usize, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |array, (index, value)| array.set(index, value))
    }
}

impl<'a, V> IntoIterator for &'a PersistentArray<V> {
    type Item = (usize, &'a V);
    type IntoIter = PersistentArrayIterator<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: PartialEq> PartialEq for PersistentArray<V> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length
            && self
                .iter()
                .all(|(index, value)| other.get(index) == Some(value))
    }
}

impl<V: Eq> Eq for PersistentArray<V> {}

impl<V: fmt::Debug> fmt::Debug for PersistentArray<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<V: fmt::Display> fmt::Display for PersistentArray<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        let mut first = true;
        for (_, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{value}")?;
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<V: serde::Serialize> serde::Serialize for PersistentArray<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.length))?;
        for (index, value) in self {
            map.serialize_entry(&index, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentArrayVisitor<V> {
    marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<'de, V> serde::de::Visitor<'de> for PersistentArrayVisitor<V>
where
    V: serde::Deserialize<'de> + Clone,
{
    type Value = PersistentArray<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map from indices to values")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut array = PersistentArray::new();
        while let Some((index, value)) = access.next_entry::<usize, V>()? {
            array = array.set(index, value);
        }
        Ok(array)
    }
}

#[cfg(feature = "serde")]
impl<'de, V> serde::Deserialize<'de> for PersistentArray<V>
where
    V: serde::Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(PersistentArrayVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_set_counts_new_indices_only() {
        let array = PersistentArray::new().set(3, 'a').set(3, 'b').set(4, 'c');
        assert_eq!(array.len(), 2);
        assert_eq!(array.get(3), Some(&'b'));
    }

    #[rstest]
    fn test_remove_absent_keeps_root() {
        let array = PersistentArray::new().set(1, "one");
        let same = array.remove(2);
        assert_eq!(same.len(), 1);
        assert!(same.trie.ptr_eq(&array.trie));
    }

    #[rstest]
    fn test_iterator_reports_exact_len() {
        let array: PersistentArray<u8> = [(0, 1), (7, 2), (300, 3)].into_iter().collect();
        let mut iter = array.iter();
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);
    }
}
