//! A persistent set of arbitrary [`Element`]s.

use std::fmt;
use std::iter::FusedIterator;

use crate::hamt::{Element, Hamt, HamtIterator, Probe};

// =============================================================================
// PersistentSet Definition
// =============================================================================

/// A persistent (immutable) set backed by a [`Hamt`].
///
/// Membership is decided by [`Element::key_equals`]. Lookups accept any
/// [`Probe`] for the element type, so a set of [`Hashed`](super::Hashed)
/// values can be queried with the bare value.
///
/// # Examples
///
/// ```rust
/// use persistent_hamt::collections::PersistentSet;
///
/// let small = PersistentSet::new().insert(1_u32).insert(2);
/// let large = small.insert(3);
///
/// assert_eq!(small.len(), 2);
/// assert_eq!(large.len(), 3);
/// assert!(!small.contains(&3_u32));
/// assert_eq!(large.to_string(), "{1, 2, 3}");
/// ```
pub struct PersistentSet<T> {
    length: usize,
    trie: Hamt<T>,
}

impl<T> PersistentSet<T> {
    /// The empty set.
    pub const EMPTY: Self = Self {
        length: 0,
        trie: Hamt::EMPTY,
    };

    /// Creates an empty set.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the set holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the stored element that `probe` denotes.
    #[must_use]
    pub fn get<P>(&self, probe: &P) -> Option<&T>
    where
        P: Probe<T> + ?Sized,
    {
        self.trie.lookup(probe.probe_key(), probe)
    }

    /// Returns `true` if the set holds the element `probe` denotes.
    #[must_use]
    pub fn contains<P>(&self, probe: &P) -> bool
    where
        P: Probe<T> + ?Sized,
    {
        self.get(probe).is_some()
    }

    /// Returns an iterator over the elements in traversal order.
    #[must_use]
    pub fn iter(&self) -> PersistentSetIterator<'_, T> {
        PersistentSetIterator {
            inner: self.trie.iter(),
            remaining: self.length,
        }
    }

    /// Calls `visitor` for every element until it returns `false`.
    ///
    /// Returns `true` if every element was visited.
    pub fn traverse<F>(&self, visitor: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.trie.traverse(visitor)
    }

    /// Returns the underlying trie.
    #[must_use]
    pub const fn as_hamt(&self) -> &Hamt<T> {
        &self.trie
    }
}

impl<T: Element + Clone> PersistentSet<T> {
    /// Returns a set that contains `element`.
    ///
    /// An equal element already present is replaced by `element`.
    #[must_use]
    pub fn insert(&self, element: T) -> Self {
        let (trie, replaced) = self.trie.insert(element.hash_key(), element);
        Self {
            length: if replaced { self.length } else { self.length + 1 },
            trie,
        }
    }

    /// Returns a set without the element `probe` denotes.
    ///
    /// If no such element exists the result shares its root with `self`.
    #[must_use]
    pub fn remove<P>(&self, probe: &P) -> Self
    where
        P: Probe<T> + ?Sized,
    {
        let trie = self.trie.remove(probe.probe_key(), probe);
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

/// An iterator over the elements of a [`PersistentSet`].
pub struct PersistentSetIterator<'a, T> {
    inner: HamtIterator<'a, T>,
    remaining: usize,
}

impl<'a, T> Iterator for PersistentSetIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.inner.next()?;
        self.remaining = self.remaining.saturating_sub(1);
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for PersistentSetIterator<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for PersistentSetIterator<'_, T> {}

impl<T> Clone for PersistentSetIterator<'_, T> {
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

impl<T> Clone for PersistentSet<T> {
    fn clone(&self) -> Self {
        Self {
            length: self.length,
            trie: self.trie.clone(),
        }
    }
}

impl<T> Default for PersistentSet<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T: Element + Clone> FromIterator<T> for PersistentSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |set, element| set.insert(element))
    }
}

impl<'a, T> IntoIterator for &'a PersistentSet<T> {
    type Item = &'a T;
    type IntoIter = PersistentSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Element> PartialEq for PersistentSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().all(|element| other.contains(element))
    }
}

impl<T: Element> Eq for PersistentSet<T> {}

impl<T: fmt::Debug> fmt::Debug for PersistentSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for PersistentSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_set(formatter, self.iter())
    }
}

/// Writes `items` as `{a, b, c}`.
pub(super) fn write_set<I>(formatter: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator,
    I::Item: fmt::Display,
{
    write!(formatter, "{{")?;
    let mut first = true;
    for item in items {
        if first {
            first = false;
        } else {
            write!(formatter, ", ")?;
        }
        write!(formatter, "{item}")?;
    }
    write!(formatter, "}}")
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for PersistentSet<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.length))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentSetVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for PersistentSetVisitor<T>
where
    T: serde::Deserialize<'de> + Element + Clone,
{
    type Value = PersistentSet<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut set = PersistentSet::new();
        while let Some(element) = seq.next_element()? {
            set = set.insert(element);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for PersistentSet<T>
where
    T: serde::Deserialize<'de> + Element + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentSetVisitor {
            marker: std::marker::PhantomData,
        })
    }
}
