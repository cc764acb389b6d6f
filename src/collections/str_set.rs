//! A persistent set of strings.

use std::fmt;
use std::iter::FusedIterator;

use super::set::{PersistentSet, PersistentSetIterator, write_set};
use super::value::StrValue;

/// A persistent set of strings, hashed with [`str_hash`](super::str_hash).
///
/// # Examples
///
/// ```rust
/// use persistent_hamt::collections::StrSet;
///
/// let empty = StrSet::new();
/// let robin = empty.insert("Robin");
/// let pair = empty.insert("Anne").insert("Frank");
/// let frank = pair.remove("Anne");
///
/// assert_eq!(robin.to_string(), "{Robin}");
/// assert_eq!(frank.to_string(), "{Frank}");
/// assert!(pair.contains("Anne"));
/// assert!(empty.is_empty());
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct StrSet {
    inner: PersistentSet<StrValue>,
}

impl StrSet {
    /// The empty set.
    pub const EMPTY: Self = Self {
        inner: PersistentSet::EMPTY,
    };

    /// Creates an empty set.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Returns the number of strings.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the set holds no strings.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` if `text` is in the set.
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.inner.contains(text)
    }

    /// Returns a set that contains `text`.
    #[must_use]
    pub fn insert(&self, text: &str) -> Self {
        Self {
            inner: self.inner.insert(StrValue::new(text)),
        }
    }

    /// Returns a set without `text`.
    ///
    /// If `text` is absent the result shares its root with `self`.
    #[must_use]
    pub fn remove(&self, text: &str) -> Self {
        Self {
            inner: self.inner.remove(text),
        }
    }

    /// Returns an iterator over the strings in traversal order.
    #[must_use]
    pub fn iter(&self) -> StrSetIterator<'_> {
        StrSetIterator {
            inner: self.inner.iter(),
        }
    }

    /// Calls `visitor` for every string until it returns `false`.
    ///
    /// Returns `true` if every string was visited.
    pub fn traverse<F>(&self, mut visitor: F) -> bool
    where
        F: FnMut(&str) -> bool,
    {
        self.inner.traverse(|value| visitor(value.as_str()))
    }
}

/// An iterator over the strings of a [`StrSet`].
#[derive(Clone)]
pub struct StrSetIterator<'a> {
    inner: PersistentSetIterator<'a, StrValue>,
}

impl<'a> Iterator for StrSetIterator<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(StrValue::as_str)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for StrSetIterator<'_> {}

impl FusedIterator for StrSetIterator<'_> {}

impl<'a> IntoIterator for &'a StrSet {
    type Item = &'a str;
    type IntoIter = StrSetIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> FromIterator<&'a str> for StrSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |set, text| set.insert(text))
    }
}

impl fmt::Debug for StrSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for StrSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_set(formatter, self.iter())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for StrSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for StrSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let strings: Vec<String> = serde::Deserialize::deserialize(deserializer)?;
        Ok(strings.iter().map(String::as_str).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_remove_absent_keeps_len() {
        let set: StrSet = ["Anne", "Frank"].into_iter().collect();
        assert_eq!(set.remove("Robin").len(), 2);
        assert_eq!(set.remove("Anne").len(), 1);
    }

    #[rstest]
    fn test_iterator_reports_exact_len() {
        let set: StrSet = ["Anne", "Frank", "Robin"].into_iter().collect();
        assert_eq!(set.iter().len(), 3);
        assert_eq!(set.remove("Anne").iter().size_hint(), (2, Some(2)));
    }

    #[rstest]
    fn test_traverse_yields_plain_strings() {
        let set = StrSet::new().insert("only");
        let mut seen = Vec::new();
        assert!(set.traverse(|text| {
            seen.push(text.to_owned());
            true
        }));
        assert_eq!(seen, vec!["only".to_owned()]);
    }
}
