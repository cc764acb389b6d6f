//! Collision buckets for elements sharing one full-width hash key.

use std::fmt;

use super::bits::HashKey;
use super::element::Probe;

/// Ordered list of elements that share an identical hash key.
///
/// Invariant: a bucket stored in a trie always holds at least two elements.
/// Insertion order is preserved and visible during traversal.
#[derive(Clone)]
pub(crate) struct Bucket<T> {
    key: HashKey,
    elements: Box<[T]>,
}

/// Result of removing one element from a bucket.
pub(crate) enum Shrunk<T> {
    /// The bucket still holds two or more elements.
    Bucket(Bucket<T>),
    /// Exactly one element is left; the bucket dissolves into it.
    Single(T),
}

impl<T> Bucket<T> {
    /// Creates a bucket from the two colliding elements, `first` kept first.
    pub(crate) fn pair(key: HashKey, first: T, second: T) -> Self {
        tracing::trace!(key, "collision bucket formed");
        Self {
            key,
            elements: Box::new([first, second]),
        }
    }

    /// Returns the hash key shared by all elements.
    pub(crate) const fn key(&self) -> HashKey {
        self.key
    }

    /// Returns the elements in insertion order.
    pub(crate) fn elements(&self) -> &[T] {
        &self.elements
    }

    /// Returns the number of elements.
    pub(crate) fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns the element matching `probe`, if any.
    pub(crate) fn find<P>(&self, probe: &P) -> Option<&T>
    where
        P: Probe<T> + ?Sized,
    {
        self.elements.iter().find(|element| probe.matches(element))
    }
}

impl<T: Clone> Bucket<T> {
    /// Returns a copy of this bucket containing `element`.
    ///
    /// An element matching `element` is replaced in place; otherwise
    /// `element` is appended. The flag reports whether a replace happened.
    pub(crate) fn with(&self, element: T) -> (Self, bool)
    where
        T: Probe<T>,
    {
        let mut elements = self.elements.to_vec();
        let replaced = match elements.iter().position(|existing| element.matches(existing)) {
            Some(position) => {
                elements[position] = element;
                true
            }
            None => {
                elements.push(element);
                false
            }
        };
        let bucket = Self {
            key: self.key,
            elements: elements.into_boxed_slice(),
        };
        (bucket, replaced)
    }

    /// Returns this bucket without the element matching `probe`, or `None`
    /// if no element matches.
    pub(crate) fn without<P>(&self, probe: &P) -> Option<Shrunk<T>>
    where
        P: Probe<T> + ?Sized,
    {
        let position = self.elements.iter().position(|element| probe.matches(element))?;
        let mut elements = self.elements.to_vec();
        elements.remove(position);
        debug_assert!(!elements.is_empty(), "bucket held fewer than two elements");

        if elements.len() == 1 {
            tracing::trace!(key = self.key, "collision bucket collapsed to element");
            elements.pop().map(Shrunk::Single)
        } else {
            Some(Shrunk::Bucket(Self {
                key: self.key,
                elements: elements.into_boxed_slice(),
            }))
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Bucket<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Bucket")
            .field("key", &format_args!("{:#x}", self.key))
            .field("elements", &self.elements)
            .finish()
    }
}
