//! The capability every stored value provides.

use super::bits::HashKey;

/// A value that can be stored in a [`Hamt`](super::Hamt).
///
/// `hash_key` routes the element through the trie and `key_equals` decides
/// logical identity for replace, lookup and remove.
///
/// # Contract
///
/// Elements that are `key_equals` must have the same `hash_key`; the trie
/// never compares elements whose keys differ. Both results must stay stable
/// for as long as the element is reachable from a live root. Breaking either
/// rule leaves the trie in an unspecified (but memory-safe) state.
pub trait Element {
    /// Returns the routing hash of this element.
    fn hash_key(&self) -> HashKey;

    /// Returns `true` if `other` denotes the same logical entry.
    fn key_equals(&self, other: &Self) -> bool;
}

/// A lookup handle for elements of type `T`.
///
/// Every element is a probe for its own type. Collections add cheaper
/// probes, such as a bare `str` for string-keyed maps, so that a lookup does
/// not have to construct a full element.
pub trait Probe<T: ?Sized> {
    /// Returns the hash key the matching element is stored under.
    fn probe_key(&self) -> HashKey;

    /// Returns `true` if `element` is the entry this probe denotes.
    fn matches(&self, element: &T) -> bool;
}

impl<T: Element> Probe<T> for T {
    #[inline]
    fn probe_key(&self) -> HashKey {
        self.hash_key()
    }

    #[inline]
    fn matches(&self, element: &T) -> bool {
        self.key_equals(element)
    }
}

macro_rules! impl_element_for_integers {
    ($($integer:ty),*) => {
        $(
            impl Element for $integer {
                #[inline]
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                fn hash_key(&self) -> HashKey {
                    *self as HashKey
                }

                #[inline]
                fn key_equals(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_element_for_integers!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
