//! The persistent Hash Array Mapped Trie engine.
//!
//! This module provides [`Hamt`], the immutable root reference of a
//! bitmap-indexed trie, together with the [`Element`] contract every stored
//! value implements.
//!
//! # Overview
//!
//! Each trie level consumes [`CHUNK_BITS`] bits of an element's hash key,
//! starting at the low end. A node stores a bitmap with one bit per occupied
//! branch and a densely packed slot array; the slot for a branch is found by
//! counting the set bits below it ([`rank`]).
//!
//! - O(depth) lookup, insert and remove, where depth <= [`MAX_DEPTH`]
//! - O(1) `is_empty`
//! - Full-width hash collisions are kept in ordered collision buckets
//!
//! Every update returns a new root; the previous root stays valid and shares
//! all untouched subtrees with the new one.
//!
//! # Examples
//!
//! ```rust
//! use persistent_hamt::hamt::{Element, Hamt, HashKey};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Word(&'static str, HashKey);
//!
//! impl Element for Word {
//!     fn hash_key(&self) -> HashKey {
//!         self.1
//!     }
//!
//!     fn key_equals(&self, other: &Self) -> bool {
//!         self.0 == other.0
//!     }
//! }
//!
//! let apple = Word("apple", 7);
//! let (trie, replaced) = Hamt::new().insert(apple.hash_key(), apple.clone());
//! assert!(!replaced);
//! assert_eq!(trie.lookup(7, &apple), Some(&apple));
//!
//! // Removing an absent element yields the very same root.
//! let pear = Word("pear", 9);
//! assert!(trie.remove(9, &pear).ptr_eq(&trie));
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type used for every shared subtree.
///
/// When the `arc` feature is enabled (the default), this is `std::sync::Arc`,
/// which lets tries be shared between threads.
///
/// When the `arc` feature is disabled, this is `std::rc::Rc`,
/// which is cheaper but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod bits;
mod branch;
mod bucket;
mod element;
mod iter;
mod node;
mod trie;

pub use bits::{BRANCH_FACTOR, Bitmap, CHUNK_BITS, CHUNK_MASK, HashKey, KEY_WIDTH, MAX_DEPTH};
pub use bits::{bit, chunk, rank};
pub use element::{Element, Probe};
pub use iter::HamtIterator;
pub use trie::Hamt;

static_assertions::const_assert_eq!(BRANCH_FACTOR, Bitmap::BITS);
static_assertions::const_assert_eq!(1 << CHUNK_BITS, BRANCH_FACTOR);

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(Hamt<u64>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(Hamt<u64>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod reference_counter_tests {
    use super::ReferenceCounter;
    use rstest::rstest;

    #[rstest]
    fn test_reference_counter_strong_count() {
        let reference_counter: ReferenceCounter<i32> = ReferenceCounter::new(42);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
        let reference_counter_clone = reference_counter.clone();
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 2);
        drop(reference_counter_clone);
        assert_eq!(ReferenceCounter::strong_count(&reference_counter), 1);
    }
}
