//! Persistent collections built on the [`Hamt`](crate::hamt::Hamt) engine.
//!
//! Each collection pairs a trie root with its element count. Updates return
//! a new collection and leave the receiver untouched.
//!
//! | Collection            | Element           | Probe   |
//! |-----------------------|-------------------|---------|
//! | [`PersistentArray`]   | index + value     | `usize` |
//! | [`PersistentSet`]     | any [`Element`]   | any [`Probe`] |
//! | [`StrSet`]            | [`StrValue`]      | `str`   |
//! | [`StrMap`]            | [`StrKeyValue`]   | `str`   |
//!
//! [`Element`]: crate::hamt::Element
//! [`Probe`]: crate::hamt::Probe

mod array;
mod set;
mod str_map;
mod str_set;
mod strhash;
mod value;

pub use array::{PersistentArray, PersistentArrayIterator};
pub use set::{PersistentSet, PersistentSetIterator};
pub use str_map::{StrMap, StrMapIterator};
pub use str_set::{StrSet, StrSetIterator};
pub use strhash::str_hash;
pub use value::{Hashed, StrKeyValue, StrValue, compute_hash};

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(StrMap<String>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentArray<String>: Send, Sync);
