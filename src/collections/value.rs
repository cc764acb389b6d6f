//! Ready-made element types for the collections in this module.
//!
//! - [`StrValue`]: a shared string, hashed with [`str_hash`]
//! - [`StrKeyValue`]: a string key with an associated value
//! - [`Hashed`]: any `Hash + Eq` value, hashed with the configured hasher

use std::fmt;
use std::hash::{Hash, Hasher};

use super::strhash::str_hash;
use crate::hamt::{Element, HashKey, Probe, ReferenceCounter};

// =============================================================================
// Hash computation
// =============================================================================

/// Computes the hash key of `value` with the hasher selected by features.
///
/// `fxhash` selects `rustc_hash::FxHasher`, `ahash` selects `ahash` with
/// fixed seeds, otherwise std's `DefaultHasher` is used. All three are
/// deterministic within one build.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn compute_hash<T: Hash + ?Sized>(value: &T) -> HashKey {
    let mut hasher = new_hasher();
    value.hash(&mut hasher);
    hasher.finish() as HashKey
}

#[cfg(feature = "fxhash")]
fn new_hasher() -> rustc_hash::FxHasher {
    rustc_hash::FxHasher::default()
}

#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
fn new_hasher() -> ahash::AHasher {
    use std::hash::BuildHasher;
    ahash::RandomState::with_seeds(
        0x243F_6A88_85A3_08D3,
        0x1319_8A2E_0370_7344,
        0xA409_3822_299F_31D0,
        0x082E_FA98_EC4E_6C89,
    )
    .build_hasher()
}

#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
fn new_hasher() -> std::collections::hash_map::DefaultHasher {
    std::collections::hash_map::DefaultHasher::new()
}

// =============================================================================
// StrValue
// =============================================================================

/// A shared, immutable string stored together with its hash key.
///
/// Cloning a `StrValue` only bumps a reference count.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StrValue {
    hash: HashKey,
    text: ReferenceCounter<str>,
}

impl StrValue {
    /// Creates a value for `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            hash: str_hash(text),
            text: ReferenceCounter::from(text),
        }
    }

    /// Returns the string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Element for StrValue {
    #[inline]
    fn hash_key(&self) -> HashKey {
        self.hash
    }

    #[inline]
    fn key_equals(&self, other: &Self) -> bool {
        self.hash == other.hash && self.text == other.text
    }
}

impl Probe<StrValue> for str {
    #[inline]
    fn probe_key(&self) -> HashKey {
        str_hash(self)
    }

    #[inline]
    fn matches(&self, element: &StrValue) -> bool {
        element.as_str() == self
    }
}

impl From<&str> for StrValue {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for StrValue {
    fn from(text: String) -> Self {
        Self::new(&text)
    }
}

impl AsRef<str> for StrValue {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Debug for StrValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.text, formatter)
    }
}

impl fmt::Display for StrValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.text)
    }
}

// =============================================================================
// StrKeyValue
// =============================================================================

/// A string key with an associated value.
///
/// Identity is decided by the key alone, so inserting a `StrKeyValue` with
/// an existing key replaces the old value.
#[derive(Clone)]
pub struct StrKeyValue<V> {
    hash: HashKey,
    key: ReferenceCounter<str>,
    value: V,
}

impl<V> StrKeyValue<V> {
    /// Creates an entry for `key` holding `value`.
    #[must_use]
    pub fn new(key: &str, value: V) -> Self {
        Self {
            hash: str_hash(key),
            key: ReferenceCounter::from(key),
            value,
        }
    }

    /// Returns the key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the value.
    #[must_use]
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Consumes the entry, returning its value.
    #[must_use]
    pub fn into_value(self) -> V {
        self.value
    }
}

impl<V> Element for StrKeyValue<V> {
    #[inline]
    fn hash_key(&self) -> HashKey {
        self.hash
    }

    #[inline]
    fn key_equals(&self, other: &Self) -> bool {
        self.hash == other.hash && self.key == other.key
    }
}

impl<V> Probe<StrKeyValue<V>> for str {
    #[inline]
    fn probe_key(&self) -> HashKey {
        str_hash(self)
    }

    #[inline]
    fn matches(&self, element: &StrKeyValue<V>) -> bool {
        element.key() == self
    }
}

impl<V: fmt::Debug> fmt::Debug for StrKeyValue<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({:?} = {:?})", &*self.key, self.value)
    }
}

impl<V: fmt::Display> fmt::Display for StrKeyValue<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:?}: {}", &*self.key, self.value)
    }
}

// =============================================================================
// Hashed
// =============================================================================

/// Any `Hash + Eq` value paired with its precomputed hash key.
///
/// # Examples
///
/// ```rust
/// use persistent_hamt::collections::{Hashed, PersistentSet};
///
/// let set = PersistentSet::new()
///     .insert(Hashed::new((1, 'a')))
///     .insert(Hashed::new((2, 'b')));
///
/// // The bare value works as a probe.
/// assert!(set.contains(&(1, 'a')));
/// assert!(!set.contains(&(1, 'b')));
/// ```
#[derive(Clone)]
pub struct Hashed<T> {
    hash: HashKey,
    value: T,
}

impl<T: Hash> Hashed<T> {
    /// Wraps `value`, computing its hash key once.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            hash: compute_hash(&value),
            value,
        }
    }
}

impl<T> Hashed<T> {
    /// Returns the wrapped value.
    #[must_use]
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// Consumes the wrapper, returning the value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Eq> Element for Hashed<T> {
    #[inline]
    fn hash_key(&self) -> HashKey {
        self.hash
    }

    #[inline]
    fn key_equals(&self, other: &Self) -> bool {
        self.hash == other.hash && self.value == other.value
    }
}

impl<T: Hash + Eq> Probe<Hashed<T>> for T {
    #[inline]
    fn probe_key(&self) -> HashKey {
        compute_hash(self)
    }

    #[inline]
    fn matches(&self, element: &Hashed<T>) -> bool {
        element.value == *self
    }
}

impl<T: PartialEq> PartialEq for Hashed<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq> Eq for Hashed<T> {}

impl<T: fmt::Debug> fmt::Debug for Hashed<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.value, formatter)
    }
}

impl<T: fmt::Display> fmt::Display for Hashed<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, formatter)
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for StrValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.text)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for StrValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <String as serde::Deserialize>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for Hashed<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&self.value, serializer)
    }
}

/// The hash key is recomputed on deserialization.
#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de> + Hash> serde::Deserialize<'de> for Hashed<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Self::new)
    }
}
