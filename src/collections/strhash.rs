//! Deterministic string hashing for string-keyed collections.

use crate::hamt::HashKey;

#[cfg(target_pointer_width = "64")]
const OFFSET_BASIS: HashKey = 0xCBF2_9CE4_8422_2325;
#[cfg(target_pointer_width = "64")]
const PRIME: HashKey = 0x0000_0100_0000_01B3;

#[cfg(not(target_pointer_width = "64"))]
const OFFSET_BASIS: HashKey = 0x811C_9DC5;
#[cfg(not(target_pointer_width = "64"))]
const PRIME: HashKey = 0x0100_0193;

/// Hashes `text` with FNV-1a at the platform word width.
///
/// The result is stable across runs and builds for the same target width.
/// It is not a cryptographic hash.
///
/// # Examples
///
/// ```rust
/// use persistent_hamt::collections::str_hash;
///
/// assert_eq!(str_hash("Hello"), str_hash("Hello"));
/// assert_ne!(str_hash("Hello"), str_hash("hello"));
/// ```
#[must_use]
pub const fn str_hash(text: &str) -> HashKey {
    let bytes = text.as_bytes();
    let mut hash = OFFSET_BASIS;
    let mut index = 0;
    while index < bytes.len() {
        hash = (hash ^ bytes[index] as HashKey).wrapping_mul(PRIME);
        index += 1;
    }
    hash
}
