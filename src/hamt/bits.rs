//! Platform-width constants and bitmap helpers.

/// Hash key consumed by the trie, one platform word wide.
pub type HashKey = usize;

/// Node bitmap, one bit per possible branch.
pub type Bitmap = usize;

/// Number of possible children per node (32 or 64).
pub const BRANCH_FACTOR: u32 = Bitmap::BITS;

/// Bits of the hash key consumed per trie level (5 or 6).
pub const CHUNK_BITS: u32 = BRANCH_FACTOR.trailing_zeros();

/// Mask selecting one chunk.
pub const CHUNK_MASK: HashKey = (BRANCH_FACTOR - 1) as HashKey;

/// Width of a hash key in bits.
pub const KEY_WIDTH: u32 = HashKey::BITS;

/// Maximum number of levels before the key is exhausted (7 or 11).
pub const MAX_DEPTH: usize = KEY_WIDTH.div_ceil(CHUNK_BITS) as usize;

/// Extracts the chunk of `key` consumed at `shift`.
///
/// Once `shift` reaches [`KEY_WIDTH`] the key is exhausted and every
/// chunk reads as zero.
#[inline]
#[must_use]
pub const fn chunk(key: HashKey, shift: u32) -> u32 {
    match key.checked_shr(shift) {
        Some(shifted) => (shifted & CHUNK_MASK) as u32,
        None => 0,
    }
}

/// Returns the single-bit bitmap for `chunk`.
#[inline]
#[must_use]
pub const fn bit(chunk: u32) -> Bitmap {
    1 << chunk
}

/// Counts the set bits of `bitmap` strictly below `bit`.
///
/// This maps a branch bit to its index in the packed slot array.
#[inline]
#[must_use]
pub const fn rank(bitmap: Bitmap, bit: Bitmap) -> usize {
    (bitmap & (bit - 1)).count_ones() as usize
}
