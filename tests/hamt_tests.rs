//! Integration tests for the Hamt engine.

use persistent_hamt::hamt::{CHUNK_BITS, Element, Hamt, HashKey, MAX_DEPTH, Probe};
use rstest::rstest;

// =============================================================================
// Test elements
// =============================================================================

/// A named entry with a caller-chosen hash key.
#[derive(Clone, Debug, PartialEq)]
struct Entry {
    key: HashKey,
    name: &'static str,
}

impl Element for Entry {
    fn hash_key(&self) -> HashKey {
        self.key
    }

    fn key_equals(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Looks an entry up by name alone.
struct Named(HashKey, &'static str);

impl Probe<Entry> for Named {
    fn probe_key(&self) -> HashKey {
        self.0
    }

    fn matches(&self, element: &Entry) -> bool {
        element.name == self.1
    }
}

const fn entry(key: HashKey, name: &'static str) -> Entry {
    Entry { key, name }
}

fn build(entries: &[Entry]) -> Hamt<Entry> {
    entries
        .iter()
        .fold(Hamt::new(), |trie, entry| trie.insert(entry.key, entry.clone()).0)
}

fn names(trie: &Hamt<Entry>) -> Vec<&'static str> {
    trie.iter().map(|entry| entry.name).collect()
}

fn path_key(path: &[HashKey]) -> HashKey {
    path.iter().enumerate().fold(0, |key, (level, &chunk)| {
        key | chunk.checked_shl(level as u32 * CHUNK_BITS).unwrap_or(0)
    })
}

// =============================================================================
// Lookup and insert
// =============================================================================

#[rstest]
fn test_lookup_with_custom_probe() {
    let trie = build(&[entry(3, "three"), entry(40, "forty")]);
    assert_eq!(trie.lookup(40, &Named(40, "forty")), Some(&entry(40, "forty")));
    assert_eq!(trie.lookup(40, &Named(40, "other")), None);
    assert_eq!(trie.lookup(41, &Named(41, "forty")), None);
}

#[rstest]
fn test_insert_replaces_equal_element() {
    let trie = build(&[entry(7, "seven")]);
    let (replaced_trie, replaced) = trie.insert(7, entry(7, "seven"));
    assert!(replaced);
    assert_eq!(names(&replaced_trie), vec!["seven"]);

    let (grown, replaced) = trie.insert(7, entry(7, "other seven"));
    assert!(!replaced);
    assert_eq!(names(&grown), vec!["seven", "other seven"]);
}

#[rstest]
fn test_full_width_collisions_keep_insertion_order() {
    let key = HashKey::MAX;
    let trie = build(&[entry(key, "a"), entry(key, "b"), entry(key, "c")]);
    assert_eq!(names(&trie), vec!["a", "b", "c"]);
    assert_eq!(trie.lookup(key, &Named(key, "b")), Some(&entry(key, "b")));

    let without_b = trie.remove(key, &Named(key, "b"));
    assert_eq!(names(&without_b), vec!["a", "c"]);
    assert_eq!(names(&trie), vec!["a", "b", "c"]);

    let only_c = without_b.remove(key, &Named(key, "a"));
    assert_eq!(names(&only_c), vec!["c"]);
    assert!(only_c.remove(key, &Named(key, "c")).is_empty());
}

#[rstest]
fn test_different_key_at_bucket_slot_is_kept_apart() {
    let shared = path_key(&[4, 1]);
    let other = path_key(&[4, 2]);
    let trie = build(&[entry(shared, "x"), entry(shared, "y"), entry(other, "z")]);

    assert_eq!(names(&trie), vec!["x", "y", "z"]);
    assert_eq!(trie.lookup(other, &Named(other, "z")), Some(&entry(other, "z")));
    assert_eq!(trie.lookup(shared, &Named(shared, "z")), None);

    let trimmed = trie.remove(other, &Named(other, "z"));
    assert_eq!(names(&trimmed), vec!["x", "y"]);
}

#[rstest]
fn test_keys_sharing_all_but_last_chunk() {
    let deep: Vec<HashKey> = (0..MAX_DEPTH).map(|_| 1).collect();
    let key = path_key(&deep);
    let last_level = (MAX_DEPTH as u32 - 1) * CHUNK_BITS;
    let sibling = key ^ (1 << last_level);
    let trie = build(&[entry(key, "deep"), entry(sibling, "sibling")]);
    assert_eq!(trie.lookup(key, &Named(key, "deep")), Some(&entry(key, "deep")));
    assert_eq!(trie.lookup(sibling, &Named(sibling, "sibling")), Some(&entry(sibling, "sibling")));

    let collapsed = trie.remove(sibling, &Named(sibling, "sibling"));
    assert_eq!(names(&collapsed), vec!["deep"]);
    assert_eq!(format!("{collapsed:?}").lines().count(), 2);
}

// =============================================================================
// Remove
// =============================================================================

#[rstest]
fn test_remove_absent_from_bucket_is_identity() {
    let trie = build(&[entry(9, "a"), entry(9, "b")]);
    assert!(trie.remove(9, &Named(9, "c")).ptr_eq(&trie));
    assert!(trie.remove(10, &Named(10, "a")).ptr_eq(&trie));
}

#[rstest]
fn test_remove_everything_reaches_canonical_empty() {
    let entries = [
        entry(1, "one"),
        entry(path_key(&[1, 3]), "deep"),
        entry(path_key(&[1, 3]), "deep twin"),
        entry(2, "two"),
    ];
    let mut trie = build(&entries);
    for removed in &entries {
        trie = trie.remove(removed.key, removed);
    }
    assert!(trie.is_empty());
    assert!(trie.ptr_eq(&Hamt::EMPTY));
}

// =============================================================================
// Persistence and iteration
// =============================================================================

#[rstest]
fn test_versions_are_independent() {
    let first = build(&[entry(1, "a"), entry(2, "b")]);
    let second = first.insert(3, entry(3, "c")).0;
    let third = second.remove(1, &entry(1, "a"));

    assert_eq!(names(&first), vec!["a", "b"]);
    assert_eq!(names(&second), vec!["a", "b", "c"]);
    assert_eq!(names(&third), vec!["b", "c"]);
}

#[rstest]
fn test_iterator_is_fused_and_cloneable() {
    let trie = build(&[entry(1, "a"), entry(2, "b")]);
    let mut iter = trie.iter();
    let snapshot = iter.clone();
    assert_eq!(iter.by_ref().count(), 2);
    assert_eq!(iter.next(), None);
    assert_eq!(snapshot.count(), 2);
}

#[rstest]
fn test_into_iterator_for_reference() {
    let trie = build(&[entry(5, "five")]);
    let mut seen = Vec::new();
    for element in &trie {
        seen.push(element.name);
    }
    assert_eq!(seen, vec!["five"]);
}

#[rstest]
fn test_debug_dump_shows_collisions() {
    let trie = build(&[entry(3, "a"), entry(3, "b")]);
    let dump = format!("{trie:?}");
    assert!(dump.starts_with("node (level 0"));
    assert!(dump.contains("collision 0x3"));
    assert!(dump.contains("name: \"b\""));
}
