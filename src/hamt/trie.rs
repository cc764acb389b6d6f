//! The root reference of a persistent trie.

use std::fmt;

use super::ReferenceCounter;
use super::bits::HashKey;
use super::element::{Element, Probe};
use super::iter::HamtIterator;
use super::node::{Node, Removal};

/// Root reference of an immutable Hash Array Mapped Trie.
///
/// A `Hamt` is a cheap handle: cloning it copies one pointer. Updates never
/// modify a root; they return a new one that shares every untouched subtree
/// with the old. The empty trie is the constant [`Hamt::EMPTY`], which every
/// empty handle is identical to.
///
/// `Hamt` does not count its elements. Collections built on top keep their
/// own length, using the replace flag of [`insert`](Self::insert) and the
/// identity contract of [`remove`](Self::remove) to maintain it.
///
/// # Time Complexity
///
/// | Operation  | Complexity            |
/// |------------|-----------------------|
/// | `lookup`   | O(depth)              |
/// | `insert`   | O(depth × branching)  |
/// | `remove`   | O(depth × branching)  |
/// | `traverse` | O(N)                  |
/// | `is_empty` | O(1)                  |
///
/// Depth is bounded by [`MAX_DEPTH`](super::MAX_DEPTH).
pub struct Hamt<T> {
    root: Option<ReferenceCounter<Node<T>>>,
}

impl<T> Hamt<T> {
    /// The canonical empty trie.
    pub const EMPTY: Self = Self { root: None };

    /// Returns the canonical empty trie.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Returns `true` if the trie holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns `true` if both handles refer to the same root.
    ///
    /// This is reference identity, not structural equality. A
    /// [`remove`](Self::remove) of an absent element yields a handle that is
    /// `ptr_eq` to its input.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (None, None) => true,
            (Some(left), Some(right)) => ReferenceCounter::ptr_eq(left, right),
            _ => false,
        }
    }

    /// Returns the element stored under `key` that matches `probe`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_hamt::hamt::Hamt;
    ///
    /// let (trie, _) = Hamt::new().insert(12, 12_u32);
    /// assert_eq!(trie.lookup(12, &12_u32), Some(&12));
    /// assert_eq!(trie.lookup(13, &13_u32), None);
    /// ```
    #[must_use]
    pub fn lookup<P>(&self, key: HashKey, probe: &P) -> Option<&T>
    where
        P: Probe<T> + ?Sized,
    {
        self.root.as_deref()?.lookup(key, probe)
    }

    /// Calls `visitor` for every element, depth-first in bitmap order.
    ///
    /// Elements of one collision bucket are visited in insertion order.
    /// Traversal stops as soon as `visitor` returns `false`; the return value
    /// is `false` in that case and `true` if every element was visited.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_hamt::hamt::Hamt;
    ///
    /// let trie = [3_u32, 1, 2]
    ///     .into_iter()
    ///     .fold(Hamt::new(), |trie, number| trie.insert(number as usize, number).0);
    ///
    /// let mut seen = Vec::new();
    /// assert!(trie.traverse(|number| {
    ///     seen.push(*number);
    ///     true
    /// }));
    /// assert_eq!(seen, vec![1, 2, 3]);
    /// ```
    pub fn traverse<F>(&self, mut visitor: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.root.as_deref().is_none_or(|root| root.traverse(&mut visitor))
    }

    /// Returns a lazy iterator in [`traverse`](Self::traverse) order.
    #[must_use]
    pub fn iter(&self) -> HamtIterator<'_, T> {
        HamtIterator::new(self.root.as_deref())
    }
}

impl<T: Element + Clone> Hamt<T> {
    /// Returns a trie that contains `element` under `key`.
    ///
    /// If an element equal to `element` is already present it is replaced
    /// and the returned flag is `true`; otherwise the flag is `false` and the
    /// trie grew by one. `self` is left untouched.
    ///
    /// `key` must be `element.hash_key()`; collections compute it once and
    /// pass it along.
    #[must_use]
    pub fn insert(&self, key: HashKey, element: T) -> (Self, bool) {
        debug_assert_eq!(key, element.hash_key(), "key must be the element's hash key");
        match self.root.as_deref() {
            None => (Self::from_node(Node::singleton(key, element)), false),
            Some(root) => {
                let (node, replaced) = root.insert(0, key, element);
                (Self::from_node(node), replaced)
            }
        }
    }

    /// Returns a trie without the element under `key` that matches `probe`.
    ///
    /// If nothing matches, the returned handle is [`ptr_eq`](Self::ptr_eq)
    /// to `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_hamt::hamt::Hamt;
    ///
    /// let (trie, _) = Hamt::new().insert(5, 5_u32);
    /// assert!(trie.remove(6, &6_u32).ptr_eq(&trie));
    /// assert!(trie.remove(5, &5_u32).is_empty());
    /// ```
    #[must_use]
    pub fn remove<P>(&self, key: HashKey, probe: &P) -> Self
    where
        P: Probe<T> + ?Sized,
    {
        let Some(root) = self.root.as_deref() else {
            return Self::EMPTY;
        };
        match root.remove(0, key, probe) {
            Removal::Absent => self.clone(),
            Removal::Emptied => Self::EMPTY,
            Removal::Shrunk { node, .. } => Self::from_node(node),
        }
    }

    fn from_node(node: Node<T>) -> Self {
        Self {
            root: Some(ReferenceCounter::new(node)),
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Clone for Hamt<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<T> Default for Hamt<T> {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<'a, T> IntoIterator for &'a Hamt<T> {
    type Item = &'a T;
    type IntoIter = HamtIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Prints the trie structure level by level.
impl<T: fmt::Debug> fmt::Debug for Hamt<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root.as_deref() {
            None => formatter.write_str("empty"),
            Some(root) => root.write_tree(formatter, 0),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hamt::bits::CHUNK_BITS;
    use crate::hamt::node::Slot;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::collections::HashSet;

    fn path_key(path: &[u32]) -> HashKey {
        path.iter()
            .enumerate()
            .fold(0, |key, (level, &chunk)| {
                key | (chunk as HashKey).checked_shl(level as u32 * CHUNK_BITS).unwrap_or(0)
            })
    }

    /// Number of nodes entered before reaching the slot holding `element`.
    fn level_of(trie: &Hamt<usize>, element: usize) -> Option<usize> {
        fn walk(node: &Node<usize>, element: usize, level: usize) -> Option<usize> {
            node.slots().iter().find_map(|slot| match slot {
                Slot::Element(stored) => (*stored == element).then_some(level),
                Slot::Branch(child) => walk(child, element, level + 1),
                Slot::Collision(bucket) => bucket.elements().contains(&element).then_some(level),
            })
        }
        walk(trie.root.as_deref()?, element, 0)
    }

    /// `true` when no node below the root holds a lone element or bucket.
    fn is_compact(node: &Node<usize>, is_root: bool) -> bool {
        let lone_leaf = matches!(node.slots(), [Slot::Element(_) | Slot::Collision(_)]);
        (is_root || !lone_leaf)
            && node.slots().iter().all(|slot| match slot {
                Slot::Branch(child) => is_compact(child, false),
                Slot::Collision(bucket) => bucket.len() >= 2,
                Slot::Element(_) => true,
            })
    }

    /// Maps ids onto a few keys that collide fully or share long prefixes.
    fn colliding_key(id: usize) -> HashKey {
        const PATHS: [&[u32]; 6] = [
            &[1],
            &[1, 0, 0, 0, 1],
            &[1, 0, 0, 0, 2],
            &[1, 0, 1],
            &[2],
            &[2, 3, 3],
        ];
        path_key(PATHS[id % PATHS.len()])
    }

    fn trie_of(elements: &[usize]) -> Hamt<usize> {
        elements
            .iter()
            .fold(Hamt::new(), |trie, &element| trie.insert(element, element).0)
    }

    #[rstest]
    fn test_new_is_empty() {
        let trie: Hamt<usize> = Hamt::new();
        assert!(trie.is_empty());
        assert!(trie.ptr_eq(&Hamt::EMPTY));
        assert_eq!(trie.lookup(0, &0_usize), None);
        assert!(trie.traverse(|_| false));
        assert_eq!(trie.iter().next(), None);
    }

    #[rstest]
    fn test_insert_then_lookup() {
        let (trie, replaced) = Hamt::new().insert(7, 7_usize);
        assert!(!replaced);
        assert_eq!(trie.lookup(7, &7_usize), Some(&7));
        assert!(!trie.is_empty());
    }

    #[rstest]
    fn test_insert_twice_reports_replace() {
        let (trie, _) = Hamt::new().insert(7, 7_usize);
        let (again, replaced) = trie.insert(7, 7);
        assert!(replaced);
        assert_eq!(again.iter().count(), 1);
    }

    #[rstest]
    fn test_remove_absent_is_identity() {
        let trie = trie_of(&[1, 2, 3]);
        assert!(trie.remove(4, &4_usize).ptr_eq(&trie));
        let empty: Hamt<usize> = Hamt::new();
        assert!(empty.remove(4, &4_usize).ptr_eq(&empty));
    }

    #[rstest]
    fn test_remove_last_returns_canonical_empty() {
        let trie = trie_of(&[9]);
        let removed = trie.remove(9, &9_usize);
        assert!(removed.is_empty());
        assert!(removed.ptr_eq(&Hamt::EMPTY));
    }

    #[rstest]
    fn test_old_version_unaffected() {
        let before = trie_of(&[1, 2, 3]);
        let after = before.remove(2, &2_usize).insert(911, 911).0;
        assert_eq!(before.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(after.lookup(2, &2_usize), None);
        assert_eq!(after.lookup(911, &911_usize), Some(&911));
    }

    #[rstest]
    fn test_iter_matches_traverse() {
        let trie = trie_of(&[path_key(&[3, 2, 9]), path_key(&[3, 2, 4]), 1, path_key(&[3, 3]), 64]);
        let mut visited = Vec::new();
        trie.traverse(|element| {
            visited.push(*element);
            true
        });
        assert_eq!(trie.iter().copied().collect::<Vec<_>>(), visited);
    }

    #[rstest]
    fn test_deleting_siblings_collapses_path() {
        let deep = path_key(&[1, 2, 1, 1, 1, 1]);
        let siblings = [
            path_key(&[1, 2, 1, 1, 1, 2]),
            path_key(&[1, 2, 1, 1, 1, 3]),
            path_key(&[1, 2, 1, 2, 1, 1]),
            path_key(&[1, 1]),
        ];
        let mut trie = trie_of(&[deep]);
        for &sibling in &siblings {
            trie = trie.insert(sibling, sibling).0;
        }
        assert!(level_of(&trie, deep) > Some(1));

        for &sibling in &siblings {
            trie = trie.remove(sibling, &sibling);
        }
        assert_eq!(level_of(&trie, deep), Some(0));
        assert_eq!(trie.iter().copied().collect::<Vec<_>>(), vec![deep]);
    }

    #[rstest]
    fn test_removing_far_sibling_lifts_bucket_to_root() {
        let key = path_key(&[1]);
        let far = path_key(&[1, 0, 0, 0, 1]);
        let bucketed = Hamt::new().insert(key, 10_usize).0.insert(key, 11).0;
        assert_eq!(level_of(&bucketed, 10), Some(0));

        let (stretched, _) = bucketed.insert(far, 12);
        assert_eq!(level_of(&stretched, 10), Some(4));

        let restored = stretched.remove(far, &12_usize);
        assert_eq!(level_of(&restored, 10), Some(0));
        assert_eq!(level_of(&restored, 11), Some(0));
        assert_eq!(format!("{restored:?}"), format!("{bucketed:?}"));
    }

    #[rstest]
    fn test_debug_dump_lists_levels() {
        let trie = trie_of(&[1, path_key(&[1, 1])]);
        let dump = format!("{trie:?}");
        assert!(dump.starts_with("node (level 0"));
        assert!(dump.contains("node (level 1"));
        assert_eq!(format!("{:?}", Hamt::<usize>::new()), "empty");
    }

    proptest! {
        #[test]
        fn prop_removals_keep_the_trie_compact(
            operations in prop::collection::vec((any::<bool>(), 0_usize..48), 0..160)
        ) {
            let mut trie = Hamt::new();
            let mut model = HashSet::new();
            for (insert, id) in operations {
                let key = colliding_key(id);
                if insert {
                    trie = trie.insert(key, id).0;
                    model.insert(id);
                } else {
                    trie = trie.remove(key, &id);
                    model.remove(&id);
                }
                if let Some(root) = trie.root.as_deref() {
                    prop_assert!(is_compact(root, true), "{:?}", trie);
                }
            }

            prop_assert_eq!(trie.iter().count(), model.len());
            for id in &model {
                prop_assert_eq!(trie.lookup(colliding_key(*id), id), Some(id));
            }
        }
    }
}
