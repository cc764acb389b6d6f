//! Bitmap-indexed trie nodes and the recursive update algorithms.

use std::fmt;

use super::ReferenceCounter;
use super::bits::{self, Bitmap, CHUNK_BITS, HashKey};
use super::branch::{self, Leaf};
use super::bucket::{Bucket, Shrunk};
use super::element::{Element, Probe};

// =============================================================================
// Node Definition
// =============================================================================

/// Content of one occupied branch of a node.
pub(crate) enum Slot<T> {
    /// A stored element.
    Element(T),
    /// A sub-trie one level deeper.
    Branch(ReferenceCounter<Node<T>>),
    /// Elements sharing one full-width hash key.
    Collision(ReferenceCounter<Bucket<T>>),
}

/// Immutable trie node.
///
/// Invariant: `slots.len() == bitmap.count_ones()`, and slot `i` belongs to
/// the `i`-th set bit of `bitmap`, counted from the low end.
pub(crate) struct Node<T> {
    bitmap: Bitmap,
    slots: Box<[Slot<T>]>,
}

/// Outcome of removing an element from a node.
pub(crate) enum Removal<T> {
    /// Nothing matched; the node is unchanged.
    Absent,
    /// The last slot was removed.
    Emptied,
    /// A copy of the node without the element.
    ///
    /// `collided` is set when the element came out of a collision bucket
    /// that still holds two or more elements.
    Shrunk { node: Node<T>, collided: bool },
}

impl<T> Removal<T> {
    const fn shrunk(node: Node<T>) -> Self {
        Self::Shrunk {
            node,
            collided: false,
        }
    }
}

impl<T: Clone> Clone for Slot<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Element(element) => Self::Element(element.clone()),
            Self::Branch(child) => Self::Branch(ReferenceCounter::clone(child)),
            Self::Collision(bucket) => Self::Collision(ReferenceCounter::clone(bucket)),
        }
    }
}

impl<T> Node<T> {
    fn from_parts(bitmap: Bitmap, slots: Vec<Slot<T>>) -> Self {
        debug_assert_eq!(
            slots.len(),
            bitmap.count_ones() as usize,
            "slot count must match the bitmap population"
        );
        Self {
            bitmap,
            slots: slots.into_boxed_slice(),
        }
    }

    /// Creates a root holding a single element.
    pub(crate) fn singleton(key: HashKey, element: T) -> Self {
        Self::from_parts(bits::bit(bits::chunk(key, 0)), vec![Slot::Element(element)])
    }

    /// Creates a node with `first` and `second` under two distinct chunks.
    pub(crate) fn pair(first_chunk: u32, first: Slot<T>, second_chunk: u32, second: Slot<T>) -> Self {
        debug_assert_ne!(first_chunk, second_chunk);
        let bitmap = bits::bit(first_chunk) | bits::bit(second_chunk);
        let slots = if first_chunk < second_chunk {
            vec![first, second]
        } else {
            vec![second, first]
        };
        Self::from_parts(bitmap, slots)
    }

    /// Creates a bridging node whose only slot is `inner`.
    pub(crate) fn bridge(chunk: u32, inner: Slot<T>) -> Self {
        Self::from_parts(bits::bit(chunk), vec![inner])
    }

    pub(crate) const fn bitmap(&self) -> Bitmap {
        self.bitmap
    }

    pub(crate) fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }

    /// Returns the only slot of this node if it can replace the node in its
    /// parent: a bare element or a collision bucket.
    fn sole_leaf(&self) -> Option<&Slot<T>> {
        match &*self.slots {
            [slot @ (Slot::Element(_) | Slot::Collision(_))] => Some(slot),
            _ => None,
        }
    }

    /// Searches for the element matching `probe` under `key`.
    pub(crate) fn lookup<'a, P>(&'a self, key: HashKey, probe: &P) -> Option<&'a T>
    where
        P: Probe<T> + ?Sized,
    {
        let mut node = self;
        let mut shift = 0;
        loop {
            let bit = bits::bit(bits::chunk(key, shift));
            if node.bitmap & bit == 0 {
                return None;
            }
            match &node.slots[bits::rank(node.bitmap, bit)] {
                Slot::Branch(child) => {
                    node = child.as_ref();
                    shift += CHUNK_BITS;
                }
                Slot::Collision(bucket) => {
                    return if bucket.key() == key {
                        bucket.find(probe)
                    } else {
                        None
                    };
                }
                Slot::Element(element) => {
                    return probe.matches(element).then_some(element);
                }
            }
        }
    }

    /// Visits every element depth-first in slot order.
    ///
    /// Stops as soon as `visitor` returns `false` and reports whether the
    /// traversal ran to completion.
    pub(crate) fn traverse<F>(&self, visitor: &mut F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.slots.iter().all(|slot| match slot {
            Slot::Element(element) => visitor(element),
            Slot::Branch(child) => child.traverse(visitor),
            Slot::Collision(bucket) => bucket.elements().iter().all(|element| visitor(element)),
        })
    }
}

// =============================================================================
// Insert and Remove
// =============================================================================

impl<T: Element + Clone> Node<T> {
    /// Returns a copy of this node containing `element` at `shift`.
    ///
    /// The flag is `true` when an equal element was replaced rather than a
    /// new one added.
    pub(crate) fn insert(&self, shift: u32, key: HashKey, element: T) -> (Self, bool) {
        let bit = bits::bit(bits::chunk(key, shift));
        let position = bits::rank(self.bitmap, bit);

        if self.bitmap & bit == 0 {
            let mut slots = Vec::with_capacity(self.slots.len() + 1);
            slots.extend_from_slice(&self.slots[..position]);
            slots.push(Slot::Element(element));
            slots.extend_from_slice(&self.slots[position..]);
            return (Self::from_parts(self.bitmap | bit, slots), false);
        }

        let (slot, replaced) = match &self.slots[position] {
            Slot::Branch(child) => {
                let (new_child, replaced) = child.insert(shift + CHUNK_BITS, key, element);
                (Slot::Branch(ReferenceCounter::new(new_child)), replaced)
            }
            Slot::Collision(bucket) if bucket.key() == key => {
                let (new_bucket, replaced) = bucket.with(element);
                (Slot::Collision(ReferenceCounter::new(new_bucket)), replaced)
            }
            Slot::Collision(bucket) => {
                let existing = Leaf::Collision(ReferenceCounter::clone(bucket));
                let slot = branch::synthesize(shift + CHUNK_BITS, bucket.key(), existing, key, element);
                (slot, false)
            }
            Slot::Element(existing) => {
                let existing_key = existing.hash_key();
                if existing_key == key && existing.key_equals(&element) {
                    (Slot::Element(element), true)
                } else if existing_key == key {
                    let bucket = Bucket::pair(key, existing.clone(), element);
                    (Slot::Collision(ReferenceCounter::new(bucket)), false)
                } else {
                    let existing = Leaf::Element(existing.clone());
                    let slot = branch::synthesize(shift + CHUNK_BITS, existing_key, existing, key, element);
                    (slot, false)
                }
            }
        };

        (self.with_slot(position, slot), replaced)
    }

    /// Returns a copy of this node without the element matching `probe`.
    ///
    /// A child that is left holding a single element or an untouched
    /// collision bucket is collapsed into this node's slot, so no
    /// single-child intermediate nodes remain above a leaf.
    pub(crate) fn remove<P>(&self, shift: u32, key: HashKey, probe: &P) -> Removal<T>
    where
        P: Probe<T> + ?Sized,
    {
        let bit = bits::bit(bits::chunk(key, shift));
        if self.bitmap & bit == 0 {
            return Removal::Absent;
        }
        let position = bits::rank(self.bitmap, bit);

        match &self.slots[position] {
            Slot::Branch(child) => match child.remove(shift + CHUNK_BITS, key, probe) {
                Removal::Absent => Removal::Absent,
                Removal::Emptied => self.without_slot(position, bit),
                Removal::Shrunk { node: new_child, collided } => {
                    let lifted = if collided { None } else { new_child.sole_leaf().cloned() };
                    let slot = match lifted {
                        Some(leaf) => {
                            tracing::trace!(shift, "path collapsed");
                            leaf
                        }
                        None => Slot::Branch(ReferenceCounter::new(new_child)),
                    };
                    Removal::Shrunk {
                        node: self.with_slot(position, slot),
                        collided,
                    }
                }
            },
            Slot::Collision(bucket) if bucket.key() == key => match bucket.without(probe) {
                None => Removal::Absent,
                Some(Shrunk::Single(element)) => {
                    Removal::shrunk(self.with_slot(position, Slot::Element(element)))
                }
                Some(Shrunk::Bucket(new_bucket)) => Removal::Shrunk {
                    node: self.with_slot(position, Slot::Collision(ReferenceCounter::new(new_bucket))),
                    collided: true,
                },
            },
            Slot::Collision(_) => Removal::Absent,
            Slot::Element(existing) => {
                if probe.matches(existing) {
                    self.without_slot(position, bit)
                } else {
                    Removal::Absent
                }
            }
        }
    }

    fn with_slot(&self, position: usize, slot: Slot<T>) -> Self {
        let mut slots = Vec::with_capacity(self.slots.len());
        slots.extend_from_slice(&self.slots[..position]);
        slots.push(slot);
        slots.extend_from_slice(&self.slots[position + 1..]);
        Self::from_parts(self.bitmap, slots)
    }

    fn without_slot(&self, position: usize, bit: Bitmap) -> Removal<T> {
        if self.slots.len() == 1 {
            return Removal::Emptied;
        }
        let mut slots = Vec::with_capacity(self.slots.len() - 1);
        slots.extend_from_slice(&self.slots[..position]);
        slots.extend_from_slice(&self.slots[position + 1..]);
        Removal::shrunk(Self::from_parts(self.bitmap & !bit, slots))
    }
}

// =============================================================================
// Debug Dump
// =============================================================================

impl<T: fmt::Debug> Node<T> {
    /// Writes an indented dump of this node and everything below it.
    pub(crate) fn write_tree(&self, formatter: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        let indent = "  ".repeat(level + 1);
        write!(formatter, "node (level {level}, bitmap {:#b})", self.bitmap)?;
        for (index, slot) in self.slots.iter().enumerate() {
            write!(formatter, "\n{indent}#{index} => ")?;
            match slot {
                Slot::Element(element) => write!(formatter, "{element:?}")?,
                Slot::Branch(child) => child.write_tree(formatter, level + 1)?,
                Slot::Collision(bucket) => {
                    write!(formatter, "collision {:#x}", bucket.key())?;
                    for element in bucket.elements() {
                        write!(formatter, "\n{indent}  - {element:?}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
