//! Lazy depth-first iteration over a trie.

use std::iter::FusedIterator;
use std::slice;

use smallvec::SmallVec;

use super::bits::MAX_DEPTH;
use super::node::{Node, Slot};

/// An iterator over the elements of a [`Hamt`](super::Hamt).
///
/// Yields elements in the same order as [`Hamt::traverse`](super::Hamt::traverse):
/// slots in ascending bit order, sub-tries before the next slot, collision
/// buckets in insertion order.
pub struct HamtIterator<'a, T> {
    stack: SmallVec<[slice::Iter<'a, Slot<T>>; MAX_DEPTH]>,
    bucket: slice::Iter<'a, T>,
}

impl<'a, T> HamtIterator<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Self {
        let mut stack = SmallVec::new();
        if let Some(node) = root {
            stack.push(node.slots().iter());
        }
        Self {
            stack,
            bucket: [].iter(),
        }
    }
}

impl<'a, T> Iterator for HamtIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(element) = self.bucket.next() {
                return Some(element);
            }
            let slots = self.stack.last_mut()?;
            match slots.next() {
                None => {
                    self.stack.pop();
                }
                Some(Slot::Element(element)) => return Some(element),
                Some(Slot::Branch(child)) => self.stack.push(child.slots().iter()),
                Some(Slot::Collision(bucket)) => self.bucket = bucket.elements().iter(),
            }
        }
    }
}

impl<T> FusedIterator for HamtIterator<'_, T> {}

impl<T> Clone for HamtIterator<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            bucket: self.bucket.clone(),
        }
    }
}
