//! Synthesis of the minimal sub-branch separating two colliding leaves.

use arrayvec::ArrayVec;

use super::ReferenceCounter;
use super::bits::{self, CHUNK_BITS, HashKey, KEY_WIDTH, MAX_DEPTH};
use super::bucket::Bucket;
use super::element::Element;
use super::node::{Node, Slot};

/// A slot occupant that carries its own full hash key.
pub(crate) enum Leaf<T> {
    Element(T),
    Collision(ReferenceCounter<Bucket<T>>),
}

impl<T> Leaf<T> {
    fn into_slot(self) -> Slot<T> {
        match self {
            Self::Element(element) => Slot::Element(element),
            Self::Collision(bucket) => Slot::Collision(bucket),
        }
    }
}

/// Builds the slot content that separates `existing` (stored under
/// `existing_key`) from the new `element` (stored under `key`), starting at
/// `shift`.
///
/// While both keys share a chunk, a single-child bridging node is emitted for
/// that chunk. Where the chunks diverge, a two-slot node holds both leaves in
/// ascending chunk order. If the keys are exhausted before diverging, the two
/// are a full-width collision and end the chain in a bucket.
pub(crate) fn synthesize<T: Element + Clone>(
    shift: u32,
    existing_key: HashKey,
    existing: Leaf<T>,
    key: HashKey,
    element: T,
) -> Slot<T> {
    let mut shared: ArrayVec<u32, MAX_DEPTH> = ArrayVec::new();
    let mut shift = shift;
    let mut existing_chunk = bits::chunk(existing_key, shift);
    let mut new_chunk = bits::chunk(key, shift);

    let tail = loop {
        if existing_chunk != new_chunk {
            let node = Node::pair(existing_chunk, existing.into_slot(), new_chunk, Slot::Element(element));
            break Slot::Branch(ReferenceCounter::new(node));
        }
        if shift >= KEY_WIDTH || shared.is_full() {
            tracing::trace!(key, "hash key exhausted");
            break exhausted(key, existing, element);
        }
        shared.push(existing_chunk);
        shift += CHUNK_BITS;
        existing_chunk = bits::chunk(existing_key, shift);
        new_chunk = bits::chunk(key, shift);
    };

    if !shared.is_empty() {
        tracing::trace!(depth = shared.len(), "bridging chain synthesized");
    }

    shared
        .iter()
        .rev()
        .fold(tail, |inner, &chunk| Slot::Branch(ReferenceCounter::new(Node::bridge(chunk, inner))))
}

fn exhausted<T: Element + Clone>(key: HashKey, existing: Leaf<T>, element: T) -> Slot<T> {
    let bucket = match existing {
        Leaf::Element(existing) => Bucket::pair(key, existing, element),
        Leaf::Collision(bucket) => bucket.with(element).0,
    };
    Slot::Collision(ReferenceCounter::new(bucket))
}
