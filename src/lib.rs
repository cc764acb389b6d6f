//! # persistent-hamt
//!
//! Immutable, structurally shared Hash Array Mapped Tries.
//!
//! ## Overview
//!
//! Every update returns a new root and leaves the old one valid, sharing all
//! untouched subtrees between the two. Any number of versions can be held
//! at once, and with the default `arc` feature they can be read from many
//! threads without synchronization.
//!
//! - **Engine**: [`hamt::Hamt`], generic over any [`hamt::Element`]
//! - **Collections**: array, set, string set and string map adapters in
//!   [`collections`]
//!
//! ## Feature Flags
//!
//! - `arc` (default): share subtrees through `Arc`; without it `Rc` is used
//! - `fxhash` / `ahash`: hasher behind [`collections::Hashed`]
//! - `serde`: `Serialize` / `Deserialize` for every collection
//!
//! ## Example
//!
//! ```rust
//! use persistent_hamt::prelude::*;
//!
//! let colors = StrMap::new().insert("red", 0xFF0000).insert("green", 0x00FF00);
//! let fewer = colors.remove("red");
//!
//! assert_eq!(colors.len(), 2);
//! assert_eq!(fewer.get("green"), Some(&0x00FF00));
//! assert!(!fewer.contains_key("red"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// ```rust
/// use persistent_hamt::prelude::*;
/// ```
pub mod prelude {
    pub use crate::collections::{
        Hashed, PersistentArray, PersistentSet, StrKeyValue, StrMap, StrSet, StrValue,
    };
    pub use crate::hamt::{Element, Hamt, HashKey, Probe};
}

pub mod collections;
pub mod hamt;
