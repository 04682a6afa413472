//! Scratch mesh used during one hull construction.
//!
//! Purpose
//! - Arena of facets and ridges addressed by integer handles (`FacetId`,
//!   `RidgeId`) instead of a pointer graph with back-references.
//! - Ridges are found by `SimplexKey` (sorted vertex indices folded into one
//!   integer), so two facets that build "the same" ridge independently during a
//!   cone rebuild meet in the same record.
//! - `IndexedHeap` orders live facets by peak distance and supports removal of
//!   arbitrary facets, not only the top.
//!
//! Ridge records are write-once: `owned` and `other` are each set at most once.
//! Deleting a facet retires its ridges; a surviving neighbour gets a fresh
//! half-linked ridge that the replacing facet then completes.

mod heap;
mod key;
mod types;

pub(crate) use heap::IndexedHeap;
pub use key::SimplexKey;
pub(crate) use types::{FacetId, Mesh, RidgeId};
