/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! An intrusive family of ordered search-tree containers.
//!
//! # Architecture
//!
//! All trees share one convention: entries live in a caller-owned
//! [`Arena`], embed a per-tree header, and are addressed by [`NodeIndex`].
//! The trees themselves hold nothing but a root link and option-derived
//! state; every operation borrows the arena. Removing an entry unlinks it
//! without freeing its slot, and payloads never move between positions.
//!
//! - [`RbTree`]: the red-black ordered-set substrate — O(log n) insert,
//!   hinted insert, remove, lookups, in-order iteration, and (with the
//!   `MULTIPLE` option) an equality chain threading duplicate keys.
//! - [`EnergyTree`]: a weight-balanced multiset with no rotations;
//!   structural work charges per-node energy counters, and overcharged
//!   subtrees are rebuilt in place into complete trees, giving O(log n)
//!   amortized updates.
//! - [`IntervalTree`]: a red-black tree of half-open intervals augmented
//!   with a per-node `max_upper` bound, supporting lazy overlap queries.
//! - [`DynSegTree`]: the dynamic-segment-tree adapter, lowering intervals
//!   to point events in an ordered core.
//! - [`zip`]: the zip-tree node contract and rank machinery.
//!
//! Per-tree behaviour (duplicates, O(1) size, colour compression, zip
//! ranks) is fixed at compile time by a [`TreeOptions`] bundle carried by
//! the entry type; [`DefaultOptions`] is the stock bundle.
//!
//! # Example
//!
//! ```
//! use search_tree_rs::{Arena, DefaultOptions, KeyedEntry, RbEntry, RbHead, RbTree};
//!
//! struct Item {
//!     key: u64,
//!     head: RbHead<DefaultOptions>,
//! }
//!
//! impl Item {
//!     fn new(key: u64) -> Self {
//!         Self { key, head: RbHead::new() }
//!     }
//! }
//!
//! impl RbEntry for Item {
//!     type Options = DefaultOptions;
//!
//!     fn rb_head(&self) -> &RbHead<DefaultOptions> {
//!         &self.head
//!     }
//!
//!     fn rb_head_mut(&mut self) -> &mut RbHead<DefaultOptions> {
//!         &mut self.head
//!     }
//! }
//!
//! impl KeyedEntry for Item {
//!     type Key = u64;
//!
//!     fn key(&self) -> &u64 {
//!         &self.key
//!     }
//! }
//!
//! let mut arena = Arena::new();
//! let mut tree = RbTree::<Item>::new();
//! for key in [3, 1, 2] {
//!     let node = arena.insert(Item::new(key));
//!     tree.insert(&mut arena, node);
//! }
//!
//! let keys: Vec<u64> = tree.iter(&arena).map(|(_, item)| item.key).collect();
//! assert_eq!(keys, [1, 2, 3]);
//!
//! let two = tree.find(&arena, &2).unwrap();
//! tree.remove(&mut arena, two);
//! assert_eq!(tree.size(), Some(2));
//! assert!(tree.verify_integrity(&arena));
//! ```

mod arena;
mod compare;
pub mod debug;
mod dst;
mod energy;
mod interval;
mod iter;
mod node;
mod options;
mod rbtree;
mod traits;
pub mod zip;

pub use arena::{Arena, Link, NodeIndex};
pub use compare::{KeyCompare, KeyedEntry, LookupCompare, TreeCompare};
pub use dst::{DstHandle, DynSegTree, EventKind, OnRbTree, OnZipTree, SegTreeBase};
pub use energy::{EnergyEntry, EnergyHead, EnergyLinks, EnergyTree};
pub use interval::{
    IntervalCompare, IntervalEntry, IntervalHead, IntervalTraits, IntervalTree, OverlapIter,
    QueryBounds,
};
pub use iter::{Direction, Forward, InOrderIter, LinkView, RbLinks, Reverse};
pub use node::{Color, RbEntry, RbHead};
pub use options::{
    ColorField, ColorInParent, CountedSize, DefaultOptions, EqChainStorage, EqDisabled, EqLinks,
    HashedRank, ParentColorStorage, RankValue, SizeCountStorage, StoredRank, TreeOptions,
    UncountedSize, ZipRankStorage,
};
pub use rbtree::RbTree;
pub use traits::{DefaultNodeTraits, NodeTraits};
pub use zip::{ZipEntry, ZipHead};
