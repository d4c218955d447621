/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Compile-time tree options.
//!
//! Every tree in this crate is parameterized (through its entry type) by a
//! [`TreeOptions`] bundle. An option bundle is a zero-sized type choosing a
//! storage representation for each optional node feature:
//!
//! - equality-chain links ([`EqLinks`] / [`EqDisabled`]) — whether equal-key
//!   duplicates are admitted,
//! - parent/colour representation ([`ColorField`] / [`ColorInParent`]) —
//!   whether the red-black colour is packed into the parent word,
//! - a tree-level size counter ([`CountedSize`] / [`UncountedSize`]),
//! - zip-tree rank storage ([`HashedRank`] / [`StoredRank`]).
//!
//! The derived consts (`MULTIPLE`, `CONSTANT_TIME_SIZE`, `COMPRESS_COLOR`)
//! follow from the chosen storage types, so a bundle cannot disagree with
//! its own field layout. Everything is resolved at monomorphization time;
//! disabled features compile down to zero-sized fields and no-op accessors.

use std::fmt;

use crate::arena::{Link, NodeIndex};
use crate::node::Color;

/// Storage for a node's parent link and red-black colour.
///
/// Implementations either keep the colour in a separate field
/// ([`ColorField`]) or pack it into the low bit of the parent word
/// ([`ColorInParent`]).
pub trait ParentColorStorage: Copy + fmt::Debug + Default {
    /// Whether the colour shares a word with the parent link.
    const PACKED: bool;

    /// The parent link.
    fn parent(&self) -> Link;
    /// Set the parent link, preserving the colour.
    fn set_parent(&mut self, parent: Link);
    /// The node's colour.
    fn color(&self) -> Color;
    /// Set the colour, preserving the parent link.
    fn set_color(&mut self, color: Color);
}

/// Parent link and colour kept in separate fields.
#[derive(Clone, Copy, Debug)]
pub struct ColorField {
    parent: Link,
    color: Color,
}

impl Default for ColorField {
    fn default() -> Self {
        Self {
            parent: None,
            color: Color::Red,
        }
    }
}

impl ParentColorStorage for ColorField {
    const PACKED: bool = false;

    fn parent(&self) -> Link {
        self.parent
    }

    fn set_parent(&mut self, parent: Link) {
        self.parent = parent;
    }

    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

/// Colour packed into bit 0 of the parent word.
///
/// The index-based analog of the colour-in-pointer trick: bit 0 holds the
/// colour (0 = red, 1 = black) and the remaining 31 bits hold the parent
/// index biased by one, so the all-zero word is "no parent, red". Limits the
/// arena to `2^31 - 2` entries for trees using this representation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColorInParent {
    bits: u32,
}

impl ColorInParent {
    const COLOR_BIT: u32 = 1;
}

impl ParentColorStorage for ColorInParent {
    const PACKED: bool = true;

    fn parent(&self) -> Link {
        let biased = self.bits >> 1;
        if biased == 0 {
            None
        } else {
            Some(NodeIndex::from(biased - 1))
        }
    }

    fn set_parent(&mut self, parent: Link) {
        let biased = match parent {
            None => 0,
            Some(idx) => {
                let raw = u32::from(idx);
                debug_assert!(raw < u32::MAX >> 1, "node index too large for packed colour");
                raw + 1
            }
        };
        self.bits = (biased << 1) | (self.bits & Self::COLOR_BIT);
    }

    fn color(&self) -> Color {
        if self.bits & Self::COLOR_BIT == 0 {
            Color::Red
        } else {
            Color::Black
        }
    }

    fn set_color(&mut self, color: Color) {
        match color {
            Color::Red => self.bits &= !Self::COLOR_BIT,
            Color::Black => self.bits |= Self::COLOR_BIT,
        }
    }
}

/// Storage for the equality-chain links threading equal-key duplicates.
pub trait EqChainStorage: Copy + fmt::Debug + Default {
    /// Whether duplicate keys are admitted at all.
    const ENABLED: bool;

    /// Previous chain neighbour.
    fn prev(&self) -> Link;
    /// Set the previous chain neighbour.
    fn set_prev(&mut self, prev: Link);
    /// Next chain neighbour.
    fn next(&self) -> Link;
    /// Set the next chain neighbour.
    fn set_next(&mut self, next: Link);
}

/// Doubly-linked equality-chain links.
#[derive(Clone, Copy, Debug, Default)]
pub struct EqLinks {
    prev: Link,
    next: Link,
}

impl EqChainStorage for EqLinks {
    const ENABLED: bool = true;

    fn prev(&self) -> Link {
        self.prev
    }

    fn set_prev(&mut self, prev: Link) {
        self.prev = prev;
    }

    fn next(&self) -> Link {
        self.next
    }

    fn set_next(&mut self, next: Link) {
        self.next = next;
    }
}

/// Zero-sized stand-in when duplicates are disabled. All chain operations
/// compile to no-ops.
#[derive(Clone, Copy, Debug, Default)]
pub struct EqDisabled;

impl EqChainStorage for EqDisabled {
    const ENABLED: bool = false;

    fn prev(&self) -> Link {
        None
    }

    fn set_prev(&mut self, _prev: Link) {}

    fn next(&self) -> Link {
        None
    }

    fn set_next(&mut self, _next: Link) {}
}

/// Storage for the tree-level entry counter.
pub trait SizeCountStorage: Copy + fmt::Debug + Default {
    /// Whether a counter is maintained.
    const ENABLED: bool;

    /// Record one insertion.
    fn increment(&mut self);
    /// Record one removal.
    fn decrement(&mut self);
    /// Current count, or `None` when disabled.
    fn value(&self) -> Option<usize>;
    /// Reset to zero.
    fn reset(&mut self);
}

/// A maintained entry counter; `size()` answers in O(1).
#[derive(Clone, Copy, Debug, Default)]
pub struct CountedSize(usize);

impl SizeCountStorage for CountedSize {
    const ENABLED: bool = true;

    fn increment(&mut self) {
        self.0 += 1;
    }

    fn decrement(&mut self) {
        debug_assert!(self.0 > 0, "size counter underflow");
        self.0 = self.0.saturating_sub(1);
    }

    fn value(&self) -> Option<usize> {
        Some(self.0)
    }

    fn reset(&mut self) {
        self.0 = 0;
    }
}

/// Zero-sized stand-in when no counter is kept.
#[derive(Clone, Copy, Debug, Default)]
pub struct UncountedSize;

impl SizeCountStorage for UncountedSize {
    const ENABLED: bool = false;

    fn increment(&mut self) {}

    fn decrement(&mut self) {}

    fn value(&self) -> Option<usize> {
        None
    }

    fn reset(&mut self) {}
}

/// Integer types usable as stored zip-tree ranks.
pub trait RankValue: Copy + fmt::Debug + Default {
    /// Widen to the common rank width.
    fn to_u64(self) -> u64;
    /// Narrow from the common rank width, truncating.
    fn from_u64(value: u64) -> Self;
}

macro_rules! impl_rank_value {
    ($($ty:ty),*) => {
        $(impl RankValue for $ty {
            fn to_u64(self) -> u64 {
                self as u64
            }

            fn from_u64(value: u64) -> Self {
                value as $ty
            }
        })*
    };
}

impl_rank_value!(u8, u16, u32, u64);

/// Storage for a zip-tree node's rank.
pub trait ZipRankStorage: Copy + fmt::Debug + Default {
    /// Whether the rank is materialized in the node (as opposed to being
    /// recomputed from a hash on demand).
    const STORED: bool;

    /// The stored rank. Meaningless unless [`Self::STORED`].
    fn get(&self) -> u64;
    /// Store a rank. No-op unless [`Self::STORED`].
    fn set(&mut self, rank: u64);
}

/// Rank derived from the entry's hash on demand; nothing stored.
#[derive(Clone, Copy, Debug, Default)]
pub struct HashedRank;

impl ZipRankStorage for HashedRank {
    const STORED: bool = false;

    fn get(&self) -> u64 {
        0
    }

    fn set(&mut self, _rank: u64) {}
}

/// Rank materialized in the node at width `R`. `u8` is usually plenty.
#[derive(Clone, Copy, Debug, Default)]
pub struct StoredRank<R: RankValue>(R);

impl<R: RankValue> ZipRankStorage for StoredRank<R> {
    const STORED: bool = true;

    fn get(&self) -> u64 {
        self.0.to_u64()
    }

    fn set(&mut self, rank: u64) {
        self.0 = R::from_u64(rank);
    }
}

/// A compile-time option bundle for the trees in this crate.
///
/// Implementors are zero-sized marker types; the associated storage types
/// select the node layout, and the associated consts either derive from
/// those choices or carry standalone toggles. See [`DefaultOptions`] for the
/// stock bundle.
pub trait TreeOptions: 'static {
    /// Parent/colour representation for red-black heads.
    type ParentColor: ParentColorStorage;
    /// Equality-chain representation; [`EqDisabled`] refuses duplicates.
    type EqChain: EqChainStorage;
    /// Tree-level size counter representation.
    type SizeCount: SizeCountStorage;
    /// Zip-tree rank representation.
    type ZipRank: ZipRankStorage;

    /// Whether equal-key duplicates are admitted. Derived from
    /// [`Self::EqChain`].
    const MULTIPLE: bool = <Self::EqChain as EqChainStorage>::ENABLED;

    /// Whether `size()` answers in O(1). Derived from [`Self::SizeCount`].
    const CONSTANT_TIME_SIZE: bool = <Self::SizeCount as SizeCountStorage>::ENABLED;

    /// Whether the red-black colour shares a word with the parent link.
    /// Derived from [`Self::ParentColor`].
    const COMPRESS_COLOR: bool = <Self::ParentColor as ParentColorStorage>::PACKED;

    /// Whether order-between queries over the equality chain are supported.
    /// Only meaningful together with `MULTIPLE`.
    const ORDER_QUERIES: bool = false;

    /// Whether zip-tree ranks are derived from the entry's hash.
    const ZTREE_USE_HASH: bool = false;

    /// Universal-hashing coefficient for rank derivation. Active only when
    /// the modul is also set.
    const ZTREE_RANK_HASH_UNIVERSALIZE_COEFFICIENT: Option<u64> = None;

    /// Universal-hashing modul for rank derivation. Active only when the
    /// coefficient is also set.
    const ZTREE_RANK_HASH_UNIVERSALIZE_MODUL: Option<u64> = None;
}

/// The stock bundle: duplicates admitted, O(1) size, separate colour field,
/// hash-derived zip ranks.
#[derive(Debug)]
pub struct DefaultOptions;

impl TreeOptions for DefaultOptions {
    type ParentColor = ColorField;
    type EqChain = EqLinks;
    type SizeCount = CountedSize;
    type ZipRank = HashedRank;

    const ZTREE_USE_HASH: bool = true;
}
