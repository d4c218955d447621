/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Zip-tree scaffolding: the node header and the rank machinery.
//!
//! A zip tree keeps itself balanced by giving every node a geometrically
//! distributed *rank*. Only the shared node contract lives here — the
//! header, the entry trait, and rank derivation honouring the zip options:
//!
//! - with `ZTREE_USE_HASH`, the rank is the trailing-zero count of the
//!   entry's hash, optionally universalized as `h = (x · k) mod m` when
//!   both `ZTREE_RANK_HASH_UNIVERSALIZE_COEFFICIENT` and `…_MODUL` are set;
//! - otherwise the rank is read from the stored field selected by the
//!   bundle's [`ZipRankStorage`] choice.

use std::hash::{DefaultHasher, Hash, Hasher};

use crate::arena::Link;
use crate::options::{TreeOptions, ZipRankStorage};

/// The embedded zip-tree header: three structural links plus the
/// option-selected rank storage (zero-sized for hash-derived ranks).
pub struct ZipHead<O: TreeOptions> {
    left: Link,
    right: Link,
    parent: Link,
    rank: O::ZipRank,
}

impl<O: TreeOptions> ZipHead<O> {
    /// An unlinked head.
    pub fn new() -> Self {
        Self {
            left: None,
            right: None,
            parent: None,
            rank: O::ZipRank::default(),
        }
    }

    /// Left child.
    pub fn left(&self) -> Link {
        self.left
    }

    /// Right child.
    pub fn right(&self) -> Link {
        self.right
    }

    /// Parent.
    pub fn parent(&self) -> Link {
        self.parent
    }

    /// Store a rank. No-op unless the bundle stores ranks in nodes.
    pub fn set_rank(&mut self, rank: u64) {
        self.rank.set(rank);
    }
}

impl<O: TreeOptions> Default for ZipHead<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: TreeOptions> std::fmt::Debug for ZipHead<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipHead")
            .field("left", &self.left)
            .field("right", &self.right)
            .field("parent", &self.parent)
            .field("rank", &self.rank)
            .finish()
    }
}

/// An entry that embeds a [`ZipHead`].
pub trait ZipEntry {
    /// Option bundle selecting the rank source.
    type Options: TreeOptions;

    /// The embedded header.
    fn zip_head(&self) -> &ZipHead<Self::Options>;
    /// The embedded header, mutably.
    fn zip_head_mut(&mut self) -> &mut ZipHead<Self::Options>;
}

/// Universalize a hash value as `(x · k) mod m` when the bundle sets both
/// constants; pass it through otherwise.
fn universalize<O: TreeOptions>(hash: u64) -> u64 {
    match (
        O::ZTREE_RANK_HASH_UNIVERSALIZE_COEFFICIENT,
        O::ZTREE_RANK_HASH_UNIVERSALIZE_MODUL,
    ) {
        (Some(coefficient), Some(modul)) => hash.wrapping_mul(coefficient) % modul,
        _ => hash,
    }
}

/// Derive a rank from an entry's hash: the trailing-zero count of the
/// (optionally universalized) hash, which is geometrically distributed for
/// well-mixed hashes.
pub fn hash_rank<O: TreeOptions, T: Hash>(entry: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    entry.hash(&mut hasher);
    universalize::<O>(hasher.finish()).trailing_zeros() as u64
}

/// The rank of a linked entry, from whichever source the bundle selects.
///
/// Bundles that neither hash nor store ranks are invalid for zip trees;
/// debug builds catch that here.
pub fn node_rank<T>(entry: &T) -> u64
where
    T: ZipEntry + Hash,
{
    debug_assert!(
        T::Options::ZTREE_USE_HASH
            || <<T::Options as TreeOptions>::ZipRank as ZipRankStorage>::STORED,
        "zip ranks need ZTREE_USE_HASH or a stored rank type"
    );
    if T::Options::ZTREE_USE_HASH {
        hash_rank::<T::Options, T>(entry)
    } else {
        entry.zip_head().rank.get()
    }
}
