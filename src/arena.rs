/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Arena storage for tree entries.
//!
//! Trees in this crate are intrusive: they never own entry storage. The
//! caller keeps all entries in an [`Arena`] and hands trees a [`NodeIndex`]
//! per operation. Removing an entry from a tree does *not* free its arena
//! slot; the entry merely transitions back to the unlinked state and can be
//! re-inserted or dropped from the arena at the caller's leisure.

use std::ops::{Index, IndexMut};

use slab::Slab;

/// Index into an [`Arena`].
///
/// A lightweight handle (single `u32`) that is stable across mutations to
/// other slots. Trees store these instead of pointers; an absent link is
/// `Option::<NodeIndex>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct NodeIndex(u32);

impl NodeIndex {
    /// Convert to a `usize` key for indexing into the underlying slab.
    const fn key(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for NodeIndex {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<NodeIndex> for u32 {
    fn from(idx: NodeIndex) -> Self {
        idx.0
    }
}

/// An absent structural link.
pub type Link = Option<NodeIndex>;

/// Caller-owned storage for tree entries.
///
/// A newtype wrapper around [`Slab<T>`] that provides type-safe indexing via
/// [`NodeIndex`] instead of raw `usize`. All trees borrow the arena for the
/// duration of each operation; none of them ever allocates or frees entries.
///
/// # Examples
///
/// ```
/// use search_tree_rs::Arena;
///
/// let mut arena = Arena::new();
/// let a = arena.insert("hello");
/// let b = arena.insert("world");
///
/// assert_eq!(arena[a], "hello");
/// assert_eq!(arena[b], "world");
/// assert_eq!(arena.len(), 2);
/// ```
#[derive(Debug)]
pub struct Arena<T> {
    slots: Slab<T>,
}

impl<T> Arena<T> {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self { slots: Slab::new() }
    }

    /// Create a new arena with room for `capacity` entries before
    /// reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Slab::with_capacity(capacity),
        }
    }

    /// Number of entries currently stored.
    ///
    /// Not to be confused with the current _capacity_ of the arena, i.e.
    /// the size of the underlying allocation.
    pub fn len(&self) -> u32 {
        // Safe to truncate because `Self::insert` ensures that the arena
        // never grows beyond `u32::MAX`.
        self.slots.len() as u32
    }

    /// Whether the arena holds no entries.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Maximum number of entries the arena can store without reallocating.
    pub fn capacity(&self) -> u32 {
        self.slots.capacity() as u32
    }

    /// Store an entry, returning its index.
    ///
    /// # Panics
    ///
    /// Panics if the arena already holds `u32::MAX` entries.
    pub fn insert(&mut self, entry: T) -> NodeIndex {
        let key = self.slots.insert(entry);
        assert!(
            key <= u32::MAX as usize,
            "Tried to store more than {} entries in the arena",
            u32::MAX
        );
        NodeIndex(key as u32)
    }

    /// Remove an entry, returning it.
    ///
    /// The entry must be unlinked from every tree first; the arena has no
    /// way of checking that.
    ///
    /// # Panics
    ///
    /// Panics if the index is vacant.
    pub fn remove(&mut self, idx: NodeIndex) -> T {
        self.slots.remove(idx.key())
    }

    /// Get a reference to an entry, or `None` if the slot is vacant.
    pub fn get(&self, idx: NodeIndex) -> Option<&T> {
        self.slots.get(idx.key())
    }

    /// Get a mutable reference to an entry, or `None` if the slot is vacant.
    pub fn get_mut(&mut self, idx: NodeIndex) -> Option<&mut T> {
        self.slots.get_mut(idx.key())
    }

    /// Whether `idx` refers to an occupied slot.
    pub fn contains(&self, idx: NodeIndex) -> bool {
        self.slots.contains(idx.key())
    }

    /// Iterate over all entries in the arena, in slot order.
    ///
    /// Yields `(NodeIndex, &T)` pairs. This walks the storage, not any tree;
    /// it is what integrity checks use to cover every entry regardless of
    /// link state.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &T)> {
        self.slots.iter().map(|(key, entry)| (NodeIndex(key as u32), entry))
    }

    /// Drop every entry and reset the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<NodeIndex> for Arena<T> {
    type Output = T;

    fn index(&self, idx: NodeIndex) -> &Self::Output {
        &self.slots[idx.key()]
    }
}

impl<T> IndexMut<NodeIndex> for Arena<T> {
    fn index_mut(&mut self, idx: NodeIndex) -> &mut Self::Output {
        &mut self.slots[idx.key()]
    }
}
