/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! The red-black tree core.
//!
//! This module contains the ordered-set substrate the rest of the crate
//! builds on. The implementation is split into sub-modules by concern:
//!
//! - `insert`: biased leaf insertion, hinted insertion, insertion fix-up
//! - `remove`: successor swap, lone-child promotion, deletion fix-up
//! - `find`: lookups (`find`, `upper_bound`)
//! - `equality`: the duplicate equality chain
//! - `invariants`: `verify_integrity` sub-checks
//!
//! The tree object itself is tiny — a root link plus the option-selected
//! size counter. All node state lives in headers embedded in caller-owned
//! entries (see [`RbEntry`]); every operation borrows the [`Arena`].

mod equality;
mod find;
mod insert;
mod invariants;
mod remove;

use std::marker::PhantomData;

use crate::arena::{Arena, Link, NodeIndex};
use crate::compare::{KeyCompare, TreeCompare};
use crate::iter::{Forward, InOrderIter, RbLinks, Reverse, leftmost, rightmost};
use crate::node::{Color, RbEntry};
use crate::options::{SizeCountStorage, TreeOptions};
use crate::traits::{DefaultNodeTraits, NodeTraits};

pub(crate) use equality::{chain_find_first, chain_next, chain_prev};

/// Shorthand for the option bundle of an entry type.
type OptionsOf<T> = <T as RbEntry>::Options;

pub(crate) fn left_of<T: RbEntry>(arena: &Arena<T>, n: NodeIndex) -> Link {
    arena[n].rb_head().left()
}

pub(crate) fn right_of<T: RbEntry>(arena: &Arena<T>, n: NodeIndex) -> Link {
    arena[n].rb_head().right()
}

pub(crate) fn parent_of<T: RbEntry>(arena: &Arena<T>, n: NodeIndex) -> Link {
    arena[n].rb_head().parent()
}

pub(crate) fn color_of<T: RbEntry>(arena: &Arena<T>, n: NodeIndex) -> Color {
    arena[n].rb_head().color()
}

/// Null links count as black.
pub(crate) fn is_black<T: RbEntry>(arena: &Arena<T>, link: Link) -> bool {
    link.is_none_or(|n| color_of(arena, n) == Color::Black)
}

pub(crate) fn set_left<T: RbEntry>(arena: &mut Arena<T>, n: NodeIndex, link: Link) {
    arena[n].rb_head_mut().set_left(link);
}

pub(crate) fn set_right<T: RbEntry>(arena: &mut Arena<T>, n: NodeIndex, link: Link) {
    arena[n].rb_head_mut().set_right(link);
}

pub(crate) fn set_parent<T: RbEntry>(arena: &mut Arena<T>, n: NodeIndex, link: Link) {
    arena[n].rb_head_mut().set_parent(link);
}

pub(crate) fn set_color<T: RbEntry>(arena: &mut Arena<T>, n: NodeIndex, color: Color) {
    arena[n].rb_head_mut().set_color(color);
}

/// An intrusive red-black tree over entries stored in an [`Arena`].
///
/// `C` is the ordering (a [`TreeCompare`] zero-sized type, by default
/// [`KeyCompare`]); `NT` is the [`NodeTraits`] hook set augmented trees
/// install.
///
/// Structural operations are O(log n) worst-case. Entries are linked and
/// unlinked in place — the tree never copies, moves, or drops an entry.
///
/// # Contract
///
/// Inserting an entry that is already linked into a tree, or removing one
/// that is not linked into *this* tree, leaves the tree in an unspecified
/// state. Debug builds catch the cheap-to-detect cases.
pub struct RbTree<T: RbEntry, C = KeyCompare, NT = DefaultNodeTraits> {
    root: Link,
    size: <OptionsOf<T> as TreeOptions>::SizeCount,
    _marker: PhantomData<(C, NT)>,
}

impl<T: RbEntry, C, NT> RbTree<T, C, NT> {
    /// An empty tree.
    pub fn new() -> Self {
        Self {
            root: None,
            size: Default::default(),
            _marker: PhantomData,
        }
    }

    /// The root node, if any. Mostly useful for debug rendering.
    pub fn root(&self) -> Link {
        self.root
    }

    /// Whether the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of linked entries, or `None` unless the option bundle enables
    /// `CONSTANT_TIME_SIZE`.
    pub fn size(&self) -> Option<usize> {
        self.size.value()
    }

    /// Unlink everything at once.
    ///
    /// Entries stay in the arena; their headers keep whatever stale links
    /// they had and must be treated as unlinked.
    pub fn clear(&mut self) {
        self.root = None;
        self.size.reset();
    }

    /// The in-order first entry.
    pub fn first(&self, arena: &Arena<T>) -> Link {
        self.root.map(|r| leftmost::<T, RbLinks>(arena, r))
    }

    /// The in-order last entry.
    pub fn last(&self, arena: &Arena<T>) -> Link {
        self.root.map(|r| rightmost::<T, RbLinks>(arena, r))
    }

    /// In-order ascending traversal.
    pub fn iter<'a>(&self, arena: &'a Arena<T>) -> InOrderIter<'a, T, RbLinks, Forward> {
        InOrderIter::new(arena, self.root)
    }

    /// In-order descending traversal.
    pub fn iter_rev<'a>(&self, arena: &'a Arena<T>) -> InOrderIter<'a, T, RbLinks, Reverse> {
        InOrderIter::new(arena, self.root)
    }

    /// Ascending traversal starting at (and including) a linked entry.
    pub fn iter_from<'a>(
        &self,
        arena: &'a Arena<T>,
        node: NodeIndex,
    ) -> InOrderIter<'a, T, RbLinks, Forward> {
        InOrderIter::from_node(arena, node)
    }

    /// First entry of the equality chain `node` belongs to.
    ///
    /// With duplicates disabled this is `node` itself.
    pub fn equal_first(&self, arena: &Arena<T>, node: NodeIndex) -> NodeIndex {
        chain_find_first(arena, node)
    }

    /// Next entry in `node`'s equality chain, oldest-to-newest for
    /// left-biased insertion.
    pub fn equal_next(&self, arena: &Arena<T>, node: NodeIndex) -> Link {
        chain_next(arena, node)
    }

    /// Previous entry in `node`'s equality chain.
    pub fn equal_prev(&self, arena: &Arena<T>, node: NodeIndex) -> Link {
        chain_prev(arena, node)
    }
}

impl<T, C, NT> RbTree<T, C, NT>
where
    T: RbEntry,
    C: TreeCompare<T>,
    NT: NodeTraits<T>,
{
    /// Whether `a` comes before `b` in tree order.
    ///
    /// For entries that compare unequal this is just the comparator. For
    /// equal entries the equality chain decides; this requires the
    /// `ORDER_QUERIES` option and costs time linear in the equality run.
    pub fn ordered_before(&self, arena: &Arena<T>, a: NodeIndex, b: NodeIndex) -> bool {
        if C::less(&arena[a], &arena[b]) {
            return true;
        }
        if C::less(&arena[b], &arena[a]) {
            return false;
        }
        debug_assert!(
            OptionsOf::<T>::ORDER_QUERIES,
            "order-between query on equal entries without ORDER_QUERIES"
        );
        // Within an equal run, walking `next` moves earlier in tree order,
        // so `a` precedes `b` in the tree iff `b` is reachable via `prev`.
        let mut cur = chain_prev(arena, a);
        while let Some(n) = cur {
            if n == b {
                return true;
            }
            cur = chain_prev(arena, n);
        }
        false
    }

    /// Rotate `parent` left: its right child takes its position, `parent`
    /// becomes that child's left child. Fires the `rotated_left` hook after
    /// re-linking.
    pub(crate) fn rotate_left(&mut self, arena: &mut Arena<T>, parent: NodeIndex) {
        let Some(right_child) = right_of(arena, parent) else {
            debug_assert!(false, "rotate_left without a right child");
            return;
        };

        set_right(arena, parent, left_of(arena, right_child));
        if let Some(inner) = left_of(arena, right_child) {
            set_parent(arena, inner, Some(parent));
        }

        set_left(arena, right_child, Some(parent));
        let above = parent_of(arena, parent);
        set_parent(arena, right_child, above);

        match above {
            Some(p) => {
                if left_of(arena, p) == Some(parent) {
                    set_left(arena, p, Some(right_child));
                } else {
                    set_right(arena, p, Some(right_child));
                }
            }
            None => self.root = Some(right_child),
        }

        set_parent(arena, parent, Some(right_child));

        NT::rotated_left(arena, parent);
    }

    /// Mirror image of [`rotate_left`](Self::rotate_left).
    pub(crate) fn rotate_right(&mut self, arena: &mut Arena<T>, parent: NodeIndex) {
        let Some(left_child) = left_of(arena, parent) else {
            debug_assert!(false, "rotate_right without a left child");
            return;
        };

        set_left(arena, parent, right_of(arena, left_child));
        if let Some(inner) = right_of(arena, left_child) {
            set_parent(arena, inner, Some(parent));
        }

        set_right(arena, left_child, Some(parent));
        let above = parent_of(arena, parent);
        set_parent(arena, left_child, above);

        match above {
            Some(p) => {
                if left_of(arena, p) == Some(parent) {
                    set_left(arena, p, Some(left_child));
                } else {
                    set_right(arena, p, Some(left_child));
                }
            }
            None => self.root = Some(left_child),
        }

        set_parent(arena, parent, Some(left_child));

        NT::rotated_right(arena, parent);
    }
}

impl<T: RbEntry, C, NT> Default for RbTree<T, C, NT> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RbEntry, C, NT> std::fmt::Debug for RbTree<T, C, NT> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RbTree")
            .field("root", &self.root)
            .field("size", &self.size.value())
            .finish()
    }
}
