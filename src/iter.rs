/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! In-order traversal.
//!
//! One stepping engine serves every tree in the crate. Which header the
//! links come from is chosen by a [`LinkView`] accessor type, and the
//! traversal direction by a zero-sized [`Direction`] tag with two `step`
//! implementations — [`Forward`] and [`Reverse`].

use std::marker::PhantomData;

use crate::arena::{Arena, Link, NodeIndex};
use crate::node::RbEntry;

/// Access to an entry's structural links, independent of which header they
/// live in.
pub trait LinkView<T> {
    /// Left child.
    fn left(entry: &T) -> Link;
    /// Right child.
    fn right(entry: &T) -> Link;
    /// Parent.
    fn parent(entry: &T) -> Link;
}

/// Links taken from the entry's [`RbHead`](crate::RbHead).
#[derive(Debug)]
pub struct RbLinks;

impl<T: RbEntry> LinkView<T> for RbLinks {
    fn left(entry: &T) -> Link {
        entry.rb_head().left()
    }

    fn right(entry: &T) -> Link {
        entry.rb_head().right()
    }

    fn parent(entry: &T) -> Link {
        entry.rb_head().parent()
    }
}

/// Descend to the in-order first node of the subtree rooted at `node`.
pub(crate) fn leftmost<T, V: LinkView<T>>(arena: &Arena<T>, node: NodeIndex) -> NodeIndex {
    let mut cur = node;
    while let Some(l) = V::left(&arena[cur]) {
        cur = l;
    }
    cur
}

/// Descend to the in-order last node of the subtree rooted at `node`.
pub(crate) fn rightmost<T, V: LinkView<T>>(arena: &Arena<T>, node: NodeIndex) -> NodeIndex {
    let mut cur = node;
    while let Some(r) = V::right(&arena[cur]) {
        cur = r;
    }
    cur
}

/// In-order successor, or `None` at the last node.
pub(crate) fn step_forward<T, V: LinkView<T>>(arena: &Arena<T>, node: NodeIndex) -> Link {
    if let Some(right) = V::right(&arena[node]) {
        // Smallest node of the right subtree.
        return Some(leftmost::<T, V>(arena, right));
    }

    // Go up, skipping ancestors we entered from the right (already visited).
    let mut cur = node;
    while let Some(parent) = V::parent(&arena[cur]) {
        if V::right(&arena[parent]) != Some(cur) {
            return Some(parent);
        }
        cur = parent;
    }
    None
}

/// In-order predecessor, or `None` at the first node.
pub(crate) fn step_back<T, V: LinkView<T>>(arena: &Arena<T>, node: NodeIndex) -> Link {
    if let Some(left) = V::left(&arena[node]) {
        // Largest node of the left subtree.
        return Some(rightmost::<T, V>(arena, left));
    }

    let mut cur = node;
    while let Some(parent) = V::parent(&arena[cur]) {
        if V::left(&arena[parent]) != Some(cur) {
            return Some(parent);
        }
        cur = parent;
    }
    None
}

/// Traversal direction tag.
pub trait Direction {
    /// The node a full traversal starts at: the in-order first node for
    /// [`Forward`], the in-order last for [`Reverse`].
    fn descend<T, V: LinkView<T>>(arena: &Arena<T>, root: NodeIndex) -> NodeIndex;

    /// The next node in this direction.
    fn step<T, V: LinkView<T>>(arena: &Arena<T>, node: NodeIndex) -> Link;
}

/// In-order, ascending.
#[derive(Debug)]
pub struct Forward;

impl Direction for Forward {
    fn descend<T, V: LinkView<T>>(arena: &Arena<T>, root: NodeIndex) -> NodeIndex {
        leftmost::<T, V>(arena, root)
    }

    fn step<T, V: LinkView<T>>(arena: &Arena<T>, node: NodeIndex) -> Link {
        step_forward::<T, V>(arena, node)
    }
}

/// In-order, descending.
#[derive(Debug)]
pub struct Reverse;

impl Direction for Reverse {
    fn descend<T, V: LinkView<T>>(arena: &Arena<T>, root: NodeIndex) -> NodeIndex {
        rightmost::<T, V>(arena, root)
    }

    fn step<T, V: LinkView<T>>(arena: &Arena<T>, node: NodeIndex) -> Link {
        step_back::<T, V>(arena, node)
    }
}

/// In-order iterator over a tree, yielding `(NodeIndex, &T)`.
///
/// Borrows the arena immutably for its lifetime. Red-black iterators stay
/// valid across mutations that do not touch the remaining nodes; energy-tree
/// iterators must be reacquired after any operation that triggered a
/// rebuild.
pub struct InOrderIter<'a, T, V, D> {
    arena: &'a Arena<T>,
    cur: Link,
    _marker: PhantomData<(V, D)>,
}

impl<'a, T, V: LinkView<T>, D: Direction> InOrderIter<'a, T, V, D> {
    /// Full traversal of the tree rooted at `root`.
    pub(crate) fn new(arena: &'a Arena<T>, root: Link) -> Self {
        let cur = root.map(|r| D::descend::<T, V>(arena, r));
        Self {
            arena,
            cur,
            _marker: PhantomData,
        }
    }

    /// Traversal starting at (and including) `node`.
    pub(crate) fn from_node(arena: &'a Arena<T>, node: NodeIndex) -> Self {
        Self {
            arena,
            cur: Some(node),
            _marker: PhantomData,
        }
    }
}

impl<'a, T, V: LinkView<T>, D: Direction> Iterator for InOrderIter<'a, T, V, D> {
    type Item = (NodeIndex, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cur?;
        self.cur = D::step::<T, V>(self.arena, node);
        Some((node, &self.arena[node]))
    }
}

impl<T, V, D> std::fmt::Debug for InOrderIter<'_, T, V, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InOrderIter").field("cur", &self.cur).finish()
    }
}
