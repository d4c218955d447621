/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! The interval tree: a red-black tree of half-open intervals augmented
//! with a per-node `max_upper` bound.
//!
//! Intervals are ordered by lower endpoint, ties broken by upper endpoint.
//! Every node additionally stores the largest upper endpoint found anywhere
//! in its subtree. The bound is maintained through the red-black core's
//! structural hooks ([`IntervalTraits`]) and is what lets
//! [`IntervalTree::query`] prune entire subtrees that cannot contain an
//! overlapping interval.
//!
//! Overlap is half-open: `[a, b)` overlaps `[c, d)` iff `a < d && c < b`.

mod query;

pub use query::{OverlapIter, QueryBounds};

use crate::arena::{Arena, Link, NodeIndex};
use crate::compare::{LookupCompare, TreeCompare};
use crate::iter::{Forward, InOrderIter, RbLinks, Reverse};
use crate::node::{RbEntry, RbHead};
use crate::options::TreeOptions;
use crate::rbtree::{RbTree, left_of, parent_of, right_of};
use crate::traits::NodeTraits;

/// The embedded interval-tree header: a red-black header plus the subtree's
/// largest upper endpoint.
pub struct IntervalHead<K, O: TreeOptions> {
    rb: RbHead<O>,
    max_upper: K,
}

impl<K, O: TreeOptions> IntervalHead<K, O> {
    /// An unlinked head. The bound is recomputed on insert; any initial
    /// value works.
    pub fn new(max_upper: K) -> Self {
        Self {
            rb: RbHead::new(),
            max_upper,
        }
    }

    /// The embedded red-black header, for the entry's [`RbEntry`] impl.
    pub fn rb(&self) -> &RbHead<O> {
        &self.rb
    }

    /// The embedded red-black header, mutably.
    pub fn rb_mut(&mut self) -> &mut RbHead<O> {
        &mut self.rb
    }

    /// Largest upper endpoint in the subtree rooted here.
    pub fn max_upper(&self) -> K
    where
        K: Copy,
    {
        self.max_upper
    }

    pub(crate) fn set_max_upper(&mut self, value: K) {
        self.max_upper = value;
    }
}

impl<K: Default, O: TreeOptions> Default for IntervalHead<K, O> {
    fn default() -> Self {
        Self::new(K::default())
    }
}

impl<K: std::fmt::Debug, O: TreeOptions> std::fmt::Debug for IntervalHead<K, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalHead")
            .field("rb", &self.rb)
            .field("max_upper", &self.max_upper)
            .finish()
    }
}

/// An entry that stores a half-open interval and embeds an
/// [`IntervalHead`].
///
/// The [`RbEntry`] impl must expose the header embedded in the interval
/// head (via [`IntervalHead::rb`]); the tree relies on the two views
/// aliasing the same links.
pub trait IntervalEntry: RbEntry {
    /// Endpoint type.
    type Endpoint: Ord + Copy;

    /// Inclusive lower endpoint.
    fn lower(&self) -> Self::Endpoint;
    /// Exclusive upper endpoint.
    fn upper(&self) -> Self::Endpoint;
    /// The embedded header.
    fn interval_head(&self) -> &IntervalHead<Self::Endpoint, Self::Options>;
    /// The embedded header, mutably.
    fn interval_head_mut(&mut self) -> &mut IntervalHead<Self::Endpoint, Self::Options>;
}

fn max_upper_of<T: IntervalEntry>(arena: &Arena<T>, n: NodeIndex) -> T::Endpoint {
    arena[n].interval_head().max_upper()
}

/// Orders intervals by lower endpoint, breaking ties by upper endpoint.
#[derive(Debug)]
pub struct IntervalCompare;

impl<T: IntervalEntry> TreeCompare<T> for IntervalCompare {
    fn less(a: &T, b: &T) -> bool {
        (a.lower(), a.upper()) < (b.lower(), b.upper())
    }
}

impl<T: IntervalEntry> LookupCompare<T, (T::Endpoint, T::Endpoint)> for IntervalCompare {
    fn query_less(query: &(T::Endpoint, T::Endpoint), entry: &T) -> bool {
        *query < (entry.lower(), entry.upper())
    }

    fn entry_less(entry: &T, query: &(T::Endpoint, T::Endpoint)) -> bool {
        (entry.lower(), entry.upper()) < *query
    }
}

/// Recompute `n`'s bound from its own upper endpoint and its children's
/// bounds. Returns whether the stored value changed.
fn recompute<T: IntervalEntry>(arena: &mut Arena<T>, n: NodeIndex) -> bool {
    let mut bound = arena[n].upper();
    if let Some(l) = left_of(arena, n) {
        bound = bound.max(max_upper_of(arena, l));
    }
    if let Some(r) = right_of(arena, n) {
        bound = bound.max(max_upper_of(arena, r));
    }

    let changed = max_upper_of(arena, n) != bound;
    if changed {
        arena[n].interval_head_mut().set_max_upper(bound);
    }
    changed
}

/// Recompute `n`'s bound from scratch, then walk upward recomputing
/// ancestors until one is unchanged.
fn fix_upwards<T: IntervalEntry>(arena: &mut Arena<T>, n: NodeIndex) {
    let mut cur = n;
    loop {
        if !recompute(arena, cur) {
            return;
        }
        match parent_of(arena, cur) {
            Some(p) => cur = p,
            None => return,
        }
    }
}

/// The hook set maintaining `max_upper` through every structural event of
/// the red-black core.
#[derive(Debug)]
pub struct IntervalTraits;

impl<T: IntervalEntry> NodeTraits<T> for IntervalTraits {
    fn leaf_inserted(arena: &mut Arena<T>, node: NodeIndex) {
        // A fresh leaf bounds only itself; push the new upper endpoint up
        // as far as it raises ancestors' bounds.
        let upper = arena[node].upper();
        arena[node].interval_head_mut().set_max_upper(upper);

        let mut cur = node;
        while let Some(p) = parent_of(arena, cur) {
            if upper > max_upper_of(arena, p) {
                arena[p].interval_head_mut().set_max_upper(upper);
                cur = p;
            } else {
                break;
            }
        }
    }

    fn fix_node(arena: &mut Arena<T>, node: NodeIndex) {
        recompute(arena, node);
    }

    fn rotated_left(arena: &mut Arena<T>, node: NodeIndex) {
        // `node` is the demoted former parent: its subtree shrank, its new
        // parent's subtree is what its own used to be.
        recompute(arena, node);
        if let Some(p) = parent_of(arena, node) {
            recompute(arena, p);
        }
    }

    fn rotated_right(arena: &mut Arena<T>, node: NodeIndex) {
        recompute(arena, node);
        if let Some(p) = parent_of(arena, node) {
            recompute(arena, p);
        }
    }

    fn deleted_below(arena: &mut Arena<T>, node: NodeIndex) {
        fix_upwards(arena, node);
    }

    fn swapped(arena: &mut Arena<T>, a: NodeIndex, b: NodeIndex) {
        fix_upwards(arena, a);
        fix_upwards(arena, b);
    }
}

/// An intrusive interval tree over entries stored in an [`Arena`].
///
/// A thin wrapper installing [`IntervalCompare`] and [`IntervalTraits`]
/// over the red-black core, plus the overlap query.
pub struct IntervalTree<T: IntervalEntry> {
    tree: RbTree<T, IntervalCompare, IntervalTraits>,
}

impl<T: IntervalEntry> IntervalTree<T> {
    /// An empty tree.
    pub fn new() -> Self {
        Self { tree: RbTree::new() }
    }

    /// The root node, if any.
    pub fn root(&self) -> Link {
        self.tree.root()
    }

    /// Whether the tree holds no intervals.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Number of linked intervals, or `None` unless the option bundle
    /// enables `CONSTANT_TIME_SIZE`.
    pub fn size(&self) -> Option<usize> {
        self.tree.size()
    }

    /// Unlink everything at once.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Link `node` into the tree. O(log n).
    pub fn insert(&mut self, arena: &mut Arena<T>, node: NodeIndex) {
        self.tree.insert(arena, node);
    }

    /// Unlink `node` from the tree. O(log n).
    pub fn remove(&mut self, arena: &mut Arena<T>, node: NodeIndex) {
        self.tree.remove(arena, node);
    }

    /// Find an interval with exactly these endpoints (the first of its
    /// equality chain, with duplicates enabled).
    pub fn find(&self, arena: &Arena<T>, lower: T::Endpoint, upper: T::Endpoint) -> Link {
        self.tree.find(arena, &(lower, upper))
    }

    /// The interval with the smallest (lower, upper) endpoints.
    pub fn first(&self, arena: &Arena<T>) -> Link {
        self.tree.first(arena)
    }

    /// The interval with the largest (lower, upper) endpoints.
    pub fn last(&self, arena: &Arena<T>) -> Link {
        self.tree.last(arena)
    }

    /// In-order ascending traversal (by lower endpoint).
    pub fn iter<'a>(&self, arena: &'a Arena<T>) -> InOrderIter<'a, T, RbLinks, Forward> {
        self.tree.iter(arena)
    }

    /// In-order descending traversal.
    pub fn iter_rev<'a>(&self, arena: &'a Arena<T>) -> InOrderIter<'a, T, RbLinks, Reverse> {
        self.tree.iter_rev(arena)
    }

    /// All stored intervals overlapping the half-open query, lazily, in
    /// order of lower endpoint.
    ///
    /// Accepts a `Range` (`4..6`) or a `(lower, upper)` pair.
    pub fn query<'a, Q>(&self, arena: &'a Arena<T>, query: Q) -> OverlapIter<'a, T>
    where
        Q: QueryBounds<T::Endpoint>,
    {
        OverlapIter::new(arena, self.root(), query.lower(), query.upper())
    }

    /// Red-black integrity plus a recursive re-derivation of every
    /// `max_upper` bound.
    pub fn verify_integrity(&self, arena: &Arena<T>) -> bool {
        self.tree.verify_integrity(arena) && verify_maxima(arena, self.root())
    }
}

impl<T: IntervalEntry> Default for IntervalTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: IntervalEntry> std::fmt::Debug for IntervalTree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalTree").field("tree", &self.tree).finish()
    }
}

/// `None` if any stored bound disagrees with the recomputed subtree
/// maximum; the true maximum otherwise.
fn check_maxima<T: IntervalEntry>(arena: &Arena<T>, n: NodeIndex) -> Option<T::Endpoint> {
    let mut bound = arena[n].upper();
    if let Some(l) = left_of(arena, n) {
        bound = bound.max(check_maxima(arena, l)?);
    }
    if let Some(r) = right_of(arena, n) {
        bound = bound.max(check_maxima(arena, r)?);
    }

    if max_upper_of(arena, n) == bound {
        Some(bound)
    } else {
        None
    }
}

fn verify_maxima<T: IntervalEntry>(arena: &Arena<T>, root: Link) -> bool {
    root.is_none_or(|n| check_maxima(arena, n).is_some())
}
