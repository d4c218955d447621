/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Dynamic segment tree adapter.
//!
//! A dynamic segment tree stores intervals by lowering each one to two
//! point *events* — a start and an end — kept in an ordered core. This
//! module is the adapter layer: the event representation, the lowering, and
//! the ordering. Aggregate combiners and aggregate iteration are out of
//! scope; the surface is interval insertion, removal by handle, and event
//! inspection for testing.
//!
//! The core is selected by a marker type. [`OnRbTree`] backs the events
//! with the red-black core; [`OnZipTree`] names the rank-driven base and is
//! reserved until the zip core grows its structural machinery (only the
//! node contract exists today, see [`zip`](crate::zip)).

use std::marker::PhantomData;

use crate::arena::{Arena, NodeIndex};
use crate::compare::TreeCompare;
use crate::node::{RbEntry, RbHead};
use crate::options::DefaultOptions;
use crate::rbtree::RbTree;
use crate::traits::DefaultNodeTraits;

mod sealed {
    pub trait Sealed {}
}

/// Marker trait for usable segment-tree cores.
pub trait SegTreeBase: sealed::Sealed {}

/// Back the event set with the red-black core.
#[derive(Debug)]
pub struct OnRbTree;

impl sealed::Sealed for OnRbTree {}
impl SegTreeBase for OnRbTree {}

/// The rank-driven base. Declared for parity with the core selection
/// surface; not yet a [`SegTreeBase`].
#[derive(Debug)]
pub struct OnZipTree;

/// Which endpoint of its interval an event marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The exclusive upper endpoint. Orders before starts at equal points,
    /// matching half-open semantics.
    End,
    /// The inclusive lower endpoint.
    Start,
}

/// One boundary of a stored interval.
#[derive(Debug)]
pub struct DstEvent<K, V> {
    point: K,
    kind: EventKind,
    /// Tie-breaker for events at the same point; assigned from a
    /// per-tree sequence at insertion.
    seq: u64,
    /// The stored value, carried by the start event.
    value: Option<V>,
    head: RbHead<DefaultOptions>,
}

impl<K: Copy, V> DstEvent<K, V> {
    /// The event's point on the axis.
    pub fn point(&self) -> K {
        self.point
    }

    /// Whether this is a start or an end event.
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

impl<K, V> RbEntry for DstEvent<K, V> {
    type Options = DefaultOptions;

    fn rb_head(&self) -> &RbHead<DefaultOptions> {
        &self.head
    }

    fn rb_head_mut(&mut self) -> &mut RbHead<DefaultOptions> {
        &mut self.head
    }
}

/// Orders events by point, ends before starts at equal points, insertion
/// order last.
#[derive(Debug)]
struct EventOrder;

impl<K: Ord, V> TreeCompare<DstEvent<K, V>> for EventOrder {
    fn less(a: &DstEvent<K, V>, b: &DstEvent<K, V>) -> bool {
        let rank = |e: &DstEvent<K, V>| match e.kind {
            EventKind::End => 0u8,
            EventKind::Start => 1,
        };
        (&a.point, rank(a), a.seq) < (&b.point, rank(b), b.seq)
    }
}

/// Handle to a stored interval: its two event nodes.
#[derive(Debug, Clone, Copy)]
pub struct DstHandle {
    start: NodeIndex,
    end: NodeIndex,
}

/// A dynamic segment tree over intervals `[lower, upper)` with attached
/// values.
///
/// Unlike the intrusive trees, the adapter owns its event storage: each
/// inserted interval becomes two arena-backed events in the selected core,
/// and the returned [`DstHandle`] is the caller's only reference to them.
pub struct DynSegTree<K, V, S: SegTreeBase = OnRbTree> {
    events: Arena<DstEvent<K, V>>,
    tree: RbTree<DstEvent<K, V>, EventOrder, DefaultNodeTraits>,
    next_seq: u64,
    len: usize,
    _marker: PhantomData<S>,
}

impl<K: Ord + Copy, V> DynSegTree<K, V, OnRbTree> {
    /// An empty tree.
    pub fn new() -> Self {
        Self {
            events: Arena::new(),
            tree: RbTree::new(),
            next_seq: 0,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Number of stored intervals.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no intervals are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store `[lower, upper)` with `value`, returning the handle that
    /// removes it again.
    pub fn insert(&mut self, lower: K, upper: K, value: V) -> DstHandle {
        debug_assert!(lower < upper, "half-open interval with nothing in it");

        let seq = self.next_seq;
        self.next_seq += 1;

        let start = self.events.insert(DstEvent {
            point: lower,
            kind: EventKind::Start,
            seq,
            value: Some(value),
            head: RbHead::new(),
        });
        let end = self.events.insert(DstEvent {
            point: upper,
            kind: EventKind::End,
            seq,
            value: None,
            head: RbHead::new(),
        });

        self.tree.insert(&mut self.events, start);
        self.tree.insert(&mut self.events, end);
        self.len += 1;

        DstHandle { start, end }
    }

    /// Remove the interval behind `handle`, returning its value.
    ///
    /// # Panics
    ///
    /// Panics if the handle was already removed.
    pub fn remove(&mut self, handle: DstHandle) -> Option<V> {
        self.tree.remove(&mut self.events, handle.start);
        self.tree.remove(&mut self.events, handle.end);
        let value = self.events.remove(handle.start).value;
        self.events.remove(handle.end);
        self.len -= 1;
        value
    }

    /// Drop every stored interval.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.events.clear();
        self.len = 0;
    }

    /// The events in axis order, for inspection: `(point, kind)` pairs.
    pub fn events(&self) -> impl Iterator<Item = (K, EventKind)> {
        self.tree
            .iter(&self.events)
            .map(|(_, e)| (e.point(), e.kind()))
    }

    /// Integrity of the underlying event core, plus the event/interval
    /// count relation.
    pub fn verify_integrity(&self) -> bool {
        self.tree.verify_integrity(&self.events)
            && self.events.len() as usize == 2 * self.len
            && self.tree.size() == Some(2 * self.len)
    }
}

impl<K: Ord + Copy, V> Default for DynSegTree<K, V, OnRbTree> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S: SegTreeBase> std::fmt::Debug for DynSegTree<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynSegTree").field("len", &self.len).finish()
    }
}
