/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! The equality chain: a doubly-linked list threading all nodes that
//! compare equal to each other at one tree position cluster.
//!
//! Left-biased insertion links the new node *after* its equal parent in the
//! chain (so the chain, walked via `next`, lists left-biased duplicates in
//! insertion order); right-biased insertion links it *before*. With
//! duplicates disabled the chain storage is zero-sized and every operation
//! here compiles to a no-op.

use std::collections::HashSet;

use crate::arena::{Arena, Link, NodeIndex};
use crate::compare::TreeCompare;
use crate::node::RbEntry;

pub(crate) fn chain_next<T: RbEntry>(arena: &Arena<T>, node: NodeIndex) -> Link {
    arena[node].rb_head().next_eq()
}

pub(crate) fn chain_prev<T: RbEntry>(arena: &Arena<T>, node: NodeIndex) -> Link {
    arena[node].rb_head().prev_eq()
}

fn set_next<T: RbEntry>(arena: &mut Arena<T>, node: NodeIndex, link: Link) {
    arena[node].rb_head_mut().set_next_eq(link);
}

fn set_prev<T: RbEntry>(arena: &mut Arena<T>, node: NodeIndex, link: Link) {
    arena[node].rb_head_mut().set_prev_eq(link);
}

/// Make `node` a singleton chain.
pub(crate) fn chain_clear<T: RbEntry>(arena: &mut Arena<T>, node: NodeIndex) {
    set_next(arena, node, None);
    set_prev(arena, node, None);
}

/// Splice `node` into the chain directly behind `anchor` (the left-biased
/// insertion splice).
pub(crate) fn chain_link_after<T: RbEntry>(
    arena: &mut Arena<T>,
    node: NodeIndex,
    anchor: NodeIndex,
) {
    let anchor_next = chain_next(arena, anchor);
    set_next(arena, node, anchor_next);
    set_prev(arena, node, Some(anchor));
    if let Some(n) = anchor_next {
        set_prev(arena, n, Some(node));
    }
    set_next(arena, anchor, Some(node));
}

/// Splice `node` into the chain directly ahead of `anchor` (the right-biased
/// insertion splice).
pub(crate) fn chain_link_before<T: RbEntry>(
    arena: &mut Arena<T>,
    node: NodeIndex,
    anchor: NodeIndex,
) {
    let anchor_prev = chain_prev(arena, anchor);
    set_prev(arena, node, anchor_prev);
    set_next(arena, node, Some(anchor));
    if let Some(p) = anchor_prev {
        set_next(arena, p, Some(node));
    }
    set_prev(arena, anchor, Some(node));
}

/// Take `node` out of its chain, re-linking its neighbours to each other.
pub(crate) fn chain_unlink<T: RbEntry>(arena: &mut Arena<T>, node: NodeIndex) {
    let prev = chain_prev(arena, node);
    let next = chain_next(arena, node);
    if let Some(n) = next {
        set_prev(arena, n, prev);
    }
    if let Some(p) = prev {
        set_next(arena, p, next);
    }
    chain_clear(arena, node);
}

/// First entry of `node`'s chain (no `prev` neighbour). `node` itself when
/// duplicates are disabled.
pub(crate) fn chain_find_first<T: RbEntry>(arena: &Arena<T>, node: NodeIndex) -> NodeIndex {
    let mut cur = node;
    while let Some(prev) = chain_prev(arena, cur) {
        cur = prev;
    }
    cur
}

/// If `n1` and `n2` compare equal, exchange their chain positions; leave the
/// chain untouched otherwise. Called whenever two nodes swap structural
/// positions.
pub(crate) fn chain_swap_if_necessary<T, C>(arena: &mut Arena<T>, n1: NodeIndex, n2: NodeIndex)
where
    T: RbEntry,
    C: TreeCompare<T>,
{
    if C::less(&arena[n1], &arena[n2]) || C::less(&arena[n2], &arena[n1]) {
        // Not equal, so never chain neighbours of each other.
        return;
    }

    if chain_next(arena, n1) == Some(n2) {
        // n1 directly ahead of n2.
        let n2_next = chain_next(arena, n2);
        let n1_prev = chain_prev(arena, n1);
        set_next(arena, n1, n2_next);
        set_prev(arena, n2, n1_prev);
        set_prev(arena, n1, Some(n2));
        set_next(arena, n2, Some(n1));

        if let Some(n) = chain_next(arena, n1) {
            set_prev(arena, n, Some(n1));
        }
        if let Some(p) = chain_prev(arena, n2) {
            set_next(arena, p, Some(n2));
        }
    } else if chain_next(arena, n2) == Some(n1) {
        // n2 directly ahead of n1.
        let n1_next = chain_next(arena, n1);
        let n2_prev = chain_prev(arena, n2);
        set_next(arena, n2, n1_next);
        set_prev(arena, n1, n2_prev);
        set_prev(arena, n2, Some(n1));
        set_next(arena, n1, Some(n2));

        if let Some(n) = chain_next(arena, n2) {
            set_prev(arena, n, Some(n2));
        }
        if let Some(p) = chain_prev(arena, n1) {
            set_next(arena, p, Some(n1));
        }
    } else {
        // Not adjacent in the chain (or in different chains).
        let (p1, n1_next) = (chain_prev(arena, n1), chain_next(arena, n1));
        let (p2, n2_next) = (chain_prev(arena, n2), chain_next(arena, n2));
        set_prev(arena, n1, p2);
        set_next(arena, n1, n2_next);
        set_prev(arena, n2, p1);
        set_next(arena, n2, n1_next);

        for n in [n1, n2] {
            if let Some(next) = chain_next(arena, n) {
                set_prev(arena, next, Some(n));
            }
            if let Some(prev) = chain_prev(arena, n) {
                set_next(arena, prev, Some(n));
            }
        }
    }
}

/// Walk `node`'s chain in both directions, checking link reciprocity and
/// the absence of cycles.
pub(crate) fn chain_verify<T: RbEntry>(arena: &Arena<T>, node: NodeIndex) -> bool {
    let mut seen: HashSet<NodeIndex> = HashSet::new();
    seen.insert(node);

    let mut cur = node;
    while let Some(prev) = chain_prev(arena, cur) {
        if chain_next(arena, prev) != Some(cur) {
            return false;
        }
        cur = prev;
        if !seen.insert(cur) {
            return false;
        }
    }

    cur = node;
    while let Some(next) = chain_next(arena, cur) {
        if chain_prev(arena, next) != Some(cur) {
            return false;
        }
        cur = next;
        if !seen.insert(cur) {
            return false;
        }
    }

    true
}
