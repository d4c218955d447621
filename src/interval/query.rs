/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! The lazy overlap-query walk.

use std::ops::Range;

use super::{IntervalEntry, max_upper_of};
use crate::arena::{Arena, Link, NodeIndex};
use crate::rbtree::{left_of, parent_of, right_of};

/// Anything usable as a half-open query interval.
pub trait QueryBounds<K> {
    /// Inclusive lower bound.
    fn lower(&self) -> K;
    /// Exclusive upper bound.
    fn upper(&self) -> K;
}

impl<K: Copy> QueryBounds<K> for Range<K> {
    fn lower(&self) -> K {
        self.start
    }

    fn upper(&self) -> K {
        self.end
    }
}

impl<K: Copy> QueryBounds<K> for (K, K) {
    fn lower(&self) -> K {
        self.0
    }

    fn upper(&self) -> K {
        self.1
    }
}

/// Descend to the in-order first node of `n`'s subtree that could still
/// hold an overlap: keep going left while the left child's subtree contains
/// an upper endpoint past the query's start.
fn leftmost_viable<T: IntervalEntry>(
    arena: &Arena<T>,
    mut n: NodeIndex,
    lower: T::Endpoint,
) -> NodeIndex {
    while let Some(l) = left_of(arena, n) {
        if max_upper_of(arena, l) > lower {
            n = l;
        } else {
            break;
        }
    }
    n
}

/// Lazy forward iterator over all stored intervals overlapping a half-open
/// query, in order of lower endpoint.
///
/// The cursor is always either exhausted or positioned on a node whose
/// subtree could still contain an overlap (`max_upper > query.lower`).
/// Stepping prefers a viable left descent, then the right subtree when the
/// current node still starts before the query's end, and otherwise ascends,
/// skipping ancestors whose subtrees are already exhausted.
pub struct OverlapIter<'a, T: IntervalEntry> {
    arena: &'a Arena<T>,
    cur: Link,
    lower: T::Endpoint,
    upper: T::Endpoint,
}

impl<'a, T: IntervalEntry> OverlapIter<'a, T> {
    pub(super) fn new(
        arena: &'a Arena<T>,
        root: Link,
        lower: T::Endpoint,
        upper: T::Endpoint,
    ) -> Self {
        let cur = root.and_then(|r| {
            if max_upper_of(arena, r) > lower {
                Some(leftmost_viable(arena, r, lower))
            } else {
                // No stored upper endpoint reaches past the query start.
                None
            }
        });
        Self {
            arena,
            cur,
            lower,
            upper,
        }
    }

    fn step(&self, n: NodeIndex) -> Link {
        // The right subtree only holds lowers at or past this node's, so it
        // is exhausted once the node itself starts at or past the query end.
        if self.arena[n].lower() < self.upper {
            if let Some(r) = right_of(self.arena, n) {
                if max_upper_of(self.arena, r) > self.lower {
                    return Some(leftmost_viable(self.arena, r, self.lower));
                }
            }
        }

        // Ascend. An ancestor entered from its right child is done; one
        // whose lower is already past the query end is done too, right
        // subtree included.
        let mut child = n;
        while let Some(p) = parent_of(self.arena, child) {
            if left_of(self.arena, p) == Some(child) && self.arena[p].lower() < self.upper {
                return Some(p);
            }
            child = p;
        }
        None
    }
}

impl<'a, T: IntervalEntry> Iterator for OverlapIter<'a, T> {
    type Item = (NodeIndex, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(n) = self.cur {
            self.cur = self.step(n);
            let entry = &self.arena[n];
            if entry.lower() < self.upper && self.lower < entry.upper() {
                return Some((n, entry));
            }
        }
        None
    }
}

impl<T: IntervalEntry> std::fmt::Debug for OverlapIter<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlapIter").field("cur", &self.cur).finish()
    }
}
