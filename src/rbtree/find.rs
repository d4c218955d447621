/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Read path: lookups.

use super::{RbTree, chain_find_first, left_of, right_of};
use crate::arena::{Arena, Link};
use crate::compare::LookupCompare;
use crate::node::RbEntry;
use crate::traits::NodeTraits;

impl<T, C, NT> RbTree<T, C, NT>
where
    T: RbEntry,
    NT: NodeTraits<T>,
{
    /// Find an entry comparing equal to `query`.
    ///
    /// With duplicates enabled, returns the *first* entry of the equality
    /// chain. `None` if no equal entry is linked. O(log n).
    pub fn find<Q: ?Sized>(&self, arena: &Arena<T>, query: &Q) -> Link
    where
        C: LookupCompare<T, Q>,
    {
        let mut cur = self.root();
        while let Some(c) = cur {
            if C::query_less(query, &arena[c]) {
                cur = left_of(arena, c);
            } else if C::entry_less(&arena[c], query) {
                cur = right_of(arena, c);
            } else {
                return Some(chain_find_first(arena, c));
            }
        }
        None
    }

    /// The leftmost entry ordering strictly after `query`, or `None` if no
    /// such entry is linked. O(log n).
    pub fn upper_bound<Q: ?Sized>(&self, arena: &Arena<T>, query: &Q) -> Link
    where
        C: LookupCompare<T, Q>,
    {
        let mut bound: Link = None;
        let mut cur = self.root();
        while let Some(c) = cur {
            if C::query_less(query, &arena[c]) {
                bound = Some(c);
                cur = left_of(arena, c);
            } else {
                cur = right_of(arena, c);
            }
        }
        bound
    }

    /// Whether an entry comparing equal to `query` is linked.
    pub fn contains<Q: ?Sized>(&self, arena: &Arena<T>, query: &Q) -> bool
    where
        C: LookupCompare<T, Q>,
    {
        self.find(arena, query).is_some()
    }
}
