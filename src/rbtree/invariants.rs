/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Structural invariant checks.
//!
//! Each sub-check covers one clause of the red-black contract; they compose
//! into [`RbTree::verify_integrity`]. With the `unittest` feature enabled,
//! every mutation re-runs the full battery through a `debug_assert!`.

use std::collections::HashSet;

use super::{RbTree, color_of, equality, left_of, parent_of, right_of};
use crate::arena::{Arena, Link, NodeIndex};
use crate::compare::TreeCompare;
use crate::iter::{RbLinks, step_forward};
use crate::node::{Color, RbEntry};
use crate::options::TreeOptions;

impl<T, C, NT> RbTree<T, C, NT>
where
    T: RbEntry,
    C: TreeCompare<T>,
{
    /// Check every structural invariant: parent/child reciprocity and
    /// acyclicity, black root, equal black-height on all paths, no red-red
    /// adjacency, BST order under the comparator, equality-chain
    /// reciprocity, and (when maintained) the size counter.
    ///
    /// Returns `false` on the first violated clause.
    pub fn verify_integrity(&self, arena: &Arena<T>) -> bool {
        self.verify_tree(arena)
            && self.verify_black_root(arena)
            && black_path_length(arena, self.root()).is_some()
            && verify_red_black(arena, self.root())
            && self.verify_order(arena)
            && self.verify_equality(arena)
            && self.verify_size(arena)
    }

    /// Root is black (an empty tree passes).
    fn verify_black_root(&self, arena: &Arena<T>) -> bool {
        self.root()
            .is_none_or(|r| color_of(arena, r) == Color::Black)
    }

    /// Every linked node's children point back to it; the in-order walk
    /// visits each node at most once and has no self-loops.
    fn verify_tree(&self, arena: &Arena<T>) -> bool {
        let Some(root) = self.root() else {
            return true;
        };

        let mut cur = root;
        while let Some(l) = left_of(arena, cur) {
            if l == cur {
                return false;
            }
            cur = l;
        }

        let mut seen: HashSet<NodeIndex> = HashSet::new();
        let mut walk = Some(cur);
        while let Some(n) = walk {
            if !seen.insert(n) {
                return false;
            }

            if let Some(l) = left_of(arena, n) {
                if l == n || parent_of(arena, l) != Some(n) {
                    return false;
                }
            }
            if let Some(r) = right_of(arena, n) {
                if r == n || parent_of(arena, r) != Some(n) {
                    return false;
                }
            }

            walk = step_forward::<T, RbLinks>(arena, n);
        }

        true
    }

    /// Neither child orders on the wrong side of its parent.
    fn verify_order(&self, arena: &Arena<T>) -> bool {
        for (n, entry) in self.iter(arena) {
            if let Some(l) = left_of(arena, n) {
                // The left child may not be larger.
                if C::less(entry, &arena[l]) {
                    return false;
                }
            }
            if let Some(r) = right_of(arena, n) {
                // The right child may not be smaller.
                if C::less(&arena[r], entry) {
                    return false;
                }
            }
        }
        true
    }

    /// Every equality chain is reciprocal and acyclic, seen from each of
    /// its members.
    fn verify_equality(&self, arena: &Arena<T>) -> bool {
        if !<T::Options as TreeOptions>::MULTIPLE {
            return true;
        }
        self.iter(arena).all(|(n, _)| equality::chain_verify(arena, n))
    }

    /// The maintained counter matches the number of linked nodes.
    fn verify_size(&self, arena: &Arena<T>) -> bool {
        match self.size() {
            None => true,
            Some(size) => self.iter(arena).count() == size,
        }
    }
}

/// Number of black nodes on every path from `node` down to a leaf, or
/// `None` if two paths disagree.
fn black_path_length<T: RbEntry>(arena: &Arena<T>, node: Link) -> Option<u32> {
    let Some(n) = node else {
        return Some(0);
    };

    let left = black_path_length(arena, left_of(arena, n))?;
    let right = black_path_length(arena, right_of(arena, n))?;
    if left != right {
        return None;
    }

    match color_of(arena, n) {
        Color::Black => Some(left + 1),
        Color::Red => Some(left),
    }
}

/// No red node has a red child.
fn verify_red_black<T: RbEntry>(arena: &Arena<T>, node: Link) -> bool {
    let Some(n) = node else {
        return true;
    };

    if color_of(arena, n) == Color::Red {
        let red_child = [left_of(arena, n), right_of(arena, n)]
            .into_iter()
            .flatten()
            .any(|c| color_of(arena, c) == Color::Red);
        if red_child {
            return false;
        }
    }

    verify_red_black(arena, left_of(arena, n)) && verify_red_black(arena, right_of(arena, n))
}
