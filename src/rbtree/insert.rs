/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Write path: leaf insertion and the insertion fix-up.

use super::{
    OptionsOf, RbTree, color_of, equality, left_of, parent_of, right_of, set_color, set_left,
    set_parent, set_right,
};
use crate::arena::{Arena, Link, NodeIndex};
use crate::compare::TreeCompare;
use crate::iter::{RbLinks, rightmost};
use crate::node::{Color, RbEntry};
use crate::options::{SizeCountStorage, TreeOptions};
use crate::traits::NodeTraits;

impl<T, C, NT> RbTree<T, C, NT>
where
    T: RbEntry,
    C: TreeCompare<T>,
    NT: NodeTraits<T>,
{
    /// Link `node` into the tree.
    ///
    /// A single descent finds the leaf position; equal keys are placed with
    /// left bias. If duplicates are disabled and an equal entry is already
    /// linked, this is a no-op. O(log n).
    pub fn insert(&mut self, arena: &mut Arena<T>, node: NodeIndex) {
        let root = self.root();
        if self.insert_leaf::<true>(arena, node, root) {
            self.size.increment();
        }

        #[cfg(feature = "unittest")]
        debug_assert!(self.verify_integrity(arena));
    }

    /// Link `node` into the tree, starting the descent near `hint`.
    ///
    /// With `Some(hint)`, the insertion walks upward from the hint while the
    /// new key is smaller than the current ancestor's parent, then descends
    /// normally (left-biased) from there — O(1) amortized for hints adjacent
    /// to the final position. The hint must neighbour that position (an
    /// in-order neighbour of the new key); hinting elsewhere leaves the
    /// ordering unspecified. With `None` (the "end" hint), the descent
    /// starts at the in-order last node and places equal keys with right
    /// bias.
    pub fn insert_hinted(&mut self, arena: &mut Arena<T>, node: NodeIndex, hint: Link) {
        let linked = match hint {
            Some(h) => {
                let mut start = h;
                while let Some(above) = parent_of(arena, start) {
                    if !C::less(&arena[node], &arena[above]) {
                        break;
                    }
                    start = above;
                }
                self.insert_leaf::<true>(arena, node, Some(start))
            }
            None => {
                let start = self.root().map(|r| rightmost::<T, RbLinks>(arena, r));
                self.insert_leaf::<false>(arena, node, start)
            }
        };
        if linked {
            self.size.increment();
        }

        #[cfg(feature = "unittest")]
        debug_assert!(self.verify_integrity(arena));
    }

    /// Descend from `start` to a leaf position and link `node` there.
    ///
    /// Returns whether the node was linked (`false` only for a refused
    /// duplicate).
    fn insert_leaf<const ON_EQUALITY_PREFER_LEFT: bool>(
        &mut self,
        arena: &mut Arena<T>,
        node: NodeIndex,
        start: Link,
    ) -> bool {
        {
            let head = arena[node].rb_head_mut();
            head.set_left(None);
            head.set_right(None);
        }

        let mut parent: Link = None;
        let mut cur = start;
        while let Some(c) = cur {
            if !OptionsOf::<T>::MULTIPLE && C::equal(&arena[c], &arena[node]) {
                // Duplicates disabled and an equal entry is already linked:
                // refuse without touching the tree. The node's header is
                // meaningless until the next insert.
                return false;
            }
            parent = Some(c);
            cur = if C::less(&arena[c], &arena[node]) {
                right_of(arena, c)
            } else {
                left_of(arena, c)
            };
        }

        let Some(p) = parent else {
            set_parent(arena, node, None);
            set_color(arena, node, Color::Black);
            self.root = Some(node);
            equality::chain_clear(arena, node);
            NT::leaf_inserted(arena, node);
            return true;
        };

        set_parent(arena, node, Some(p));
        set_color(arena, node, Color::Red);

        if C::less(&arena[node], &arena[p]) {
            debug_assert!(left_of(arena, p).is_none());
            set_left(arena, p, Some(node));
            equality::chain_clear(arena, node);
        } else if C::less(&arena[p], &arena[node]) {
            debug_assert!(right_of(arena, p).is_none());
            set_right(arena, p, Some(node));
            equality::chain_clear(arena, node);
        } else {
            // Equal keys only get this far with duplicates admitted; the
            // descent refuses them otherwise.
            debug_assert!(OptionsOf::<T>::MULTIPLE);
            if ON_EQUALITY_PREFER_LEFT {
                debug_assert!(left_of(arena, p).is_none());
                set_left(arena, p, Some(node));
                equality::chain_link_after(arena, node, p);
            } else {
                debug_assert!(right_of(arena, p).is_none());
                set_right(arena, p, Some(node));
                equality::chain_link_before(arena, node, p);
            }
        }

        NT::leaf_inserted(arena, node);
        self.fixup_after_insert(arena, node);
        true
    }

    /// Restore the red-black invariants after linking a red leaf.
    ///
    /// Recolours up the tree while the parent and uncle are both red
    /// (stopping one short of the root, which is never coloured red), then
    /// resolves the remaining red-red violation with at most two rotations
    /// depending on whether the node sits folded (inside) or straight
    /// (outside) relative to its grandparent.
    fn fixup_after_insert(&mut self, arena: &mut Arena<T>, mut node: NodeIndex) {
        loop {
            let Some(parent) = parent_of(arena, node) else {
                return;
            };
            if color_of(arena, parent) == Color::Black {
                return;
            }
            // A red parent is never the root.
            let Some(grandparent) = parent_of(arena, parent) else {
                return;
            };
            let uncle = if left_of(arena, grandparent) == Some(parent) {
                right_of(arena, grandparent)
            } else {
                left_of(arena, grandparent)
            };
            match uncle {
                Some(u) if color_of(arena, u) == Color::Red => {
                    set_color(arena, parent, Color::Black);
                    set_color(arena, u, Color::Black);
                    if parent_of(arena, grandparent).is_some() {
                        set_color(arena, grandparent, Color::Red);
                        node = grandparent;
                    } else {
                        // The grandparent is the root; leave it black.
                        return;
                    }
                }
                _ => break,
            }
        }

        // Parent red, uncle black or absent: rotate to terminate.
        let Some(parent) = parent_of(arena, node) else {
            return;
        };
        let Some(grandparent) = parent_of(arena, parent) else {
            return;
        };

        if left_of(arena, grandparent) == Some(parent) {
            if right_of(arena, parent) == Some(node) {
                // Folded: straighten first.
                self.rotate_left(arena, parent);
                set_color(arena, node, Color::Black);
            } else {
                set_color(arena, parent, Color::Black);
            }
            self.rotate_right(arena, grandparent);
        } else {
            if left_of(arena, parent) == Some(node) {
                self.rotate_right(arena, parent);
                set_color(arena, node, Color::Black);
            } else {
                set_color(arena, parent, Color::Black);
            }
            self.rotate_left(arena, grandparent);
        }

        set_color(arena, grandparent, Color::Red);
    }
}
