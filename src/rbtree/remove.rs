/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Delete path: successor swap, lone-child promotion, deletion fix-up.
//!
//! Removal never moves entry payloads. A node with two children first
//! exchanges structural links with its in-order successor (colours stay
//! with the *position*, so the black-height structure is undisturbed), after
//! which it has at most one child and can be detached directly.

use super::{
    RbTree, color_of, equality, is_black, left_of, parent_of, right_of, set_color, set_left,
    set_parent, set_right,
};
use crate::arena::{Arena, NodeIndex};
use crate::compare::TreeCompare;
use crate::iter::{RbLinks, leftmost};
use crate::node::{Color, RbEntry};
use crate::options::SizeCountStorage;
use crate::traits::NodeTraits;

impl<T, C, NT> RbTree<T, C, NT>
where
    T: RbEntry,
    C: TreeCompare<T>,
    NT: NodeTraits<T>,
{
    /// Unlink `node` from the tree. O(log n).
    ///
    /// The entry stays in the arena; its header is meaningless until the
    /// next insert.
    pub fn remove(&mut self, arena: &mut Arena<T>, node: NodeIndex) {
        self.remove_to_leaf(arena, node);
        self.size.decrement();

        #[cfg(feature = "unittest")]
        debug_assert!(self.verify_integrity(arena));
    }

    fn remove_to_leaf(&mut self, arena: &mut Arena<T>, node: NodeIndex) {
        if let (Some(_), Some(right)) = (left_of(arena, node), right_of(arena, node)) {
            // Two children: swap with the smallest of the larger-or-equal
            // children, which has no left child. Afterwards `node` sits at a
            // leaf-like position with the successor's old colour.
            let successor = leftmost::<T, RbLinks>(arena, right);
            self.swap_nodes(arena, node, successor, false);
        }

        if let Some(child) = left_of(arena, node).or(right_of(arena, node)) {
            // One child left. It is necessarily a red leaf (anything else
            // would break the black balance), so promoting it in place and
            // recolouring it black settles all invariants without a fix-up.
            debug_assert!(color_of(arena, child) == Color::Red);
            let above = parent_of(arena, node);
            set_parent(arena, child, above);
            match above {
                Some(p) => {
                    if left_of(arena, p) == Some(node) {
                        set_left(arena, p, Some(child));
                    } else {
                        set_right(arena, p, Some(child));
                    }
                }
                None => self.root = Some(child),
            }
            set_color(arena, child, Color::Black);

            equality::chain_unlink(arena, node);
            NT::deleted_below(arena, child);
            return;
        }

        // True leaf.
        let Some(parent) = parent_of(arena, node) else {
            // Tree is now empty.
            self.root = None;
            equality::chain_unlink(arena, node);
            return;
        };

        let deleted_left = left_of(arena, parent) == Some(node);
        if deleted_left {
            set_left(arena, parent, None);
        } else {
            set_right(arena, parent, None);
        }

        equality::chain_unlink(arena, node);
        NT::deleted_below(arena, parent);

        if color_of(arena, node) == Color::Black {
            // Removing a black leaf leaves one branch short a black.
            self.fixup_after_delete(arena, parent, deleted_left);
        }
    }

    /// Rebalance after a black node disappeared below `parent` on the
    /// `deleted_left` side.
    fn fixup_after_delete(
        &mut self,
        arena: &mut Arena<T>,
        mut parent: NodeIndex,
        mut deleted_left: bool,
    ) {
        let mut sibling;

        // Case 3: parent black, sibling black with two black children.
        // Recolouring the sibling red fixes everything below the parent and
        // moves the missing black one level up.
        loop {
            let s = if deleted_left {
                right_of(arena, parent)
            } else {
                left_of(arena, parent)
            };
            // The sibling must exist; the deleted branch had a black to
            // spare.
            let Some(s) = s else {
                debug_assert!(false, "delete fix-up with missing sibling");
                return;
            };

            if color_of(arena, parent) == Color::Black
                && color_of(arena, s) == Color::Black
                && is_black(arena, left_of(arena, s))
                && is_black(arena, right_of(arena, s))
            {
                set_color(arena, s, Color::Red);
                match parent_of(arena, parent) {
                    // The whole tree lost a black: harmless at the root.
                    None => return,
                    Some(above) => {
                        deleted_left = left_of(arena, above) == Some(parent);
                        parent = above;
                    }
                }
            } else {
                sibling = s;
                break;
            }
        }

        if color_of(arena, sibling) == Color::Red {
            // Case 2: rotate the red sibling over the parent; the inner
            // nephew becomes the new (black) sibling.
            set_color(arena, sibling, Color::Black);
            set_color(arena, parent, Color::Red);
            let inner = if deleted_left {
                self.rotate_left(arena, parent);
                right_of(arena, parent)
            } else {
                self.rotate_right(arena, parent);
                left_of(arena, parent)
            };
            let Some(inner) = inner else {
                debug_assert!(false, "red sibling without inner child");
                return;
            };
            sibling = inner;
        }

        if color_of(arena, sibling) == Color::Black
            && is_black(arena, left_of(arena, sibling))
            && is_black(arena, right_of(arena, sibling))
        {
            // Case 4: parent is red here; trading its red for the sibling
            // restores the black count on the deleted side.
            set_color(arena, parent, Color::Black);
            set_color(arena, sibling, Color::Red);
            return;
        }

        if deleted_left {
            if is_black(arena, right_of(arena, sibling)) {
                // Case 5: inner nephew red, outer black. Unfold into the
                // straight configuration.
                self.rotate_right(arena, sibling);
                set_color(arena, sibling, Color::Red);
                let Some(above) = parent_of(arena, sibling) else {
                    debug_assert!(false, "unfolded sibling lost its parent");
                    return;
                };
                sibling = above;
                set_color(arena, sibling, Color::Black);
            }

            // Case 6: straight configuration resolves with one rotation.
            self.rotate_left(arena, parent);
            let pc = color_of(arena, parent);
            set_color(arena, parent, color_of(arena, sibling));
            set_color(arena, sibling, pc);
            if let Some(outer) = right_of(arena, sibling) {
                set_color(arena, outer, Color::Black);
            }
        } else {
            if is_black(arena, left_of(arena, sibling)) {
                self.rotate_left(arena, sibling);
                set_color(arena, sibling, Color::Red);
                let Some(above) = parent_of(arena, sibling) else {
                    debug_assert!(false, "unfolded sibling lost its parent");
                    return;
                };
                sibling = above;
                set_color(arena, sibling, Color::Black);
            }

            self.rotate_right(arena, parent);
            let pc = color_of(arena, parent);
            set_color(arena, parent, color_of(arena, sibling));
            set_color(arena, sibling, pc);
            if let Some(outer) = left_of(arena, sibling) {
                set_color(arena, outer, Color::Black);
            }
        }
    }

    /// Exchange the structural positions of `n1` and `n2` by rewiring links;
    /// payloads never move.
    ///
    /// With `swap_colors` set each node keeps its own colour; the delete
    /// path passes `false`, which exchanges the colours so that each
    /// *position* keeps the colour it had. Chain positions are exchanged
    /// when the two nodes compare equal. Fires the `swapped` hook last.
    pub(crate) fn swap_nodes(
        &mut self,
        arena: &mut Arena<T>,
        n1: NodeIndex,
        n2: NodeIndex,
        swap_colors: bool,
    ) {
        if parent_of(arena, n1) == Some(n2) {
            self.swap_neighbors(arena, n2, n1);
        } else if parent_of(arena, n2) == Some(n1) {
            self.swap_neighbors(arena, n1, n2);
        } else {
            self.swap_unrelated_nodes(arena, n1, n2);
        }

        equality::chain_swap_if_necessary::<T, C>(arena, n1, n2);

        if !swap_colors {
            let c1 = color_of(arena, n1);
            set_color(arena, n1, color_of(arena, n2));
            set_color(arena, n2, c1);
        }

        NT::swapped(arena, n1, n2);
    }

    /// Swap a parent with its direct child, which needs care to avoid the
    /// links that alias each other.
    fn swap_neighbors(&mut self, arena: &mut Arena<T>, parent: NodeIndex, child: NodeIndex) {
        let above = parent_of(arena, parent);
        set_parent(arena, child, above);
        set_parent(arena, parent, Some(child));
        match above {
            Some(a) => {
                if left_of(arena, a) == Some(parent) {
                    set_left(arena, a, Some(child));
                } else {
                    set_right(arena, a, Some(child));
                }
            }
            None => self.root = Some(child),
        }

        if left_of(arena, parent) == Some(child) {
            set_left(arena, parent, left_of(arena, child));
            if let Some(l) = left_of(arena, parent) {
                set_parent(arena, l, Some(parent));
            }
            set_left(arena, child, Some(parent));

            let pr = right_of(arena, parent);
            set_right(arena, parent, right_of(arena, child));
            set_right(arena, child, pr);
            if let Some(r) = right_of(arena, child) {
                set_parent(arena, r, Some(child));
            }
            if let Some(r) = right_of(arena, parent) {
                set_parent(arena, r, Some(parent));
            }
        } else {
            set_right(arena, parent, right_of(arena, child));
            if let Some(r) = right_of(arena, parent) {
                set_parent(arena, r, Some(parent));
            }
            set_right(arena, child, Some(parent));

            let pl = left_of(arena, parent);
            set_left(arena, parent, left_of(arena, child));
            set_left(arena, child, pl);
            if let Some(l) = left_of(arena, child) {
                set_parent(arena, l, Some(child));
            }
            if let Some(l) = left_of(arena, parent) {
                set_parent(arena, l, Some(parent));
            }
        }
    }

    fn swap_unrelated_nodes(&mut self, arena: &mut Arena<T>, n1: NodeIndex, n2: NodeIndex) {
        let (l1, l2) = (left_of(arena, n1), left_of(arena, n2));
        set_left(arena, n1, l2);
        set_left(arena, n2, l1);
        if let Some(l) = left_of(arena, n1) {
            set_parent(arena, l, Some(n1));
        }
        if let Some(l) = left_of(arena, n2) {
            set_parent(arena, l, Some(n2));
        }

        let (r1, r2) = (right_of(arena, n1), right_of(arena, n2));
        set_right(arena, n1, r2);
        set_right(arena, n2, r1);
        if let Some(r) = right_of(arena, n1) {
            set_parent(arena, r, Some(n1));
        }
        if let Some(r) = right_of(arena, n2) {
            set_parent(arena, r, Some(n2));
        }

        let (p1, p2) = (parent_of(arena, n1), parent_of(arena, n2));
        set_parent(arena, n1, p2);
        set_parent(arena, n2, p1);
        match parent_of(arena, n1) {
            Some(p) => {
                if right_of(arena, p) == Some(n2) {
                    set_right(arena, p, Some(n1));
                } else {
                    set_left(arena, p, Some(n1));
                }
            }
            None => self.root = Some(n1),
        }
        match parent_of(arena, n2) {
            Some(p) => {
                if right_of(arena, p) == Some(n1) {
                    set_right(arena, p, Some(n2));
                } else {
                    set_left(arena, p, Some(n2));
                }
            }
            None => self.root = Some(n2),
        }
    }
}
