/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! In-place subtree rebuild.
//!
//! A rebuild turns the subtree rooted at an overcharged node into a
//! complete binary tree of the same nodes, zeroing their energy. It runs in
//! two passes over a scratch buffer laid out level by level:
//!
//! 1. **Placement.** Walk the subtree in order, dropping each node into the
//!    buffer slot its in-order position maps to (see [`slot_for`]). With
//!    `L` levels and `F = 2^L - 1` slots, level `ℓ` (0 = bottom) occupies
//!    slots from `F - 2^(L-ℓ) + 1`; the level of a position follows from
//!    its trailing-zero count.
//! 2. **Linking.** Pair bottom-level nodes under their level-1 parents
//!    (a trailing odd node hangs as a lone left child, childless level-1
//!    slots become leaves), then climb level by level pairing `(2i, 2i+1)`
//!    under parent `i`, recomputing sizes and zeroing energies. The final
//!    slot is the new subtree root and is spliced where the old one stood.
//!
//! Each node is touched a constant number of times, so rebuilding `m` nodes
//! is O(m); the potential argument then gives the amortized bounds.

use super::{EnergyEntry, EnergyLinks, EnergyTree, left_of, parent_of, right_of};
use crate::arena::{Arena, NodeIndex};
use crate::compare::TreeCompare;
use crate::iter::{leftmost, step_forward};

/// Buffer slot for the `k`-th (1-based) in-order position.
///
/// A complete tree of `size` nodes is a perfect tree of `levels - 1` levels
/// with `bottom_count` extra leaves filling the bottom level from the left.
/// Those leaves sit at the odd in-order positions up to `2·bottom_count`;
/// at and below that boundary, the position's trailing-zero count is the
/// level directly. Past it there are no more bottom leaves, so the position
/// shifted down by `bottom_count` addresses the upper perfect tree, one
/// level up.
fn slot_for(k: usize, bottom_count: usize, levels: u32, full: usize) -> usize {
    debug_assert!(k >= 1);
    let (level, index) = if k <= 2 * bottom_count {
        let level = k.trailing_zeros();
        (level, k >> (level + 1))
    } else {
        let shifted = k - bottom_count;
        let level = shifted.trailing_zeros() + 1;
        (level, shifted >> level)
    };
    let level_offset = full - (1usize << (levels - level)) + 1;
    level_offset + index
}

impl<T, C> EnergyTree<T, C>
where
    T: EnergyEntry,
    C: TreeCompare<T>,
{
    /// Rebuild the subtree rooted at `node` into a complete binary tree,
    /// zeroing its energy. Linear in the subtree size.
    pub(super) fn rebuild_below(&mut self, arena: &mut Arena<T>, node: NodeIndex) {
        let size = arena[node].energy_head().size;
        debug_assert!(size >= 1);
        let levels = usize::BITS - size.leading_zeros();
        let full = (1usize << levels) - 1;
        let bottom_count = size - ((1usize << (levels - 1)) - 1);

        if self.rebuild_buffer.len() < full {
            // Monotonic growth; the buffer is reused across rebuilds.
            self.rebuild_buffer
                .resize(full, NodeIndex::from(u32::MAX));
        }

        let original_parent = parent_of(arena, node);
        let original_size = size;

        // Placement pass.
        let mut cur = leftmost::<T, EnergyLinks>(arena, node);
        for k in 1..=size {
            self.rebuild_buffer[slot_for(k, bottom_count, levels, full)] = cur;
            if k < size {
                match step_forward::<T, EnergyLinks>(arena, cur) {
                    Some(next) => cur = next,
                    None => {
                        debug_assert!(false, "subtree ran out of nodes before its size");
                        return;
                    }
                }
            }
        }

        // Linking pass.
        if levels > 1 {
            let upper = (full + 1) / 2;

            let mut i = 0;
            while i + 1 < bottom_count {
                let parent = self.rebuild_buffer[upper + i / 2];
                let (a, b) = (self.rebuild_buffer[i], self.rebuild_buffer[i + 1]);
                {
                    let head = arena[parent].energy_head_mut();
                    head.left = Some(a);
                    head.right = Some(b);
                    head.size = 3;
                    head.energy = 0;
                }
                for leaf in [a, b] {
                    let head = arena[leaf].energy_head_mut();
                    head.left = None;
                    head.right = None;
                    head.parent = Some(parent);
                    head.size = 1;
                    head.energy = 0;
                }
                i += 2;
            }
            if i < bottom_count {
                // Trailing odd node hangs as a lone left child.
                let parent = self.rebuild_buffer[upper + i / 2];
                let leaf = self.rebuild_buffer[i];
                {
                    let head = arena[parent].energy_head_mut();
                    head.left = Some(leaf);
                    head.right = None;
                    head.size = 2;
                    head.energy = 0;
                }
                {
                    let head = arena[leaf].energy_head_mut();
                    head.left = None;
                    head.right = None;
                    head.parent = Some(parent);
                    head.size = 1;
                    head.energy = 0;
                }
                i += 2;
            }
            // Level-1 slots with no bottom children become leaves.
            for j in (i / 2)..(1usize << (levels - 2)) {
                let n = self.rebuild_buffer[upper + j];
                let head = arena[n].energy_head_mut();
                head.left = None;
                head.right = None;
                head.size = 1;
                head.energy = 0;
            }

            // Climb the remaining levels.
            let mut upper_offset = upper;
            for level in 1..(levels - 1) {
                let lower_offset = upper_offset;
                upper_offset = full - (1usize << (levels - 1 - level)) + 1;
                let lower_size = upper_offset - lower_offset;

                let mut i = 0;
                while i < lower_size {
                    let parent = self.rebuild_buffer[upper_offset + i / 2];
                    let (a, b) = (
                        self.rebuild_buffer[lower_offset + i],
                        self.rebuild_buffer[lower_offset + i + 1],
                    );
                    let combined =
                        arena[a].energy_head().size + arena[b].energy_head().size + 1;
                    {
                        let head = arena[parent].energy_head_mut();
                        head.left = Some(a);
                        head.right = Some(b);
                        head.size = combined;
                        head.energy = 0;
                    }
                    arena[a].energy_head_mut().parent = Some(parent);
                    arena[b].energy_head_mut().parent = Some(parent);
                    i += 2;
                }
            }
        }

        // Splice the new subtree root where the old one stood.
        let new_root = self.rebuild_buffer[full - 1];
        {
            let head = arena[new_root].energy_head_mut();
            head.parent = original_parent;
            head.size = original_size;
            head.energy = 0;
        }
        match original_parent {
            None => self.root = Some(new_root),
            Some(p) => {
                if left_of(arena, p) == Some(node) {
                    arena[p].energy_head_mut().left = Some(new_root);
                } else {
                    debug_assert!(right_of(arena, p) == Some(node));
                    arena[p].energy_head_mut().right = Some(new_root);
                }
            }
        }
    }
}
