/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Structural-event hooks.
//!
//! Augmented trees keep derived per-node data (such as the interval tree's
//! `max_upper`) consistent by observing every structural event the red-black
//! core performs. The core invokes the hooks below at fixed points:
//!
//! - [`leaf_inserted`](NodeTraits::leaf_inserted) right after a node is
//!   linked at a leaf position, before the insertion fix-up runs;
//! - [`rotated_left`](NodeTraits::rotated_left) /
//!   [`rotated_right`](NodeTraits::rotated_right) right *after* the rotation
//!   re-links, with the demoted former parent as argument, so the hook sees
//!   the node's new children;
//! - [`deleted_below`](NodeTraits::deleted_below) after a node is unlinked,
//!   with the highest node whose subtree shrank;
//! - [`swapped`](NodeTraits::swapped) after two nodes exchange structural
//!   positions.
//!
//! All hooks default to no-ops, so plain trees pay nothing.

use crate::arena::{Arena, NodeIndex};

/// Hooks a tree invokes on structural events. See the module docs for the
/// invocation points.
pub trait NodeTraits<T> {
    /// A node was linked at a leaf position.
    fn leaf_inserted(_arena: &mut Arena<T>, _node: NodeIndex) {}

    /// Recompute any derived data at `node`. Not called by the red-black
    /// core itself; layered structures use it for bulk fix-ups.
    fn fix_node(_arena: &mut Arena<T>, _node: NodeIndex) {}

    /// `node` was rotated left; it is now the left child of its former
    /// right child.
    fn rotated_left(_arena: &mut Arena<T>, _node: NodeIndex) {}

    /// `node` was rotated right; it is now the right child of its former
    /// left child.
    fn rotated_right(_arena: &mut Arena<T>, _node: NodeIndex) {}

    /// A node was unlinked somewhere below (or at a former child position
    /// of) `node`.
    fn deleted_below(_arena: &mut Arena<T>, _node: NodeIndex) {}

    /// `a` and `b` exchanged structural positions.
    fn swapped(_arena: &mut Arena<T>, _a: NodeIndex, _b: NodeIndex) {}

    /// A stable identifier for debug rendering.
    fn node_id(_arena: &Arena<T>, node: NodeIndex) -> u64 {
        u32::from(node) as u64
    }
}

/// The empty hook set.
#[derive(Debug)]
pub struct DefaultNodeTraits;

impl<T> NodeTraits<T> for DefaultNodeTraits {}
