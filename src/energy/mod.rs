/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! The energy tree: a weight-balanced BST that amortizes rebalancing into
//! occasional whole-subtree rebuilds.
//!
//! Instead of rotating, every node carries a `size` and an `energy` counter.
//! Each insert or remove charges one unit of energy to every node whose
//! subtree it touches. Once a node's energy exceeds half its subtree size it
//! is *overcharged*, and the shallowest overcharged node's subtree is
//! rebuilt in place into a complete binary tree, discharging the stored
//! potential. Summing energies as a potential function yields O(log n)
//! amortized insert and remove.
//!
//! The tree is always a multiset: equal keys descend left.

mod rebuild;

use std::marker::PhantomData;

use crate::arena::{Arena, Link, NodeIndex};
use crate::compare::{KeyCompare, TreeCompare};
use crate::iter::{Forward, InOrderIter, LinkView, Reverse, leftmost, rightmost};
use crate::options::{SizeCountStorage, TreeOptions};

/// The embedded energy-tree header: three structural links plus the subtree
/// size and the accumulated energy counter.
#[derive(Debug, Clone, Copy)]
pub struct EnergyHead {
    pub(crate) left: Link,
    pub(crate) right: Link,
    pub(crate) parent: Link,
    pub(crate) size: usize,
    pub(crate) energy: usize,
}

impl EnergyHead {
    /// An unlinked head.
    pub fn new() -> Self {
        Self {
            left: None,
            right: None,
            parent: None,
            size: 0,
            energy: 0,
        }
    }

    /// Left child.
    pub fn left(&self) -> Link {
        self.left
    }

    /// Right child.
    pub fn right(&self) -> Link {
        self.right
    }

    /// Parent.
    pub fn parent(&self) -> Link {
        self.parent
    }

    /// Number of nodes in the subtree rooted here, this node included.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Structural work charged to this subtree since its last rebuild.
    pub fn energy(&self) -> usize {
        self.energy
    }
}

impl Default for EnergyHead {
    fn default() -> Self {
        Self::new()
    }
}

/// An entry that embeds an [`EnergyHead`] and can be linked into an
/// [`EnergyTree`].
pub trait EnergyEntry {
    /// Option bundle; the energy tree only consults the size-counter
    /// choice. Duplicates are always admitted.
    type Options: TreeOptions;

    /// The embedded header.
    fn energy_head(&self) -> &EnergyHead;
    /// The embedded header, mutably.
    fn energy_head_mut(&mut self) -> &mut EnergyHead;
}

/// Links taken from the entry's [`EnergyHead`].
#[derive(Debug)]
pub struct EnergyLinks;

impl<T: EnergyEntry> LinkView<T> for EnergyLinks {
    fn left(entry: &T) -> Link {
        entry.energy_head().left
    }

    fn right(entry: &T) -> Link {
        entry.energy_head().right
    }

    fn parent(entry: &T) -> Link {
        entry.energy_head().parent
    }
}

fn left_of<T: EnergyEntry>(arena: &Arena<T>, n: NodeIndex) -> Link {
    arena[n].energy_head().left
}

fn right_of<T: EnergyEntry>(arena: &Arena<T>, n: NodeIndex) -> Link {
    arena[n].energy_head().right
}

fn parent_of<T: EnergyEntry>(arena: &Arena<T>, n: NodeIndex) -> Link {
    arena[n].energy_head().parent
}

/// Whether `2 * energy > size`, the integer form of the `energy > 0.5·size`
/// overcharge threshold.
fn overcharged<T: EnergyEntry>(arena: &Arena<T>, n: NodeIndex) -> bool {
    let head = arena[n].energy_head();
    2 * head.energy > head.size
}

/// An intrusive weight-balanced multiset over entries stored in an
/// [`Arena`]. No rotations; see the module docs for the rebuild scheme.
///
/// # Iterator caveat
///
/// A rebuild relinks every node of the rebuilt subtree. Node identities are
/// stable (entries never move), but any in-flight traversal state is
/// meaningless afterwards — reacquire iterators after every `insert` or
/// `remove`.
pub struct EnergyTree<T: EnergyEntry, C = KeyCompare> {
    root: Link,
    /// Scratch space for rebuilds, indexed by level-ordered in-order
    /// position. Grows to the largest rebuild seen and is never shrunk.
    rebuild_buffer: Vec<NodeIndex>,
    size: <T::Options as TreeOptions>::SizeCount,
    _marker: PhantomData<C>,
}

impl<T: EnergyEntry, C> EnergyTree<T, C> {
    /// An empty tree.
    pub fn new() -> Self {
        Self {
            root: None,
            rebuild_buffer: Vec::new(),
            size: Default::default(),
            _marker: PhantomData,
        }
    }

    /// The root node, if any.
    pub fn root(&self) -> Link {
        self.root
    }

    /// Whether the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of linked entries, or `None` unless the option bundle enables
    /// `CONSTANT_TIME_SIZE`.
    pub fn size(&self) -> Option<usize> {
        self.size.value()
    }

    /// Unlink everything at once. Entries stay in the arena with stale
    /// headers.
    pub fn clear(&mut self) {
        self.root = None;
        self.size.reset();
    }

    /// The in-order first entry.
    pub fn first(&self, arena: &Arena<T>) -> Link {
        self.root.map(|r| leftmost::<T, EnergyLinks>(arena, r))
    }

    /// The in-order last entry.
    pub fn last(&self, arena: &Arena<T>) -> Link {
        self.root.map(|r| rightmost::<T, EnergyLinks>(arena, r))
    }

    /// In-order ascending traversal. See the type docs for the rebuild
    /// caveat.
    pub fn iter<'a>(&self, arena: &'a Arena<T>) -> InOrderIter<'a, T, EnergyLinks, Forward> {
        InOrderIter::new(arena, self.root)
    }

    /// In-order descending traversal.
    pub fn iter_rev<'a>(&self, arena: &'a Arena<T>) -> InOrderIter<'a, T, EnergyLinks, Reverse> {
        InOrderIter::new(arena, self.root)
    }

    /// Ascending traversal starting at (and including) a linked entry.
    pub fn iter_from<'a>(
        &self,
        arena: &'a Arena<T>,
        node: NodeIndex,
    ) -> InOrderIter<'a, T, EnergyLinks, Forward> {
        InOrderIter::from_node(arena, node)
    }
}

impl<T, C> EnergyTree<T, C>
where
    T: EnergyEntry,
    C: TreeCompare<T>,
{
    /// Link `node` into the tree. O(log n) amortized.
    ///
    /// Every node on the descent path is charged one unit of energy; if any
    /// of them ends up overcharged, the shallowest one's subtree is rebuilt
    /// before returning.
    pub fn insert(&mut self, arena: &mut Arena<T>, node: NodeIndex) {
        {
            let head = arena[node].energy_head_mut();
            head.left = None;
            head.right = None;
            head.size = 1;
            head.energy = 0;
        }

        let Some(mut cur) = self.root else {
            arena[node].energy_head_mut().parent = None;
            self.root = Some(node);
            self.size.increment();
            return;
        };

        let mut rebuild_at: Link = None;
        loop {
            {
                let head = arena[cur].energy_head_mut();
                head.size += 1;
                head.energy += 1;
            }
            if rebuild_at.is_none() && overcharged(arena, cur) {
                rebuild_at = Some(cur);
            }

            if C::less(&arena[cur], &arena[node]) {
                match right_of(arena, cur) {
                    Some(r) => cur = r,
                    None => {
                        arena[cur].energy_head_mut().right = Some(node);
                        arena[node].energy_head_mut().parent = Some(cur);
                        break;
                    }
                }
            } else {
                // Equal keys descend left.
                match left_of(arena, cur) {
                    Some(l) => cur = l,
                    None => {
                        arena[cur].energy_head_mut().left = Some(node);
                        arena[node].energy_head_mut().parent = Some(cur);
                        break;
                    }
                }
            }
        }

        self.size.increment();

        if let Some(r) = rebuild_at {
            self.rebuild_below(arena, r);
        }

        #[cfg(feature = "unittest")]
        debug_assert!(self.verify_integrity(arena));
    }

    /// Unlink `node` from the tree. O(log n) amortized.
    ///
    /// Ancestors are charged first (the shallowest overcharged one claims
    /// the rebuild), then the node is replaced by the largest entry of its
    /// left subtree when one exists, otherwise the smallest of its right
    /// subtree. The spliced successor inherits the removed node's links and
    /// counters, adjusted by one.
    pub fn remove(&mut self, arena: &mut Arena<T>, node: NodeIndex) {
        let mut rebuild_at: Link = None;
        let mut rebuild_set_upwards = false;

        let mut cur = node;
        while let Some(p) = parent_of(arena, cur) {
            {
                let head = arena[p].energy_head_mut();
                head.size -= 1;
                head.energy += 1;
            }
            if overcharged(arena, p) {
                // Overwrite on purpose: the walk goes upward, so the last
                // hit is the shallowest.
                rebuild_at = Some(p);
                rebuild_set_upwards = true;
            }
            cur = p;
        }

        let (node_left, node_right) = (left_of(arena, node), right_of(arena, node));
        if node_left.is_none() && node_right.is_none() {
            // A leaf just detaches.
            match parent_of(arena, node) {
                None => self.root = None,
                Some(p) => {
                    if left_of(arena, p) == Some(node) {
                        arena[p].energy_head_mut().left = None;
                    } else {
                        debug_assert!(right_of(arena, p) == Some(node));
                        arena[p].energy_head_mut().right = None;
                    }
                }
            }
        } else {
            let successor = if let Some(l) = node_left {
                // Largest of the smaller-or-equal children.
                let mut child = l;
                while let Some(r) = right_of(arena, child) {
                    {
                        let head = arena[child].energy_head_mut();
                        head.size -= 1;
                        head.energy += 1;
                    }
                    if rebuild_at.is_none() && overcharged(arena, child) {
                        rebuild_at = Some(child);
                    }
                    child = r;
                }

                if child != l {
                    // Splice the successor out of the left subtree and give
                    // it the removed node's left child.
                    let Some(cp) = parent_of(arena, child) else {
                        debug_assert!(false, "successor below node lost its parent");
                        return;
                    };
                    let child_left = left_of(arena, child);
                    arena[cp].energy_head_mut().right = child_left;
                    if let Some(cl) = child_left {
                        arena[cl].energy_head_mut().parent = Some(cp);
                    }
                    arena[child].energy_head_mut().left = Some(l);
                    arena[l].energy_head_mut().parent = Some(child);
                }
                // The successor has no right child; it takes over the
                // removed node's.
                arena[child].energy_head_mut().right = node_right;
                if let Some(nr) = node_right {
                    arena[nr].energy_head_mut().parent = Some(child);
                }
                child
            } else {
                // No left subtree: smallest of the greater-or-equal
                // children. It keeps `node`'s (empty) left side.
                let Some(r) = node_right else {
                    debug_assert!(false, "non-leaf node without children");
                    return;
                };
                let mut child = r;
                while let Some(l) = left_of(arena, child) {
                    {
                        let head = arena[child].energy_head_mut();
                        head.size -= 1;
                        head.energy += 1;
                    }
                    if rebuild_at.is_none() && overcharged(arena, child) {
                        rebuild_at = Some(child);
                    }
                    child = l;
                }

                if child != r {
                    let Some(cp) = parent_of(arena, child) else {
                        debug_assert!(false, "successor below node lost its parent");
                        return;
                    };
                    let child_right = right_of(arena, child);
                    arena[cp].energy_head_mut().left = child_right;
                    if let Some(cr) = child_right {
                        arena[cr].energy_head_mut().parent = Some(cp);
                    }
                    arena[child].energy_head_mut().right = Some(r);
                    arena[r].energy_head_mut().parent = Some(child);
                }
                child
            };

            // Move the successor up to where the removed node was.
            let above = parent_of(arena, node);
            match above {
                None => self.root = Some(successor),
                Some(p) => {
                    if left_of(arena, p) == Some(node) {
                        arena[p].energy_head_mut().left = Some(successor);
                    } else {
                        debug_assert!(right_of(arena, p) == Some(node));
                        arena[p].energy_head_mut().right = Some(successor);
                    }
                }
            }
            let (node_size, node_energy) = {
                let head = arena[node].energy_head();
                (head.size, head.energy)
            };
            {
                let head = arena[successor].energy_head_mut();
                head.parent = above;
                head.size = node_size - 1;
                head.energy = node_energy + 1;
            }

            if !rebuild_set_upwards && overcharged(arena, successor) {
                rebuild_at = Some(successor);
            }
        }

        self.size.decrement();

        if let Some(r) = rebuild_at {
            self.rebuild_below(arena, r);
        }

        #[cfg(feature = "unittest")]
        debug_assert!(self.verify_integrity(arena));
    }

    /// Check every structural invariant: link reciprocity and acyclicity,
    /// multiset order, `size = 1 + size(left) + size(right)` at each node,
    /// no overcharged node, and (when maintained) the size counter.
    pub fn verify_integrity(&self, arena: &Arena<T>) -> bool {
        let mut count = 0usize;
        for (n, entry) in self.iter(arena) {
            count += 1;
            if count > arena.len() as usize {
                // Cycle: the walk outran the arena.
                return false;
            }

            let head = entry.energy_head();
            let mut children_size = 0;
            if let Some(l) = head.left {
                if l == n || parent_of(arena, l) != Some(n) {
                    return false;
                }
                // The left child may not be larger.
                if C::less(entry, &arena[l]) {
                    return false;
                }
                children_size += arena[l].energy_head().size;
            }
            if let Some(r) = head.right {
                if r == n || parent_of(arena, r) != Some(n) {
                    return false;
                }
                // The right child may not be smaller.
                if C::less(&arena[r], entry) {
                    return false;
                }
                children_size += arena[r].energy_head().size;
            }

            if head.size != children_size + 1 {
                return false;
            }
            if 2 * head.energy > head.size {
                return false;
            }
        }

        match self.size() {
            None => true,
            Some(size) => count == size,
        }
    }
}

impl<T: EnergyEntry, C> Default for EnergyTree<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: EnergyEntry, C> std::fmt::Debug for EnergyTree<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnergyTree")
            .field("root", &self.root)
            .field("size", &self.size.value())
            .finish()
    }
}
