/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Shared entry types for the integration suite.

use search_tree_rs::{
    Arena, DefaultOptions, EnergyEntry, EnergyHead, EnergyTree, IntervalEntry, IntervalHead,
    IntervalTree, KeyedEntry, NodeIndex, RbEntry, RbHead,
};

/// A keyed red-black entry.
pub struct Item {
    pub key: u64,
    head: RbHead<DefaultOptions>,
}

impl Item {
    pub fn new(key: u64) -> Self {
        Self {
            key,
            head: RbHead::new(),
        }
    }
}

impl RbEntry for Item {
    type Options = DefaultOptions;

    fn rb_head(&self) -> &RbHead<DefaultOptions> {
        &self.head
    }

    fn rb_head_mut(&mut self) -> &mut RbHead<DefaultOptions> {
        &mut self.head
    }
}

impl KeyedEntry for Item {
    type Key = u64;

    fn key(&self) -> &u64 {
        &self.key
    }
}

/// A keyed energy-tree entry.
pub struct EnergyItem {
    pub key: u64,
    head: EnergyHead,
}

impl EnergyItem {
    pub fn new(key: u64) -> Self {
        Self {
            key,
            head: EnergyHead::new(),
        }
    }
}

impl EnergyEntry for EnergyItem {
    type Options = DefaultOptions;

    fn energy_head(&self) -> &EnergyHead {
        &self.head
    }

    fn energy_head_mut(&mut self) -> &mut EnergyHead {
        &mut self.head
    }
}

impl KeyedEntry for EnergyItem {
    type Key = u64;

    fn key(&self) -> &u64 {
        &self.key
    }
}

/// A half-open interval entry.
pub struct Span {
    pub lower: u64,
    pub upper: u64,
    head: IntervalHead<u64, DefaultOptions>,
}

impl Span {
    pub fn new(lower: u64, upper: u64) -> Self {
        Self {
            lower,
            upper,
            head: IntervalHead::new(upper),
        }
    }
}

impl RbEntry for Span {
    type Options = DefaultOptions;

    fn rb_head(&self) -> &RbHead<DefaultOptions> {
        self.head.rb()
    }

    fn rb_head_mut(&mut self) -> &mut RbHead<DefaultOptions> {
        self.head.rb_mut()
    }
}

impl IntervalEntry for Span {
    type Endpoint = u64;

    fn lower(&self) -> u64 {
        self.lower
    }

    fn upper(&self) -> u64 {
        self.upper
    }

    fn interval_head(&self) -> &IntervalHead<u64, DefaultOptions> {
        &self.head
    }

    fn interval_head_mut(&mut self) -> &mut IntervalHead<u64, DefaultOptions> {
        &mut self.head
    }
}

/// Insert `(lower, upper)` pairs, returning the arena, tree, and nodes.
pub fn build_interval_tree(
    intervals: &[(u64, u64)],
) -> (Arena<Span>, IntervalTree<Span>, Vec<NodeIndex>) {
    let mut arena = Arena::new();
    let mut tree = IntervalTree::new();
    let mut nodes = Vec::new();
    for &(lower, upper) in intervals {
        let node = arena.insert(Span::new(lower, upper));
        tree.insert(&mut arena, node);
        nodes.push(node);
    }
    (arena, tree, nodes)
}

/// Insert keys into an energy tree, returning the arena, tree, and nodes.
pub fn build_energy_tree(keys: &[u64]) -> (Arena<EnergyItem>, EnergyTree<EnergyItem>, Vec<NodeIndex>) {
    let mut arena = Arena::new();
    let mut tree = EnergyTree::new();
    let mut nodes = Vec::new();
    for &key in keys {
        let node = arena.insert(EnergyItem::new(key));
        tree.insert(&mut arena, node);
        nodes.push(node);
    }
    (arena, tree, nodes)
}
