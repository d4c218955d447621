/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

use pretty_assertions::assert_eq;
use search_tree_rs::debug::{energy_depth, energy_structure};
use search_tree_rs::{Arena, EnergyEntry, EnergyTree};

use crate::common::{EnergyItem, build_energy_tree};

fn keys_in_order(tree: &EnergyTree<EnergyItem>, arena: &Arena<EnergyItem>) -> Vec<u64> {
    tree.iter(arena).map(|(_, item)| item.key).collect()
}

#[test]
fn sequential_inserts_trigger_a_full_rebuild() {
    // Ascending keys are the degenerate case for a plain BST; the energy
    // potential forces periodic rebuilds, and the fifteenth insert lands a
    // whole-tree rebuild into the perfect 4-level shape.
    let keys: Vec<u64> = (1..=15).collect();
    let (arena, tree, _) = build_energy_tree(&keys);

    assert_eq!(keys_in_order(&tree, &arena), keys);
    assert_eq!(tree.size(), Some(15));
    assert!(tree.verify_integrity(&arena));
    assert_eq!(energy_depth(&arena, tree.root()), 4);

    let root = tree.root().unwrap();
    assert_eq!(arena[root].key, 8);
    assert_eq!(arena[root].energy_head().size(), 15);
    assert_eq!(arena[root].energy_head().energy(), 0);

    // Every node of a freshly rebuilt tree holds zero energy, and sizes
    // follow the perfect shape.
    assert_eq!(
        energy_structure(&arena, tree.root(), |i| i.key.to_string()),
        "8/15/0(4/7/0(2/3/0(1/1/0,3/1/0),6/3/0(5/1/0,7/1/0)),\
         12/7/0(10/3/0(9/1/0,11/1/0),14/3/0(13/1/0,15/1/0)))"
    );
}

#[test]
fn interleaved_inserts_stay_balanced_enough() {
    let keys: Vec<u64> = (1..=200).collect();
    let (arena, tree, _) = build_energy_tree(&keys);

    assert_eq!(keys_in_order(&tree, &arena), keys);
    assert!(tree.verify_integrity(&arena));
    // 200 nodes, energy bound 2e <= s everywhere: the depth cannot reach
    // anywhere near the degenerate 200. A loose sanity bound is enough.
    assert!(energy_depth(&arena, tree.root()) <= 32);
}

#[test]
fn removals_splice_the_neighbour_in() {
    let (mut arena, mut tree, nodes) = build_energy_tree(&[1, 2, 3, 4, 5, 6, 7]);
    let by_key = |key: u64, arena: &Arena<EnergyItem>| {
        *nodes.iter().find(|&&n| arena[n].key == key).unwrap()
    };

    // Interior node with two children.
    let four = by_key(4, &arena);
    tree.remove(&mut arena, four);
    assert_eq!(keys_in_order(&tree, &arena), [1, 2, 3, 5, 6, 7]);
    assert!(tree.verify_integrity(&arena));

    // Leaf.
    let one = by_key(1, &arena);
    tree.remove(&mut arena, one);
    assert_eq!(keys_in_order(&tree, &arena), [2, 3, 5, 6, 7]);
    assert!(tree.verify_integrity(&arena));

    // Root.
    let root = tree.root().unwrap();
    tree.remove(&mut arena, root);
    assert_eq!(tree.size(), Some(4));
    assert!(tree.verify_integrity(&arena));
}

#[test]
fn removing_everything_empties_the_tree() {
    let keys: Vec<u64> = (1..=40).collect();
    let (mut arena, mut tree, nodes) = build_energy_tree(&keys);

    for node in nodes {
        tree.remove(&mut arena, node);
        assert!(tree.verify_integrity(&arena));
    }
    assert!(tree.is_empty());
    assert_eq!(tree.size(), Some(0));
    assert_eq!(keys_in_order(&tree, &arena), Vec::<u64>::new());
}

#[test]
fn duplicate_keys_form_a_multiset() {
    let (arena, tree, _) = build_energy_tree(&[5, 3, 5, 5, 3, 9]);

    assert_eq!(keys_in_order(&tree, &arena), [3, 3, 5, 5, 5, 9]);
    assert_eq!(tree.size(), Some(6));
    assert!(tree.verify_integrity(&arena));
}

#[test]
fn iteration_both_ways_and_from_a_node() {
    let (arena, tree, nodes) = build_energy_tree(&[4, 2, 6, 1, 3, 5, 7]);

    let reversed: Vec<u64> = tree.iter_rev(&arena).map(|(_, i)| i.key).collect();
    assert_eq!(reversed, [7, 6, 5, 4, 3, 2, 1]);

    assert_eq!(arena[tree.first(&arena).unwrap()].key, 1);
    assert_eq!(arena[tree.last(&arena).unwrap()].key, 7);

    let five = *nodes.iter().find(|&&n| arena[n].key == 5).unwrap();
    let tail: Vec<u64> = tree.iter_from(&arena, five).map(|(_, i)| i.key).collect();
    assert_eq!(tail, [5, 6, 7]);
}

#[test]
fn reinsertion_after_clear() {
    let (mut arena, mut tree, _) = build_energy_tree(&[1, 2, 3]);
    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.size(), Some(0));

    let node = arena.insert(EnergyItem::new(42));
    tree.insert(&mut arena, node);
    assert_eq!(keys_in_order(&tree, &arena), [42]);
    assert!(tree.verify_integrity(&arena));
}
