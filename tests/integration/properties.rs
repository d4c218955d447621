/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Model-based properties: the trees must behave like their obvious
//! `std` counterparts under any operation sequence, and every mutation
//! must preserve the structural invariants.

use std::collections::BTreeMap;

use proptest::prelude::*;
use search_tree_rs::{Arena, EnergyTree, IntervalTree, RbTree};

use crate::common::{EnergyItem, Item, Span};

/// Operations on a small key domain so duplicates and re-insertion get
/// exercised constantly.
#[derive(proptest_derive::Arbitrary, Debug, Clone)]
enum Op {
    Insert(#[proptest(strategy = "0u64..24")] u64),
    Remove(#[proptest(strategy = "0u64..24")] u64),
}

proptest! {
    /// The red-black tree behaves like a `BTreeMap<u64, usize>` counting
    /// multiset: same membership, same in-order multiset, invariants after
    /// every step.
    #[test]
    fn rbtree_matches_a_counting_btreemap(ops: Vec<Op>) {
        let mut arena = Arena::new();
        let mut tree = RbTree::<Item>::new();
        let mut model: BTreeMap<u64, usize> = BTreeMap::new();

        for op in &ops {
            match op {
                Op::Insert(key) => {
                    let node = arena.insert(Item::new(*key));
                    tree.insert(&mut arena, node);
                    *model.entry(*key).or_insert(0) += 1;
                }
                Op::Remove(key) => match tree.find(&arena, key) {
                    Some(node) => {
                        tree.remove(&mut arena, node);
                        let count = model.get_mut(key).unwrap();
                        *count -= 1;
                        if *count == 0 {
                            model.remove(key);
                        }
                    }
                    None => prop_assert!(!model.contains_key(key)),
                },
            }
            prop_assert!(tree.verify_integrity(&arena));
        }

        let got: Vec<u64> = tree.iter(&arena).map(|(_, item)| item.key).collect();
        let expected: Vec<u64> = model
            .iter()
            .flat_map(|(&key, &count)| std::iter::repeat(key).take(count))
            .collect();
        prop_assert_eq!(tree.size(), Some(expected.len()));
        prop_assert_eq!(got, expected);
    }

    /// The energy tree maintains the same multiset, plus its own size and
    /// energy bookkeeping (checked inside `verify_integrity`).
    #[test]
    fn energy_tree_matches_a_sorted_multiset(ops: Vec<Op>) {
        let mut arena = Arena::new();
        let mut tree = EnergyTree::<EnergyItem>::new();
        let mut model: Vec<u64> = Vec::new();

        for op in &ops {
            match op {
                Op::Insert(key) => {
                    let node = arena.insert(EnergyItem::new(*key));
                    tree.insert(&mut arena, node);
                    model.push(*key);
                }
                Op::Remove(key) => {
                    let found = tree
                        .iter(&arena)
                        .find(|(_, item)| item.key == *key)
                        .map(|(node, _)| node);
                    match found {
                        Some(node) => {
                            tree.remove(&mut arena, node);
                            let at = model.iter().position(|&k| k == *key).unwrap();
                            model.swap_remove(at);
                        }
                        None => prop_assert!(!model.contains(key)),
                    }
                }
            }
            prop_assert!(tree.verify_integrity(&arena));
        }

        let got: Vec<u64> = tree.iter(&arena).map(|(_, item)| item.key).collect();
        model.sort_unstable();
        prop_assert_eq!(tree.size(), Some(model.len()));
        prop_assert_eq!(got, model);
    }

    /// Overlap queries agree with brute force over the stored set.
    #[test]
    fn interval_queries_match_brute_force(
        intervals in prop::collection::vec((0u64..20, 1u64..8), 0..24),
        queries in prop::collection::vec((0u64..26, 1u64..8), 1..16),
    ) {
        let mut arena = Arena::new();
        let mut tree = IntervalTree::<Span>::new();
        let mut model: Vec<(u64, u64)> = Vec::new();
        for &(start, len) in &intervals {
            let node = arena.insert(Span::new(start, start + len));
            tree.insert(&mut arena, node);
            model.push((start, start + len));
            prop_assert!(tree.verify_integrity(&arena));
        }
        model.sort_unstable();

        for &(start, len) in &queries {
            let (lower, upper) = (start, start + len);
            let got: Vec<(u64, u64)> = tree
                .query(&arena, lower..upper)
                .map(|(_, span)| (span.lower, span.upper))
                .collect();
            let expected: Vec<(u64, u64)> = model
                .iter()
                .copied()
                .filter(|&(a, b)| a < upper && lower < b)
                .collect();
            prop_assert_eq!(got, expected, "query [{}, {})", lower, upper);
        }
    }

    /// Inserting any key set and removing it again in any order leaves an
    /// empty tree.
    #[test]
    fn insert_then_remove_all_leaves_empty(
        keys in prop::collection::vec(0u64..32, 1..40),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 40),
    ) {
        let mut arena = Arena::new();
        let mut tree = RbTree::<Item>::new();
        let mut remaining = Vec::new();
        for &key in &keys {
            let node = arena.insert(Item::new(key));
            tree.insert(&mut arena, node);
            remaining.push(node);
        }

        let mut step = 0;
        while !remaining.is_empty() {
            let at = picks[step % picks.len()].index(remaining.len());
            step += 1;
            let node = remaining.swap_remove(at);
            tree.remove(&mut arena, node);
            prop_assert!(tree.verify_integrity(&arena));
        }

        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.size(), Some(0));
        prop_assert!(tree.iter(&arena).next().is_none());
    }
}
