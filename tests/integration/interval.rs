/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

use pretty_assertions::assert_eq;
use search_tree_rs::{Arena, IntervalEntry, IntervalTree};

use crate::common::{Span, build_interval_tree};

fn query_pairs(
    tree: &IntervalTree<Span>,
    arena: &Arena<Span>,
    range: std::ops::Range<u64>,
) -> Vec<(u64, u64)> {
    tree.query(arena, range)
        .map(|(_, s)| (s.lower, s.upper))
        .collect()
}

#[test]
fn overlap_queries_are_half_open() {
    let (arena, tree, _) = build_interval_tree(&[(1, 5), (3, 7), (6, 9), (10, 12)]);
    assert!(tree.verify_integrity(&arena));

    // [4,6) touches the first two; [6,9) starts exactly at the query end
    // and is out by half-open rules.
    assert_eq!(query_pairs(&tree, &arena, 4..6), [(1, 5), (3, 7)]);
    assert_eq!(query_pairs(&tree, &arena, 11..20), [(10, 12)]);
    assert!(query_pairs(&tree, &arena, 20..30).is_empty());
    assert_eq!(
        query_pairs(&tree, &arena, 0..100),
        [(1, 5), (3, 7), (6, 9), (10, 12)]
    );
    // Endpoint adjacency in both directions.
    assert_eq!(query_pairs(&tree, &arena, 5..6), [(3, 7)]);
    assert!(query_pairs(&tree, &arena, 9..10).is_empty());
}

#[test]
fn tuple_queries_work_like_ranges() {
    let (arena, tree, _) = build_interval_tree(&[(1, 5), (3, 7), (6, 9), (10, 12)]);

    let pairs: Vec<(u64, u64)> = tree
        .query(&arena, (4u64, 6u64))
        .map(|(_, s)| (s.lower, s.upper))
        .collect();
    assert_eq!(pairs, [(1, 5), (3, 7)]);
}

#[test]
fn max_upper_survives_rotations() {
    // Ascending lowers force insertion fix-up rotations; the first
    // interval's huge upper endpoint must stay the root bound throughout.
    let intervals = [(1, 100), (2, 3), (3, 4), (4, 5), (5, 6)];
    let mut arena = Arena::new();
    let mut tree = IntervalTree::new();
    for &(lower, upper) in &intervals {
        let node = arena.insert(Span::new(lower, upper));
        tree.insert(&mut arena, node);
        assert!(tree.verify_integrity(&arena));
        let root = tree.root().unwrap();
        assert_eq!(arena[root].interval_head().max_upper(), 100);
    }

    // The wide interval overlaps any query inside it.
    assert_eq!(query_pairs(&tree, &arena, 50..60), [(1, 100)]);
}

#[test]
fn max_upper_shrinks_on_removal() {
    let (mut arena, mut tree, nodes) = build_interval_tree(&[(1, 100), (2, 3), (3, 4), (4, 5)]);

    // Dropping the wide interval must pull every bound back down.
    tree.remove(&mut arena, nodes[0]);
    assert!(tree.verify_integrity(&arena));
    assert!(query_pairs(&tree, &arena, 50..60).is_empty());
    assert_eq!(query_pairs(&tree, &arena, 2..4), [(2, 3), (3, 4)]);

    let root = tree.root().unwrap();
    assert_eq!(arena[root].interval_head().max_upper(), 5);
}

#[test]
fn duplicates_and_shared_lowers() {
    let (arena, tree, _) =
        build_interval_tree(&[(5, 10), (5, 10), (5, 8), (5, 12), (1, 3)]);
    assert!(tree.verify_integrity(&arena));

    // Ordered by lower endpoint, ties by upper.
    let all: Vec<(u64, u64)> = tree.iter(&arena).map(|(_, s)| (s.lower, s.upper)).collect();
    assert_eq!(all, [(1, 3), (5, 8), (5, 10), (5, 10), (5, 12)]);

    assert_eq!(
        query_pairs(&tree, &arena, 9..11),
        [(5, 10), (5, 10), (5, 12)]
    );
}

#[test]
fn find_by_exact_endpoints() {
    let (arena, tree, nodes) = build_interval_tree(&[(1, 5), (3, 7), (6, 9)]);

    let hit = tree.find(&arena, 3, 7).unwrap();
    assert_eq!(hit, nodes[1]);
    assert!(tree.find(&arena, 3, 8).is_none());
}

#[test]
fn removal_round_trip_keeps_queries_consistent() {
    let intervals: Vec<(u64, u64)> = (0..40).map(|i| (i, i + 3)).collect();
    let (mut arena, mut tree, nodes) = build_interval_tree(&intervals);

    // Remove every other interval and re-check a sweep of point queries
    // against the surviving set.
    for &node in nodes.iter().step_by(2) {
        tree.remove(&mut arena, node);
        assert!(tree.verify_integrity(&arena));
    }

    for point in 0..45u64 {
        let got = query_pairs(&tree, &arena, point..point + 1);
        let expected: Vec<(u64, u64)> = intervals
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 2 == 1)
            .map(|(_, &iv)| iv)
            .filter(|&(lower, upper)| lower <= point && point < upper)
            .collect();
        assert_eq!(got, expected, "point {point}");
    }

    assert_eq!(tree.size(), Some(20));
}
