/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

use pretty_assertions::assert_eq;
use search_tree_rs::{DynSegTree, EventKind};

#[test]
fn intervals_lower_to_ordered_event_pairs() {
    let mut dst: DynSegTree<u64, &str> = DynSegTree::new();
    dst.insert(1, 3, "a");
    dst.insert(3, 5, "b");

    // Half-open adjacency: the end of [1,3) sorts before the start of
    // [3,5) at the shared point.
    let events: Vec<(u64, EventKind)> = dst.events().collect();
    assert_eq!(
        events,
        [
            (1, EventKind::Start),
            (3, EventKind::End),
            (3, EventKind::Start),
            (5, EventKind::End),
        ]
    );
    assert_eq!(dst.len(), 2);
    assert!(dst.verify_integrity());
}

#[test]
fn removal_returns_the_value_and_its_events() {
    let mut dst: DynSegTree<u64, u32> = DynSegTree::new();
    let a = dst.insert(10, 20, 1);
    let b = dst.insert(15, 25, 2);
    let c = dst.insert(5, 30, 3);
    assert_eq!(dst.len(), 3);
    assert!(dst.verify_integrity());

    assert_eq!(dst.remove(b), Some(2));
    assert_eq!(dst.len(), 2);
    assert!(dst.verify_integrity());

    let events: Vec<(u64, EventKind)> = dst.events().collect();
    assert_eq!(
        events,
        [
            (5, EventKind::Start),
            (10, EventKind::Start),
            (20, EventKind::End),
            (30, EventKind::End),
        ]
    );

    assert_eq!(dst.remove(a), Some(1));
    assert_eq!(dst.remove(c), Some(3));
    assert!(dst.is_empty());
    assert!(dst.verify_integrity());
}

#[test]
fn nested_and_duplicate_intervals() {
    let mut dst: DynSegTree<u64, u32> = DynSegTree::new();
    let outer = dst.insert(0, 100, 0);
    let mut handles = Vec::new();
    for i in 0..10 {
        handles.push(dst.insert(i, i + 1, i as u32));
        // The same interval twice is fine; events disambiguate by
        // insertion sequence.
        handles.push(dst.insert(i, i + 1, i as u32));
    }
    assert_eq!(dst.len(), 21);
    assert!(dst.verify_integrity());

    for handle in handles {
        dst.remove(handle);
    }
    assert_eq!(dst.len(), 1);
    assert!(dst.verify_integrity());

    dst.remove(outer);
    assert!(dst.is_empty());
}

#[test]
fn clear_drops_all_events() {
    let mut dst: DynSegTree<u64, ()> = DynSegTree::new();
    for i in 0..8 {
        dst.insert(i, i + 2, ());
    }
    dst.clear();

    assert!(dst.is_empty());
    assert_eq!(dst.events().count(), 0);
    assert!(dst.verify_integrity());
}
