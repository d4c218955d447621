/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

use pretty_assertions::assert_eq;
use rstest::rstest;
use search_tree_rs::debug::rb_structure;
use search_tree_rs::{
    Arena, ColorField, ColorInParent, CountedSize, DefaultOptions, EqDisabled, EqLinks,
    HashedRank, KeyedEntry, NodeIndex, RbEntry, RbHead, RbTree, TreeOptions,
};

struct Item {
    key: u64,
    head: RbHead<DefaultOptions>,
}

impl Item {
    fn new(key: u64) -> Self {
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

/// Duplicates disabled, no size counter.
struct UniqueOptions;

impl TreeOptions for UniqueOptions {
    type ParentColor = ColorField;
    type EqChain = EqDisabled;
    type SizeCount = search_tree_rs::UncountedSize;
    type ZipRank = HashedRank;
}

struct UniqueItem {
    key: u64,
    head: RbHead<UniqueOptions>,
}

impl UniqueItem {
    fn new(key: u64) -> Self {
        Self {
            key,
            head: RbHead::new(),
        }
    }
}

impl RbEntry for UniqueItem {
    type Options = UniqueOptions;

    fn rb_head(&self) -> &RbHead<UniqueOptions> {
        &self.head
    }

    fn rb_head_mut(&mut self) -> &mut RbHead<UniqueOptions> {
        &mut self.head
    }
}

impl KeyedEntry for UniqueItem {
    type Key = u64;

    fn key(&self) -> &u64 {
        &self.key
    }
}

/// Colour packed into the parent word, order queries enabled.
struct PackedOptions;

impl TreeOptions for PackedOptions {
    type ParentColor = ColorInParent;
    type EqChain = EqLinks;
    type SizeCount = CountedSize;
    type ZipRank = HashedRank;

    const ORDER_QUERIES: bool = true;
}

struct PackedItem {
    key: u64,
    head: RbHead<PackedOptions>,
}

impl PackedItem {
    fn new(key: u64) -> Self {
        Self {
            key,
            head: RbHead::new(),
        }
    }
}

impl RbEntry for PackedItem {
    type Options = PackedOptions;

    fn rb_head(&self) -> &RbHead<PackedOptions> {
        &self.head
    }

    fn rb_head_mut(&mut self) -> &mut RbHead<PackedOptions> {
        &mut self.head
    }
}

impl KeyedEntry for PackedItem {
    type Key = u64;

    fn key(&self) -> &u64 {
        &self.key
    }
}

fn build(keys: &[u64]) -> (Arena<Item>, RbTree<Item>, Vec<NodeIndex>) {
    let mut arena = Arena::new();
    let mut tree = RbTree::new();
    let mut nodes = Vec::new();
    for &key in keys {
        let node = arena.insert(Item::new(key));
        tree.insert(&mut arena, node);
        nodes.push(node);
    }
    (arena, tree, nodes)
}

fn keys_in_order(tree: &RbTree<Item>, arena: &Arena<Item>) -> Vec<u64> {
    tree.iter(arena).map(|(_, item)| item.key).collect()
}

#[test]
fn recolor_only_insert_sequence() {
    // Keys 10, 5, 15 settle by recolouring alone; 3 pushes one recolour up;
    // 7 finds its parent already black.
    let (arena, tree, _) = build(&[10, 5, 15, 3, 7]);

    assert_eq!(
        rb_structure(&arena, tree.root(), |i| i.key.to_string()),
        "10:B(5:B(3:R,7:R),15:B)"
    );
    assert_eq!(keys_in_order(&tree, &arena), [3, 5, 7, 10, 15]);
    assert_eq!(tree.size(), Some(5));
    assert!(tree.verify_integrity(&arena));
}

#[test]
fn delete_with_double_black_cascade() {
    let (mut arena, mut tree, nodes) = build(&[10, 5, 15, 3, 7]);
    let by_key = |key: u64, arena: &Arena<Item>| {
        *nodes.iter().find(|&&n| arena[n].key == key).unwrap()
    };

    // A red leaf just detaches.
    let three = by_key(3, &arena);
    tree.remove(&mut arena, three);
    assert_eq!(
        rb_structure(&arena, tree.root(), |i| i.key.to_string()),
        "10:B(5:B(·,7:R),15:B)"
    );
    assert!(tree.verify_integrity(&arena));

    // A black node with a lone red child promotes the child.
    let five = by_key(5, &arena);
    tree.remove(&mut arena, five);
    assert_eq!(
        rb_structure(&arena, tree.root(), |i| i.key.to_string()),
        "10:B(7:B,15:B)"
    );
    assert!(tree.verify_integrity(&arena));

    // Removing the root swaps in the successor and cascades a recolour.
    let ten = by_key(10, &arena);
    tree.remove(&mut arena, ten);
    assert_eq!(
        rb_structure(&arena, tree.root(), |i| i.key.to_string()),
        "15:B(7:R,·)"
    );
    assert_eq!(keys_in_order(&tree, &arena), [7, 15]);
    assert_eq!(tree.size(), Some(2));
    assert!(tree.verify_integrity(&arena));
}

#[test]
fn duplicate_chain_tracks_insertion_order() {
    let mut arena = Arena::new();
    let mut tree = RbTree::<Item>::new();
    let first = arena.insert(Item::new(5));
    let second = arena.insert(Item::new(5));
    let third = arena.insert(Item::new(5));
    for node in [first, second, third] {
        tree.insert(&mut arena, node);
    }
    assert_eq!(tree.size(), Some(3));
    assert!(tree.verify_integrity(&arena));

    // find() answers with the chain head; walking `next` lists the
    // duplicates oldest first.
    let head = tree.find(&arena, &5).unwrap();
    assert_eq!(head, first);
    let mut chain = vec![head];
    let mut cur = head;
    while let Some(next) = tree.equal_next(&arena, cur) {
        chain.push(next);
        cur = next;
    }
    assert_eq!(chain, [first, second, third]);

    // Removing the middle node leaves a reciprocal two-entry chain.
    tree.remove(&mut arena, second);
    assert_eq!(tree.size(), Some(2));
    assert!(tree.verify_integrity(&arena));

    let head = tree.find(&arena, &5).unwrap();
    assert_eq!(head, first);
    assert_eq!(tree.equal_next(&arena, first), Some(third));
    assert_eq!(tree.equal_prev(&arena, third), Some(first));
    assert_eq!(tree.equal_next(&arena, third), None);
    assert_eq!(tree.equal_prev(&arena, first), None);
}

#[test]
fn find_and_upper_bound() {
    let (arena, tree, _) = build(&[10, 5, 15, 3, 7]);

    let hit = tree.find(&arena, &7).unwrap();
    assert_eq!(arena[hit].key, 7);
    assert!(tree.find(&arena, &8).is_none());
    assert!(tree.contains(&arena, &15));

    let above = tree.upper_bound(&arena, &7).unwrap();
    assert_eq!(arena[above].key, 10);
    let above = tree.upper_bound(&arena, &1).unwrap();
    assert_eq!(arena[above].key, 3);
    // An upper bound of an existing key skips its whole equality run.
    let above = tree.upper_bound(&arena, &10).unwrap();
    assert_eq!(arena[above].key, 15);
    assert!(tree.upper_bound(&arena, &15).is_none());
}

#[test]
fn iteration_both_ways_and_from_a_node() {
    let (arena, tree, _) = build(&[4, 2, 6, 1, 3, 5, 7]);

    assert_eq!(keys_in_order(&tree, &arena), [1, 2, 3, 4, 5, 6, 7]);
    let reversed: Vec<u64> = tree.iter_rev(&arena).map(|(_, i)| i.key).collect();
    assert_eq!(reversed, [7, 6, 5, 4, 3, 2, 1]);

    assert_eq!(arena[tree.first(&arena).unwrap()].key, 1);
    assert_eq!(arena[tree.last(&arena).unwrap()].key, 7);

    let five = tree.find(&arena, &5).unwrap();
    let tail: Vec<u64> = tree.iter_from(&arena, five).map(|(_, i)| i.key).collect();
    assert_eq!(tail, [5, 6, 7]);
}

#[test]
fn hinted_insert_near_a_neighbour() {
    let (mut arena, mut tree, _) = build(&[10, 20, 30, 40, 50]);

    // Hint at the in-order neighbour of the final position.
    let hint = tree.find(&arena, &30).unwrap();
    let node = arena.insert(Item::new(25));
    tree.insert_hinted(&mut arena, node, Some(hint));

    assert_eq!(keys_in_order(&tree, &arena), [10, 20, 25, 30, 40, 50]);
    assert!(tree.verify_integrity(&arena));

    // Hinting at the successor works from either side of the position.
    let hint = tree.find(&arena, &50).unwrap();
    let node = arena.insert(Item::new(45));
    tree.insert_hinted(&mut arena, node, Some(hint));

    assert_eq!(keys_in_order(&tree, &arena), [10, 20, 25, 30, 40, 45, 50]);
    assert!(tree.verify_integrity(&arena));
}

#[test]
fn end_hinted_insert_is_right_biased() {
    let mut arena = Arena::new();
    let mut tree = RbTree::<Item>::new();

    // Ascending end-hinted insertion, duplicates included.
    for key in [1, 2, 2, 3, 4, 4, 5, 6, 7, 8] {
        let node = arena.insert(Item::new(key));
        tree.insert_hinted(&mut arena, node, None);
        assert!(tree.verify_integrity(&arena));
    }
    assert_eq!(keys_in_order(&tree, &arena), [1, 2, 2, 3, 4, 4, 5, 6, 7, 8]);
    assert_eq!(tree.size(), Some(10));
}

#[test]
fn clear_resets_without_touching_the_arena() {
    let (mut arena, mut tree, _) = build(&[1, 2, 3]);
    tree.clear();

    assert!(tree.is_empty());
    assert_eq!(tree.size(), Some(0));
    assert_eq!(keys_in_order(&tree, &arena), Vec::<u64>::new());
    // Entries are still in the arena and can be re-inserted.
    assert_eq!(arena.len(), 3);
    let node = arena.insert(Item::new(9));
    tree.insert(&mut arena, node);
    assert_eq!(keys_in_order(&tree, &arena), [9]);
}

#[test]
fn unique_options_refuse_duplicates() {
    let mut arena = Arena::new();
    let mut tree = RbTree::<UniqueItem>::new();

    let first = arena.insert(UniqueItem::new(7));
    tree.insert(&mut arena, first);
    let second = arena.insert(UniqueItem::new(7));
    tree.insert(&mut arena, second);

    // The second insert was a no-op; only one 7 is linked.
    let linked: Vec<NodeIndex> = tree.iter(&arena).map(|(n, _)| n).collect();
    assert_eq!(linked, [first]);
    // No counter with this bundle.
    assert_eq!(tree.size(), None);
    assert!(tree.verify_integrity(&arena));

    tree.remove(&mut arena, first);
    assert!(tree.is_empty());
}

#[test]
fn packed_colour_behaves_like_the_plain_field() {
    let mut arena = Arena::new();
    let mut tree = RbTree::<PackedItem>::new();
    let mut nodes = Vec::new();
    for key in [8, 4, 12, 2, 6, 10, 14, 1, 3, 5, 7] {
        let node = arena.insert(PackedItem::new(key));
        tree.insert(&mut arena, node);
        nodes.push(node);
        assert!(tree.verify_integrity(&arena));
    }

    let keys: Vec<u64> = tree.iter(&arena).map(|(_, i)| i.key).collect();
    assert_eq!(keys, [1, 2, 3, 4, 5, 6, 7, 8, 10, 12, 14]);

    for node in nodes {
        tree.remove(&mut arena, node);
        assert!(tree.verify_integrity(&arena));
    }
    assert!(tree.is_empty());
    assert_eq!(tree.size(), Some(0));
}

#[test]
fn order_queries_resolve_equal_entries_by_position() {
    let mut arena = Arena::new();
    let mut tree = RbTree::<PackedItem>::new();

    let small = arena.insert(PackedItem::new(1));
    let first = arena.insert(PackedItem::new(5));
    let second = arena.insert(PackedItem::new(5));
    for node in [small, first, second] {
        tree.insert(&mut arena, node);
    }

    assert!(tree.ordered_before(&arena, small, first));
    assert!(!tree.ordered_before(&arena, first, small));

    // Left-biased duplicates: the newer entry sits earlier in the tree.
    let order: Vec<NodeIndex> = tree.iter(&arena).map(|(n, _)| n).collect();
    let newer_first = order == vec![small, second, first];
    assert!(newer_first, "unexpected tree order {order:?}");
    assert!(tree.ordered_before(&arena, second, first));
    assert!(!tree.ordered_before(&arena, first, second));
}

#[rstest]
#[case(&[1, 2, 3, 4, 5, 6, 7])]
#[case(&[7, 6, 5, 4, 3, 2, 1])]
#[case(&[4, 2, 6, 1, 3, 5, 7])]
#[case(&[1, 7, 2, 6, 3, 5, 4])]
#[case(&[5, 5, 5, 1, 1, 9, 9])]
fn insertion_order_never_matters(#[case] keys: &[u64]) {
    let (arena, tree, _) = build(keys);

    let mut expected = keys.to_vec();
    expected.sort_unstable();
    assert_eq!(keys_in_order(&tree, &arena), expected);
    assert_eq!(tree.size(), Some(keys.len()));
    assert!(tree.verify_integrity(&arena));
}
