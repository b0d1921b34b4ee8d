//! Scenario tests for the public hollow heap API
//!
//! Each test drives the heap through a short, hand-picked sequence and checks
//! both the observable results and the internal structure after every step.

use hollow_heap::{HeapError, HollowHeap, Item, MeldableHeap};

/// Removes every item, checking the structure after each removal
fn drain<V>(heap: &mut HollowHeap<i32, V>) -> Vec<i32> {
    let mut keys = Vec::new();
    while let Some((key, item)) = heap.delete_min() {
        assert!(!item.is_live());
        heap.verify_structure().unwrap();
        keys.push(key);
    }
    keys
}

fn heap_of(keys: &[i32]) -> (HollowHeap<i32, i32>, Vec<Item<i32, i32>>) {
    let mut heap = HollowHeap::new();
    let items = keys.iter().map(|&k| heap.insert(k, k)).collect();
    (heap, items)
}

#[test]
fn test_sort_by_repeated_extraction() {
    let (mut heap, _) = heap_of(&[5, 3, 8, 1]);
    assert_eq!(drain(&mut heap), vec![1, 3, 5, 8]);
    assert!(heap.is_empty());
}

#[test]
fn test_decrease_key_effect() {
    let (mut heap, items) = heap_of(&[5, 3, 8, 1]);
    let eight = &items[2];

    heap.decrease_key(eight, 2).unwrap();
    heap.verify_structure().unwrap();
    assert_eq!(eight.key(), Ok(2));
    assert_eq!(*eight.value(), 8);

    // 1 is still smaller than the decreased key
    assert_eq!(heap.find_min(), Some(items[3].clone()));
    assert_eq!(heap.delete_min().map(|(k, _)| k), Some(1));

    assert_eq!(heap.find_min(), Some(eight.clone()));
    assert_eq!(heap.find_min().unwrap().key(), Ok(2));
    assert_eq!(drain(&mut heap), vec![2, 3, 5]);
}

#[test]
fn test_decrease_key_below_everything() {
    let (mut heap, items) = heap_of(&[5, 3, 8, 1]);
    heap.decrease_key(&items[2], 0).unwrap();
    assert_eq!(heap.find_min(), Some(items[2].clone()));
    assert_eq!(drain(&mut heap), vec![0, 1, 3, 5]);
}

#[test]
fn test_invalid_key_order_leaves_heap_unchanged() {
    let (mut heap, items) = heap_of(&[5, 3, 8, 1]);
    let before = heap.stats();

    assert_eq!(heap.decrease_key(&items[0], 6), Err(HeapError::InvalidKeyOrder));
    assert_eq!(heap.decrease_key(&items[3], 2), Err(HeapError::InvalidKeyOrder));

    assert_eq!(heap.stats(), before);
    let keys: Vec<_> = items.iter().map(|item| item.key().unwrap()).collect();
    assert_eq!(keys, vec![5, 3, 8, 1]);
    heap.verify_structure().unwrap();
    assert_eq!(drain(&mut heap), vec![1, 3, 5, 8]);
}

#[test]
fn test_post_removal_liveness() {
    let (mut heap, items) = heap_of(&[5, 3, 8, 1]);
    assert!(items.iter().all(Item::is_live));

    let (key, removed) = heap.delete_min().unwrap();
    assert_eq!(key, 1);
    assert_eq!(removed, items[3]);

    let one = &items[3];
    assert!(!one.is_live());
    assert_eq!(one.key(), Err(HeapError::ItemNotLive));
    assert_eq!(heap.decrease_key(one, 0), Err(HeapError::ItemNotLive));
    assert_eq!(*one.value(), 1);

    assert!(items[..3].iter().all(Item::is_live));
}

#[test]
fn test_not_live_is_reported_before_empty_heap() {
    let (mut heap, items) = heap_of(&[4]);
    heap.delete_min();
    assert!(heap.is_empty());
    assert_eq!(heap.decrease_key(&items[0], 1), Err(HeapError::ItemNotLive));
}

#[test]
fn test_find_min_is_idempotent() {
    let (mut heap, items) = heap_of(&[7, 2, 9]);
    heap.decrease_key(&items[2], 4).unwrap();
    let stats = heap.stats();

    let first = heap.find_min();
    for _ in 0..10 {
        assert_eq!(heap.find_min(), first);
    }
    assert_eq!(heap.stats(), stats);
    assert_eq!(heap.len(), 3);
    assert_eq!(first, Some(items[1].clone()));
}

#[test]
fn test_empty_heap_behaviour() {
    let mut heap: HollowHeap<i32, ()> = HollowHeap::new();
    assert_eq!(heap.find_min(), None);
    assert!(heap.delete_min().is_none());
    assert!(heap.is_empty());
    assert_eq!(heap.stats().delete_mins, 0);
    heap.verify_structure().unwrap();

    let item = heap.insert(1, ());
    assert_eq!(heap.find_min(), Some(item));
}

#[test]
fn test_merge_is_multiset_union() {
    let (mut left, _) = heap_of(&[1, 4, 4, 9]);
    let (right, _) = heap_of(&[0, 4, 7]);
    left.merge(right);
    assert_eq!(left.len(), 7);
    left.verify_structure().unwrap();
    assert_eq!(drain(&mut left), vec![0, 1, 4, 4, 4, 7, 9]);
}

#[test]
fn test_merge_keeps_handles_valid() {
    let (mut left, left_items) = heap_of(&[10, 20]);
    let (right, right_items) = heap_of(&[15, 25]);
    left.merge(right);

    left.decrease_key(&right_items[1], 5).unwrap();
    left.decrease_key(&left_items[1], 12).unwrap();
    left.verify_structure().unwrap();
    assert_eq!(drain(&mut left), vec![5, 10, 12, 15]);
    assert!(right_items.iter().chain(&left_items).all(|item| !item.is_live()));
}

#[test]
fn test_merge_after_decrease_keys() {
    let (mut left, left_items) = heap_of(&[30, 31, 32, 33]);
    let (mut right, right_items) = heap_of(&[40, 41, 42, 43]);
    left.decrease_key(&left_items[3], 3).unwrap();
    right.decrease_key(&right_items[2], 2).unwrap();
    left.delete_min();
    right.delete_min();

    left.merge(right);
    left.verify_structure().unwrap();
    assert_eq!(drain(&mut left), vec![30, 31, 32, 40, 41, 43]);
}

#[test]
fn test_duplicate_keys() {
    let (mut heap, items) = heap_of(&[3, 3, 3, 1, 1]);
    heap.decrease_key(&items[0], 1).unwrap();
    assert_eq!(drain(&mut heap), vec![1, 1, 1, 3, 3]);
}

#[test]
fn test_values_survive_extraction_in_key_order() {
    let mut heap = HollowHeap::new();
    for (key, name) in [(3, "c"), (1, "a"), (2, "b")] {
        heap.insert(key, name.to_string());
    }
    let names: Vec<String> =
        std::iter::from_fn(|| heap.delete_min().map(|(_, item)| item.value().clone())).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

/// Builds several stacked second-parent links: every live item is decreased
/// again while the nodes above it are themselves hollow.
#[test]
fn test_chained_second_parents() {
    let mut heap = HollowHeap::new();
    let mut live: Vec<(Item<i32, i32>, i32)> =
        (0..64).map(|k| (heap.insert(1000 + k, k), 1000 + k)).collect();

    // One extraction consolidates the flat root list into ranked trees.
    heap.insert(0, -1);
    heap.delete_min();
    heap.verify_structure().unwrap();

    for round in 0..4 {
        for (k, (item, key)) in live.iter_mut().enumerate().rev() {
            *key -= 100 + (k as i32 % 7) + round;
            heap.decrease_key(item, *key).unwrap();
            heap.verify_structure().unwrap();
        }

        let (key, removed) = heap.delete_min().unwrap();
        assert_eq!(key, live.iter().map(|(_, k)| *k).min().unwrap());
        let pos = live.iter().position(|(item, _)| *item == removed).unwrap();
        assert_eq!(live[pos].1, key);
        live.remove(pos);

        assert_eq!(heap.decrease_key(&removed, i32::MIN), Err(HeapError::ItemNotLive));
        heap.verify_structure().unwrap();
    }

    let mut expected: Vec<i32> = live.iter().map(|(_, k)| *k).collect();
    expected.sort_unstable();
    assert_eq!(drain(&mut heap), expected);
}
