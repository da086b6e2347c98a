use crate::{Arena, Id};

crate::identifier! {
    /// Key used only by these tests.
    struct Key
}

#[test]
fn test_alloc_hands_out_sequential_ids() {
    let mut arena: Arena<Key, &str> = Arena::default();
    assert!(arena.is_empty());

    let a = arena.alloc("a");
    let b = arena.alloc("b");

    assert_eq!(Id::from(a).raw(), 0);
    assert_eq!(Id::from(b).raw(), 1);
    assert_eq!(arena.len(), 2);
    assert_eq!(arena.next_id(), Key::from(Id(2)));
    assert_eq!(arena[a], "a");
    assert_eq!(arena.get(b), Some(&"b"));
}

#[test]
fn test_get_out_of_range_is_none() {
    let arena: Arena<Key, u32> = Arena::default();
    assert!(arena.get(Key::from(Id(3))).is_none());
}

#[test]
fn test_iter_pairs_ids_with_items() {
    let mut arena: Arena<Key, u32> = Arena::default();
    let ids: Vec<Key> = (10..13).map(|v| arena.alloc(v)).collect();

    let collected: Vec<(Key, u32)> = arena.iter().map(|(id, v)| (id, *v)).collect();
    assert_eq!(collected, vec![(ids[0], 10), (ids[1], 11), (ids[2], 12)]);
    assert_eq!(ids[2].to_string(), "%2");
}
