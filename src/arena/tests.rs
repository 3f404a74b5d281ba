//! Tests for the region allocator and string store

use super::*;

/* ===================== Allocation ===================== */

#[test]
fn test_allocate_splits_first_block() {
    let mut arena: Arena<u8> = Arena::with_capacity(64);

    let a = arena.allocate(10).unwrap();
    let b = arena.allocate(20).unwrap();

    assert_eq!((a.offset(), a.size()), (0, 10));
    assert_eq!((b.offset(), b.size()), (10, 20));
    assert_eq!(arena.free_blocks(), vec![(30, 34)]);
    assert_eq!(arena.used(), 30);
}

#[test]
fn test_allocate_hands_out_small_remainder() {
    let mut arena: Arena<u8> = Arena::with_capacity(12);

    // Leftover of 2 slots is below MIN_BLOCK, so the whole region is granted
    let a = arena.allocate(10).unwrap();

    assert_eq!(a.size(), 12);
    assert!(arena.free_blocks().is_empty());
}

#[test]
fn test_allocate_zero_is_empty_block() {
    let mut arena: Arena<u8> = Arena::with_capacity(16);

    let empty = arena.allocate(0).unwrap();

    assert!(empty.is_empty());
    assert_eq!(arena.available(), 16);
    arena.release(empty).unwrap();
    assert_eq!(arena.free_blocks(), vec![(0, 16)]);
}

#[test]
fn test_allocate_out_of_memory() {
    let mut arena: Arena<u8> = Arena::with_capacity(32);
    arena.allocate(20).unwrap();

    let err = arena.allocate(20).unwrap_err();

    assert_eq!(
        err,
        ArenaError::OutOfMemory {
            requested: 20,
            largest_free: 12
        }
    );
}

#[test]
fn test_allocate_reuses_released_hole() {
    let mut arena: Arena<u8> = Arena::with_capacity(64);
    let a = arena.allocate(16).unwrap();
    let _b = arena.allocate(16).unwrap();

    arena.release(a).unwrap();
    let c = arena.allocate(8).unwrap();

    assert_eq!(c.offset(), 0);
    assert_eq!(arena.free_blocks(), vec![(8, 8), (32, 32)]);
}

/* ===================== Release / Coalescing ===================== */

#[test]
fn test_fill_then_free_coalesces_to_one_block() {
    let mut arena: Arena<u32> = Arena::with_capacity(100);
    let blocks: Vec<Block> = (0..10).map(|_| arena.allocate(10).unwrap()).collect();
    assert_eq!(arena.available(), 0);

    // Interleaved order: evens first, then odds back to front
    for block in blocks.iter().step_by(2) {
        arena.release(*block).unwrap();
    }
    for block in blocks.iter().skip(1).step_by(2).rev() {
        arena.release(*block).unwrap();
    }

    assert_eq!(arena.free_blocks(), vec![(0, 100)]);
}

#[test]
fn test_release_merges_with_predecessor_and_successor() {
    let mut arena: Arena<u8> = Arena::with_capacity(48);
    let a = arena.allocate(16).unwrap();
    let b = arena.allocate(16).unwrap();
    let c = arena.allocate(16).unwrap();

    arena.release(a).unwrap();
    arena.release(c).unwrap();
    assert_eq!(arena.free_blocks(), vec![(0, 16), (32, 16)]);

    arena.release(b).unwrap();
    assert_eq!(arena.free_blocks(), vec![(0, 48)]);
}

#[test]
fn test_double_release_is_rejected() {
    let mut arena: Arena<u8> = Arena::with_capacity(32);
    let a = arena.allocate(8).unwrap();
    let _b = arena.allocate(8).unwrap();

    arena.release(a).unwrap();
    let err = arena.release(a).unwrap_err();

    assert_eq!(err, ArenaError::InvalidRelease { offset: 0, size: 8 });
    assert_eq!(arena.free_blocks(), vec![(0, 8), (16, 16)]);
}

#[test]
fn test_reset_frees_everything() {
    let mut arena: Arena<u8> = Arena::with_capacity(32);
    arena.allocate(8).unwrap();
    arena.allocate(8).unwrap();

    arena.reset();

    assert_eq!(arena.free_blocks(), vec![(0, 32)]);
}

/* ===================== Reallocation ===================== */

#[test]
fn test_reallocate_grows_in_place() {
    let mut arena: Arena<u8> = Arena::with_capacity(64);
    let a = arena.allocate(8).unwrap();
    arena.get_mut(a).copy_from_slice(b"abcdefgh");

    let grown = arena.reallocate(a, 16).unwrap();

    assert_eq!(grown.offset(), a.offset());
    assert_eq!(grown.size(), 16);
    assert_eq!(&arena.get(grown)[..8], b"abcdefgh");
    assert_eq!(arena.free_blocks(), vec![(16, 48)]);
}

#[test]
fn test_reallocate_in_place_keeps_neighbours_intact() {
    let mut arena: Arena<u8> = Arena::with_capacity(64);
    let a = arena.allocate(8).unwrap();
    let gap = arena.allocate(8).unwrap();
    let c = arena.allocate(8).unwrap();
    arena.get_mut(a).fill(b'a');
    arena.get_mut(c).fill(b'c');
    arena.release(gap).unwrap();

    let grown = arena.reallocate(a, 16).unwrap();

    assert_eq!(grown.offset(), 0);
    assert!(arena.get(grown)[..8].iter().all(|&b| b == b'a'));
    assert!(arena.get(c).iter().all(|&b| b == b'c'));
    assert_eq!(arena.free_blocks(), vec![(24, 40)]);
}

#[test]
fn test_reallocate_moves_when_successor_is_live() {
    let mut arena: Arena<u8> = Arena::with_capacity(64);
    let a = arena.allocate(8).unwrap();
    let b = arena.allocate(8).unwrap();
    arena.get_mut(a).copy_from_slice(b"12345678");
    arena.get_mut(b).fill(b'b');

    let moved = arena.reallocate(a, 12).unwrap();

    assert_eq!(moved.offset(), 16);
    assert_eq!(&arena.get(moved)[..8], b"12345678");
    assert!(arena.get(b).iter().all(|&x| x == b'b'));
    assert_eq!(arena.free_blocks(), vec![(0, 8), (28, 36)]);
}

#[test]
fn test_reallocate_shrinks_and_returns_tail() {
    let mut arena: Arena<u8> = Arena::with_capacity(64);
    let a = arena.allocate(32).unwrap();

    let shrunk = arena.reallocate(a, 8).unwrap();

    assert_eq!((shrunk.offset(), shrunk.size()), (0, 8));
    assert_eq!(arena.free_blocks(), vec![(8, 56)]);
}

#[test]
fn test_reallocate_failure_keeps_original() {
    let mut arena: Arena<u8> = Arena::with_capacity(16);
    let a = arena.allocate(8).unwrap();
    let _b = arena.allocate(8).unwrap();
    arena.get_mut(a).fill(7);

    assert!(arena.reallocate(a, 12).is_err());
    assert!(arena.get(a).iter().all(|&x| x == 7));
}

/* ===================== Strings ===================== */

#[test]
fn test_intern_returns_same_handle() {
    let mut store = StringStore::with_capacity(128);

    let a = store.intern("counter").unwrap();
    let b = store.intern("counter").unwrap();
    let c = store.intern("other").unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(store.get(a), "counter");
    assert_eq!(store.find("other"), Some(c));
    assert_eq!(store.find("missing"), None);
}

#[test]
fn test_alloc_is_not_interned() {
    let mut store = StringStore::with_capacity(128);

    let a = store.alloc("text").unwrap();
    let b = store.alloc("text").unwrap();

    assert_ne!(a, b);
    assert_eq!(store.find("text"), None);
}

#[test]
fn test_concat() {
    let mut store = StringStore::with_capacity(128);
    let hello = store.alloc("Hello, ").unwrap();
    let world = store.alloc("world").unwrap();

    let joined = store.concat(hello, world).unwrap();

    assert_eq!(store.get(joined), "Hello, world");
    assert_eq!(store.get(hello), "Hello, ");
}

#[test]
fn test_string_store_exhaustion() {
    let mut store = StringStore::with_capacity(8);

    assert!(store.alloc("12345678").is_ok());
    assert!(matches!(
        store.alloc("x"),
        Err(ArenaError::OutOfMemory { .. })
    ));
}
