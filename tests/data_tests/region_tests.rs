//! Tests for the Data region
//!
//! These tests verify:
//! - size() tracks writes
//! - Offset reads with short reads past the end
//! - Offset writes: overwrite, extend, zero-filled gaps

use itemstore::{Item, Storage};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_item(name: &str) -> (TempDir, Storage, Item) {
    let temp_dir = TempDir::new().unwrap();
    let storage = Storage::open_path(temp_dir.path()).unwrap();
    let item = storage.create(name).unwrap();
    (temp_dir, storage, item)
}

// =============================================================================
// Size Tests
// =============================================================================

#[test]
fn test_size_of_new_item_is_zero() {
    let (_temp, _storage, mut item) = setup_item("z");

    assert_eq!(item.data.size().unwrap(), 0);
}

#[test]
fn test_size_grows_with_writes() {
    let (_temp, _storage, mut item) = setup_item("z");

    item.data.write(b"hello", 0).unwrap();
    assert_eq!(item.data.size().unwrap(), 5);

    item.data.write(b"!!", 10).unwrap();
    assert_eq!(item.data.size().unwrap(), 12);
}

#[test]
fn test_size_unchanged_by_overwrite_inside() {
    let (_temp, _storage, mut item) = setup_item("z");

    item.data.write(b"0123456789", 0).unwrap();
    item.data.write(b"ab", 3).unwrap();

    assert_eq!(item.data.size().unwrap(), 10);
}

// =============================================================================
// Write Tests
// =============================================================================

#[test]
fn test_write_returns_byte_count() {
    let (_temp, _storage, mut item) = setup_item("w");

    assert_eq!(item.data.write(b"hello", 0).unwrap(), 5);
    assert_eq!(item.data.write(b"", 3).unwrap(), 0);
}

#[test]
fn test_write_overwrites_range() {
    let (_temp, _storage, mut item) = setup_item("w");

    item.data.write(b"0123456789", 0).unwrap();
    item.data.write(b"ab", 3).unwrap();

    assert_eq!(&item.data.read(0, 10).unwrap()[..], b"012ab56789");
}

#[test]
fn test_write_past_end_zero_fills_gap() {
    let (_temp, _storage, mut item) = setup_item("w");

    item.data.write(b"hello", 0).unwrap();
    item.data.write(b"!!", 10).unwrap();

    assert_eq!(&item.data.read(5, 5).unwrap()[..], &[0u8; 5]);
    assert_eq!(&item.data.read(10, 2).unwrap()[..], b"!!");
}

#[test]
fn test_write_straddling_end_extends() {
    let (_temp, _storage, mut item) = setup_item("w");

    item.data.write(b"abcd", 0).unwrap();
    item.data.write(b"XYZ", 2).unwrap();

    assert_eq!(item.data.size().unwrap(), 5);
    assert_eq!(&item.data.read(0, 5).unwrap()[..], b"abXYZ");
}

#[test]
fn test_write_chunks_out_of_order() {
    let (_temp, _storage, mut item) = setup_item("w");
    let chunk_a = vec![b'a'; 4096];
    let chunk_b = vec![b'b'; 4096];
    let chunk_c = vec![b'c'; 100];

    // Upload pieces arriving out of order
    item.data.write(&chunk_c, 8192).unwrap();
    item.data.write(&chunk_a, 0).unwrap();
    item.data.write(&chunk_b, 4096).unwrap();

    assert_eq!(item.data.size().unwrap(), 8292);
    assert_eq!(&item.data.read(0, 4096).unwrap()[..], &chunk_a[..]);
    assert_eq!(&item.data.read(4096, 4096).unwrap()[..], &chunk_b[..]);
    assert_eq!(&item.data.read(8192, 4096).unwrap()[..], &chunk_c[..]);
}

// =============================================================================
// Read Tests
// =============================================================================

#[test]
fn test_read_exact_range() {
    let (_temp, _storage, mut item) = setup_item("r");
    item.data.write(b"hello world", 0).unwrap();

    assert_eq!(&item.data.read(6, 5).unwrap()[..], b"world");
}

#[test]
fn test_read_clipped_at_end() {
    let (_temp, _storage, mut item) = setup_item("r");
    item.data.write(b"hello", 0).unwrap();

    assert_eq!(&item.data.read(3, 100).unwrap()[..], b"lo");
}

#[test]
fn test_read_at_or_past_end_is_empty() {
    let (_temp, _storage, mut item) = setup_item("r");
    item.data.write(b"hello", 0).unwrap();

    assert!(item.data.read(5, 10).unwrap().is_empty());
    assert!(item.data.read(1000, 10).unwrap().is_empty());
}

#[test]
fn test_read_zero_length() {
    let (_temp, _storage, mut item) = setup_item("r");
    item.data.write(b"hello", 0).unwrap();

    assert!(item.data.read(0, 0).unwrap().is_empty());
}

#[test]
fn test_read_huge_length_does_not_overallocate() {
    let (_temp, _storage, mut item) = setup_item("r");
    item.data.write(b"tiny", 0).unwrap();

    assert_eq!(&item.data.read(0, usize::MAX).unwrap()[..], b"tiny");
}

#[test]
fn test_read_empty_region() {
    let (_temp, _storage, mut item) = setup_item("r");

    assert!(item.data.read(0, 16).unwrap().is_empty());
}

#[test]
fn test_reads_through_read_only_handle() {
    let (_temp, storage, mut item) = setup_item("r");
    item.data.write(b"shared bytes", 0).unwrap();
    item.close().unwrap();

    let mut reader = storage.open("r").unwrap();

    assert_eq!(reader.data.size().unwrap(), 12);
    assert_eq!(&reader.data.read(7, 5).unwrap()[..], b"bytes");
}

#[test]
fn test_sync_is_harmless() {
    let (_temp, _storage, mut item) = setup_item("s");
    item.data.write(b"durable", 0).unwrap();

    item.data.sync().unwrap();

    assert_eq!(item.data.size().unwrap(), 7);
}
