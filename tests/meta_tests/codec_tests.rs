//! Tests for the meta codec
//!
//! These tests verify:
//! - Empty input decodes to an empty map
//! - Header layout (magic, version, checksum, length)
//! - Deterministic encoding
//! - Every kind of damage is reported as CorruptMetadata

use std::collections::BTreeMap;

use itemstore::meta::{decode, encode, HEADER_SIZE, MAGIC, MAX_DEPTH, VERSION};
use itemstore::{MetaValue, StoreError};

// =============================================================================
// Helper Functions
// =============================================================================

fn sample_map() -> BTreeMap<String, MetaValue> {
    let mut map = BTreeMap::new();
    map.insert("filename".to_string(), MetaValue::from("photo.jpg"));
    map.insert("type".to_string(), MetaValue::from("image/jpeg"));
    map.insert("size".to_string(), MetaValue::from(123_456i64));
    map.insert("complete".to_string(), MetaValue::from(true));
    map
}

/// Wrap a raw bincode payload in a valid header
fn frame(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&crc32fast::hash(payload).to_le_bytes());
    out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Payload for `{"k": List([List([... Int(0) ...])])}` with `levels` lists
fn nested_list_payload(levels: usize) -> Vec<u8> {
    const LIST_VARIANT: u32 = 5;
    const INT_VARIANT: u32 = 1;

    let mut payload = Vec::with_capacity(17 + levels * 12 + 12);
    payload.extend_from_slice(&1u64.to_le_bytes()); // map entries
    payload.extend_from_slice(&1u64.to_le_bytes()); // key length
    payload.extend_from_slice(b"k");
    for _ in 0..levels {
        payload.extend_from_slice(&LIST_VARIANT.to_le_bytes());
        payload.extend_from_slice(&1u64.to_le_bytes()); // one element
    }
    payload.extend_from_slice(&INT_VARIANT.to_le_bytes());
    payload.extend_from_slice(&0i64.to_le_bytes());
    payload
}

fn nested_list(levels: usize) -> MetaValue {
    let mut value = MetaValue::Int(0);
    for _ in 0..levels {
        value = MetaValue::List(vec![value]);
    }
    value
}

fn assert_corrupt(bytes: &[u8]) {
    match decode(bytes) {
        Err(StoreError::CorruptMetadata(_)) => {}
        other => panic!("expected CorruptMetadata, got {:?}", other),
    }
}

// =============================================================================
// Encode Tests
// =============================================================================

#[test]
fn test_empty_input_is_empty_map() {
    assert!(decode(&[]).unwrap().is_empty());
}

#[test]
fn test_header_layout() {
    let encoded = encode(&sample_map()).unwrap();

    assert_eq!(&encoded[0..4], MAGIC);
    assert_eq!(u16::from_le_bytes([encoded[4], encoded[5]]), VERSION);

    let payload = &encoded[HEADER_SIZE..];
    let crc = u32::from_le_bytes(encoded[6..10].try_into().unwrap());
    let len = u64::from_le_bytes(encoded[10..18].try_into().unwrap());
    assert_eq!(crc, crc32fast::hash(payload));
    assert_eq!(len, payload.len() as u64);
}

#[test]
fn test_decode_recovers_sample() {
    let map = sample_map();

    assert_eq!(decode(&encode(&map).unwrap()).unwrap(), map);
}

#[test]
fn test_encoding_is_deterministic() {
    let mut forward = BTreeMap::new();
    let mut backward = BTreeMap::new();
    for i in 0..20 {
        forward.insert(format!("k{}", i), MetaValue::from(i as i64));
    }
    for i in (0..20).rev() {
        backward.insert(format!("k{}", i), MetaValue::from(i as i64));
    }

    assert_eq!(encode(&forward).unwrap(), encode(&backward).unwrap());
}

#[test]
fn test_empty_map_encodes_to_nonempty_frame() {
    let encoded = encode(&BTreeMap::new()).unwrap();

    assert!(encoded.len() > HEADER_SIZE);
    assert!(decode(&encoded).unwrap().is_empty());
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_short_header_is_corrupt() {
    let encoded = encode(&sample_map()).unwrap();

    assert_corrupt(&encoded[..HEADER_SIZE - 1]);
    assert_corrupt(b"IS");
}

#[test]
fn test_bad_magic_is_corrupt() {
    let mut encoded = encode(&sample_map()).unwrap();
    encoded[0] = b'X';

    assert_corrupt(&encoded);
}

#[test]
fn test_unknown_version_is_corrupt() {
    let mut encoded = encode(&sample_map()).unwrap();
    encoded[4..6].copy_from_slice(&(VERSION + 1).to_le_bytes());

    assert_corrupt(&encoded);
}

#[test]
fn test_flipped_payload_byte_is_corrupt() {
    let mut encoded = encode(&sample_map()).unwrap();
    let last = encoded.len() - 1;
    encoded[last] ^= 0xFF;

    assert_corrupt(&encoded);
}

#[test]
fn test_truncated_payload_is_corrupt() {
    let encoded = encode(&sample_map()).unwrap();

    assert_corrupt(&encoded[..encoded.len() - 3]);
}

#[test]
fn test_trailing_bytes_are_corrupt() {
    let mut encoded = encode(&sample_map()).unwrap();
    encoded.extend_from_slice(b"stale tail from an older flush");

    assert_corrupt(&encoded);
}

#[test]
fn test_valid_frame_with_garbage_payload_is_corrupt() {
    assert_corrupt(&frame(&[0xFFu8; 16]));
}

#[test]
fn test_foreign_format_is_corrupt() {
    // A pickle-style header from some other tool
    assert_corrupt(b"\x80\x04\x95\x10\x00\x00\x00\x00\x00\x00\x00}\x94.");
}

// =============================================================================
// Nesting Depth Tests
// =============================================================================

#[test]
fn test_hand_built_payload_matches_encoder() {
    let mut map = BTreeMap::new();
    map.insert("k".to_string(), nested_list(3));

    assert_eq!(frame(&nested_list_payload(3)), encode(&map).unwrap());
}

#[test]
fn test_deeply_nested_frame_is_corrupt() {
    let bytes = frame(&nested_list_payload(200_000));

    match decode(&bytes) {
        Err(StoreError::CorruptMetadata(msg)) => assert!(msg.contains("nesting too deep")),
        other => panic!("expected CorruptMetadata, got {:?}", other.map(|m| m.len())),
    }
}

#[test]
fn test_nesting_at_limit_decodes() {
    // The list chain plus the innermost Int is MAX_DEPTH values deep
    let bytes = frame(&nested_list_payload(MAX_DEPTH - 1));

    let map = decode(&bytes).unwrap();

    assert_eq!(map["k"], nested_list(MAX_DEPTH - 1));
}

#[test]
fn test_nesting_one_past_limit_is_corrupt() {
    assert_corrupt(&frame(&nested_list_payload(MAX_DEPTH)));
}

#[test]
fn test_encode_refuses_too_deep_value() {
    let mut map = BTreeMap::new();
    map.insert("ok".to_string(), nested_list(MAX_DEPTH - 1));
    assert!(encode(&map).is_ok());

    map.insert("deep".to_string(), nested_list(MAX_DEPTH));
    assert!(matches!(encode(&map), Err(StoreError::Serialization(_))));
}

#[test]
fn test_encode_refuses_too_deep_nested_map() {
    let mut value = MetaValue::from("leaf");
    for i in 0..MAX_DEPTH {
        let mut inner = BTreeMap::new();
        inner.insert(format!("level{}", i), value);
        value = MetaValue::Map(inner);
    }
    let mut map = BTreeMap::new();
    map.insert("tree".to_string(), value);

    assert!(matches!(encode(&map), Err(StoreError::Serialization(_))));
}
