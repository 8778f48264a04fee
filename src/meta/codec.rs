//! Meta codec
//!
//! Encoding and decoding of a whole metadata map.

use std::collections::BTreeMap;

use crate::error::{Result, StoreError};

use super::value::MAX_DEPTH;
use super::MetaValue;

/// Magic bytes identifying an ItemStore meta file
pub const MAGIC: &[u8; 4] = b"ISMT";

/// Current meta format version
pub const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + CRC32 (4) + PayloadLen (8) = 18 bytes
pub const HEADER_SIZE: usize = 18;

/// Encode a map to its on-disk form (header + bincode payload)
///
/// BTreeMap keeps keys sorted, so equal maps encode to equal bytes.
/// Values nested deeper than `MAX_DEPTH` are refused, since `decode`
/// would reject them.
pub fn encode(entries: &BTreeMap<String, MetaValue>) -> Result<Vec<u8>> {
    if let Some((key, _)) = entries.iter().find(|(_, v)| v.exceeds_max_depth()) {
        return Err(StoreError::Serialization(format!(
            "value for {:?} nests deeper than {} levels",
            key, MAX_DEPTH
        )));
    }

    let payload =
        bincode::serialize(entries).map_err(|e| StoreError::Serialization(e.to_string()))?;

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    out.extend_from_slice(&payload);

    Ok(out)
}

/// Decode the on-disk form back into a map
///
/// Empty input is an empty map. Anything else must be one complete,
/// checksummed frame with no trailing bytes.
pub fn decode(bytes: &[u8]) -> Result<BTreeMap<String, MetaValue>> {
    if bytes.is_empty() {
        return Ok(BTreeMap::new());
    }

    if bytes.len() < HEADER_SIZE {
        return Err(corrupt(format!(
            "file is {} bytes, shorter than the {} byte header",
            bytes.len(),
            HEADER_SIZE
        )));
    }

    let (header, payload) = bytes.split_at(HEADER_SIZE);

    if &header[0..4] != MAGIC {
        return Err(corrupt(format!(
            "invalid magic: expected ISMT, got {:?}",
            &header[0..4]
        )));
    }

    let version = u16::from_le_bytes([header[4], header[5]]);
    if version != VERSION {
        return Err(corrupt(format!("unsupported version: {}", version)));
    }

    let mut crc_bytes = [0u8; 4];
    crc_bytes.copy_from_slice(&header[6..10]);
    let stored_crc = u32::from_le_bytes(crc_bytes);

    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&header[10..18]);
    let payload_len = u64::from_le_bytes(len_bytes);

    if payload_len != payload.len() as u64 {
        return Err(corrupt(format!(
            "payload length mismatch: header says {}, found {}",
            payload_len,
            payload.len()
        )));
    }

    let actual_crc = crc32fast::hash(payload);
    if actual_crc != stored_crc {
        return Err(corrupt(format!(
            "checksum mismatch: stored {:#010x}, computed {:#010x}",
            stored_crc, actual_crc
        )));
    }

    bincode::deserialize(payload).map_err(|e| corrupt(e.to_string()))
}

fn corrupt(msg: String) -> StoreError {
    StoreError::CorruptMetadata(msg)
}
