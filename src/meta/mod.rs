//! Meta Module
//!
//! Fully-buffered key/value attributes of an item.
//!
//! ## Responsibilities
//! - Load the whole map when an item is opened
//! - Plain in-memory mapping operations while the item is open
//! - Persist the whole map on an explicit `flush()`
//!
//! Values come from a closed set (see [`MetaValue`]); arbitrary objects
//! cannot be stored, and `List`/`Map` nesting is capped at [`MAX_DEPTH`].
//! Mutations that are never flushed are lost on close.
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Header (18 bytes)                                        │
//! │   Magic: "ISMT" (4) | Version: u16 (2) | CRC32: u32 (4)  │
//! │   PayloadLen: u64 (8)                                    │
//! ├──────────────────────────────────────────────────────────┤
//! │ Payload (PayloadLen bytes)                               │
//! │   bincode(BTreeMap<String, MetaValue>)                   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//! An empty file is an empty map.

mod codec;
mod map;
mod value;

pub use codec::{decode, encode, HEADER_SIZE, MAGIC, VERSION};
pub use map::{Mapping, Meta};
pub use value::{MetaValue, MAX_DEPTH};
