//! # ItemStore
//!
//! Minimal file-backed storage for named items. Each item is:
//! - a raw byte blob with random-access reads and writes (data)
//! - a key/value attribute map, loaded whole and flushed whole (meta)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Storage                              │
//! │        (name validation, create / open / destroy)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ returns
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                          Item                                │
//! │             (joint lifetime of both handles)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Data     │          │    Meta     │
//!   │ {name}.data │          │ {name}.meta │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use itemstore::{Result, Storage};
//!
//! fn upload(storage: &Storage) -> Result<()> {
//!     storage.create("abc")?.scope(|item| {
//!         item.data.write(b"hello", 0)?;
//!         item.meta.insert("type", "text/plain");
//!         item.meta.flush()
//!     })
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod data;
pub mod meta;
pub mod item;
pub mod storage;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::{Config, SyncMode};
pub use data::Data;
pub use item::{AccessMode, Item};
pub use meta::{Mapping, Meta, MetaValue};
pub use storage::Storage;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ItemStore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
