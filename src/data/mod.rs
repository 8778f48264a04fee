//! Data Module
//!
//! Random-access byte storage for an item's payload.
//!
//! ## Responsibilities
//! - Report the current payload size
//! - Read a byte range at an offset (short reads past the end are normal)
//! - Write bytes at an offset, extending the file when needed
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Raw payload bytes (no header, no footer) │
//! │ offset 0 ........................ size   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Writes past the current end leave a gap that the filesystem fills with
//! zeros (sparse on most filesystems).

mod region;

pub use region::Data;
