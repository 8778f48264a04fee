//! Storage Module
//!
//! Entry point: maps item names to pairs of files under one root directory.
//!
//! ## Responsibilities
//! - Reject names that could escape the root directory
//! - Exclusive create (never overwrite an existing item)
//! - Open items read-only or read-write
//! - Destroy items
//!
//! ## Layout
//! ```text
//! {root_dir}/
//!   ├── report.pdf.data     (payload of item "report.pdf")
//!   ├── report.pdf.meta     (metadata of item "report.pdf")
//!   ├── a1b2c3.data
//!   └── a1b2c3.meta
//! ```

mod name;
mod store;

pub use name::validate_name;
pub use store::Storage;
