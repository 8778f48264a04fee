//! Item name validation

use std::path::is_separator;

use crate::error::{Result, StoreError};

/// Check that `name` can be used as a file basename under the root
///
/// Rejected: the empty name, any path separator, and NUL. Runs before any
/// filesystem access.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().any(|c| is_separator(c) || c == '\0') {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}
