//! Error types for ItemStore
//!
//! Provides a unified error type for all operations.

use std::fmt;

use thiserror::Error;
use tracing::warn;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for ItemStore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Naming / Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Invalid item name: {0:?}")]
    InvalidName(String),

    #[error("Item already exists: {0}")]
    AlreadyExists(String),

    #[error("Item not found: {0}")]
    NotFound(String),

    // -------------------------------------------------------------------------
    // Access Errors
    // -------------------------------------------------------------------------
    #[error("Handle is read-only: cannot {0}")]
    ReadOnly(&'static str),

    // -------------------------------------------------------------------------
    // Metadata Errors
    // -------------------------------------------------------------------------
    #[error("Corrupt metadata: {0}")]
    CorruptMetadata(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Combine two results from steps that must both run
///
/// The first error wins. When both steps fail, the second error is logged
/// under `second_step` and dropped.
pub(crate) fn first_error<T, U, E: fmt::Display>(
    first: std::result::Result<T, E>,
    second: std::result::Result<U, E>,
    second_step: &str,
) -> std::result::Result<(T, U), E> {
    match (first, second) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
        (Err(e), Err(dropped)) => {
            warn!(error = %dropped, "{} also failed", second_step);
            Err(e)
        }
    }
}
