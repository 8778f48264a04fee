//! Configuration for ItemStore
//!
//! Centralized configuration with sensible defaults.

use std::path::{is_separator, PathBuf};

use crate::error::{Result, StoreError};

/// Main configuration for a Storage instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Layout Configuration
    // -------------------------------------------------------------------------
    /// Root directory holding every item's backing files
    /// Internal structure:
    ///   {root_dir}/
    ///     ├── {name}{data_suffix}   (raw payload bytes)
    ///     └── {name}{meta_suffix}   (serialized metadata map)
    pub root_dir: PathBuf,

    /// Suffix appended to the item name for the data file
    pub data_suffix: String,

    /// Suffix appended to the item name for the meta file
    pub meta_suffix: String,

    /// Create `root_dir` on startup if it does not exist
    pub create_root: bool,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// How a metadata flush is made durable
    pub sync_mode: SyncMode,
}

/// Sync strategy applied after a metadata flush and on `Data::sync`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// fsync contents and file metadata (`sync_all`)
    Full,

    /// fsync contents only, skipping non-essential metadata (`sync_data`)
    DataOnly,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./itemstore_data"),
            data_suffix: ".data".to_string(),
            meta_suffix: ".meta".to_string(),
            create_root: true,
            sync_mode: SyncMode::Full,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the two suffixes produce distinct sibling files
    pub fn validate(&self) -> Result<()> {
        for (label, suffix) in [("data", &self.data_suffix), ("meta", &self.meta_suffix)] {
            if suffix.is_empty() {
                return Err(StoreError::Config(format!("{} suffix is empty", label)));
            }
            if suffix.chars().any(is_separator) {
                return Err(StoreError::Config(format!(
                    "{} suffix {:?} contains a path separator",
                    label, suffix
                )));
            }
        }

        if self.data_suffix == self.meta_suffix {
            return Err(StoreError::Config(format!(
                "data and meta suffix are both {:?}",
                self.data_suffix
            )));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the root directory
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.root_dir = path.into();
        self
    }

    /// Set the data file suffix
    pub fn data_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.data_suffix = suffix.into();
        self
    }

    /// Set the meta file suffix
    pub fn meta_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.meta_suffix = suffix.into();
        self
    }

    /// Whether to create the root directory when missing
    pub fn create_root(mut self, create: bool) -> Self {
        self.config.create_root = create;
        self
    }

    /// Set the sync mode
    pub fn sync_mode(mut self, mode: SyncMode) -> Self {
        self.config.sync_mode = mode;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
