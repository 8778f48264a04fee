//! Storage
//!
//! Resolves names to file pairs and implements create/open/destroy.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::Config;
use crate::data::Data;
use crate::error::{first_error, Result, StoreError};
use crate::item::{AccessMode, Item};
use crate::meta::Meta;

use super::validate_name;

/// Directory-rooted item storage
///
/// Holds nothing but its configuration; every call goes to the filesystem.
/// No locking: concurrent writers to the same item must be serialized by
/// the caller.
#[derive(Debug, Clone)]
pub struct Storage {
    config: Config,
}

impl Storage {
    /// Open storage rooted at `config.root_dir`
    ///
    /// Creates the root directory when `create_root` is set, otherwise
    /// requires it to exist.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        if config.create_root {
            fs::create_dir_all(&config.root_dir)?;
        } else if !config.root_dir.is_dir() {
            return Err(StoreError::NotFound(config.root_dir.display().to_string()));
        }

        debug!(root = %config.root_dir.display(), "Storage opened");
        Ok(Self { config })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified root directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().root_dir(path).build();
        Self::new(config)
    }

    /// Create a new, empty item opened read-write
    ///
    /// Both files are created with create-if-absent semantics. If the meta
    /// file cannot be created, the data file created here is removed again.
    pub fn create(&self, name: &str) -> Result<Item> {
        let (data_path, meta_path) = self.paths(name)?;

        let data_file = create_exclusive(&data_path).map_err(|e| lookup_error(e, name))?;

        let meta_file = match create_exclusive(&meta_path) {
            Ok(file) => file,
            Err(e) => {
                drop(data_file);
                if let Err(rm) = fs::remove_file(&data_path) {
                    warn!(item = name, error = %rm, "Failed to roll back data file");
                }
                return Err(lookup_error(e, name));
            }
        };

        let sync_mode = self.config.sync_mode;
        let data = Data::new(data_file, AccessMode::ReadWrite, sync_mode);
        let meta = Meta::empty(name, meta_file, AccessMode::ReadWrite, sync_mode);

        debug!(item = name, "Item created");
        Ok(Item::new(name, data, meta))
    }

    /// Open an existing item read-only
    pub fn open(&self, name: &str) -> Result<Item> {
        self.open_with(name, AccessMode::ReadOnly)
    }

    /// Open an existing item read-write
    pub fn openwrite(&self, name: &str) -> Result<Item> {
        self.open_with(name, AccessMode::ReadWrite)
    }

    /// Remove both files of an item
    ///
    /// Fails with `NotFound` only if neither file exists; a half-present
    /// item is cleaned up. Both removals are attempted even if the first
    /// fails (best-effort, not atomic).
    pub fn destroy(&self, name: &str) -> Result<()> {
        let (data_path, meta_path) = self.paths(name)?;

        let removed = first_error(
            remove_if_present(&data_path),
            remove_if_present(&meta_path),
            "Meta removal",
        )?;

        if removed == (false, false) {
            return Err(StoreError::NotFound(name.to_string()));
        }

        debug!(item = name, "Item destroyed");
        Ok(())
    }

    /// True if both files of the item exist
    pub fn exists(&self, name: &str) -> Result<bool> {
        let (data_path, meta_path) = self.paths(name)?;
        Ok(is_present(&data_path)? && is_present(&meta_path)?)
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.config.root_dir
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn open_with(&self, name: &str, mode: AccessMode) -> Result<Item> {
        let (data_path, meta_path) = self.paths(name)?;

        let data_file = open_file(&data_path, mode).map_err(|e| lookup_error(e, name))?;
        let meta_file = open_file(&meta_path, mode).map_err(|e| lookup_error(e, name))?;

        let sync_mode = self.config.sync_mode;
        let data = Data::new(data_file, mode, sync_mode);
        let meta = Meta::load(name, meta_file, mode, sync_mode)?;

        debug!(item = name, ?mode, entries = meta.len(), "Item opened");
        Ok(Item::new(name, data, meta))
    }

    /// Resolve the (data, meta) file paths for a validated name
    fn paths(&self, name: &str) -> Result<(PathBuf, PathBuf)> {
        validate_name(name)?;

        let root = &self.config.root_dir;
        Ok((
            root.join(format!("{}{}", name, self.config.data_suffix)),
            root.join(format!("{}{}", name, self.config.meta_suffix)),
        ))
    }
}

fn create_exclusive(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(path)
}

fn open_file(path: &Path, mode: AccessMode) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(mode.is_writable())
        .open(path)
}

/// Returns whether a file was actually removed
fn remove_if_present(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn is_present(path: &Path) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.is_file()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Map create/open failures onto the item-level error variants
fn lookup_error(err: io::Error, name: &str) -> StoreError {
    match err.kind() {
        io::ErrorKind::AlreadyExists => StoreError::AlreadyExists(name.to_string()),
        io::ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
        _ => StoreError::Io(err),
    }
}
