//! Meta map
//!
//! In-memory BTreeMap mirrored to the item's meta file on `flush()`.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::ops::Index;

use tracing::debug;

use crate::config::SyncMode;
use crate::error::{Result, StoreError};
use crate::item::AccessMode;

use super::{codec, MetaValue};

/// Mapping operations every metadata store exposes
pub trait Mapping {
    type Value;

    /// Look up a key
    fn get(&self, key: &str) -> Option<&Self::Value>;

    /// Insert or overwrite, returning the previous value
    fn set(&mut self, key: String, value: Self::Value) -> Option<Self::Value>;

    /// Remove a key, returning its value (`None` if it was absent)
    fn delete(&mut self, key: &str) -> Option<Self::Value>;

    /// All keys, in no guaranteed order
    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    /// Number of entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Metadata of an open item
///
/// Loaded whole on open. Changes stay in memory until `flush()`.
#[derive(Debug)]
pub struct Meta {
    /// Name of the owning item, for diagnostics
    item: String,
    /// Backing meta file
    file: File,
    /// Whether flush is permitted
    mode: AccessMode,
    /// Applied after every flush
    sync_mode: SyncMode,
    /// Current contents
    entries: BTreeMap<String, MetaValue>,
    /// Set by any mutation, cleared by flush
    dirty: bool,
}

impl Meta {
    /// Read and decode the whole meta file
    pub(crate) fn load(
        item: &str,
        mut file: File,
        mode: AccessMode,
        sync_mode: SyncMode,
    ) -> Result<Self> {
        file.seek(SeekFrom::Start(0))?;
        let mut raw = Vec::new();
        file.read_to_end(&mut raw)?;

        let entries = codec::decode(&raw)?;

        Ok(Self {
            item: item.to_string(),
            file,
            mode,
            sync_mode,
            entries,
            dirty: false,
        })
    }

    /// Wrap a freshly created, empty meta file
    pub(crate) fn empty(item: &str, file: File, mode: AccessMode, sync_mode: SyncMode) -> Self {
        Self {
            item: item.to_string(),
            file,
            mode,
            sync_mode,
            entries: BTreeMap::new(),
            dirty: false,
        }
    }

    // =========================================================================
    // Mapping operations
    // =========================================================================

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite a key, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Option<MetaValue> {
        self.dirty = true;
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a key; `None` means it was not present
    pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.dirty = true;
        }
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, MetaValue> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// True if the map changed since it was loaded or last flushed
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Access mode this map was opened with
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Serialize the whole map over the meta file and make it durable
    ///
    /// The file is truncated to the new length, so a shorter encoding never
    /// leaves stale bytes from a previous flush behind.
    pub fn flush(&mut self) -> Result<()> {
        if !self.mode.is_writable() {
            return Err(StoreError::ReadOnly("flush metadata"));
        }

        let encoded = codec::encode(&self.entries)?;

        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&encoded)?;
        self.file.set_len(encoded.len() as u64)?;

        match self.sync_mode {
            SyncMode::Full => self.file.sync_all()?,
            SyncMode::DataOnly => self.file.sync_data()?,
        }

        self.dirty = false;
        debug!(
            item = %self.item,
            entries = self.entries.len(),
            bytes = encoded.len(),
            "Metadata flushed"
        );
        Ok(())
    }

    /// Release the meta file without flushing
    pub fn close(self) -> Result<()> {
        if self.dirty {
            debug!(
                item = %self.item,
                entries = self.entries.len(),
                "Discarding unflushed metadata changes"
            );
        }
        Ok(())
    }
}

impl Mapping for Meta {
    type Value = MetaValue;

    fn get(&self, key: &str) -> Option<&MetaValue> {
        Meta::get(self, key)
    }

    fn set(&mut self, key: String, value: MetaValue) -> Option<MetaValue> {
        self.insert(key, value)
    }

    fn delete(&mut self, key: &str) -> Option<MetaValue> {
        self.remove(key)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(Meta::keys(self))
    }

    fn len(&self) -> usize {
        Meta::len(self)
    }
}

impl Index<&str> for Meta {
    type Output = MetaValue;

    /// Panics if the key is absent, like `BTreeMap`'s index
    fn index(&self, key: &str) -> &MetaValue {
        match self.entries.get(key) {
            Some(value) => value,
            None => panic!("no metadata entry for key {:?} on item {:?}", key, self.item),
        }
    }
}

impl<'a> IntoIterator for &'a Meta {
    type Item = (&'a String, &'a MetaValue);
    type IntoIter = btree_map::Iter<'a, String, MetaValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
