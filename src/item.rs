//! Item Module
//!
//! An open item: one data region and one metadata map released together.
//!
//! Both files close when the `Item` is dropped. Call [`Item::close`] (or run
//! work through [`Item::scope`]) to have close errors reported.

use tracing::debug;

use crate::data::Data;
use crate::error::{first_error, Result};
use crate::meta::Meta;

/// How an item's files were opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// `Storage::open` - reads only; writes and meta flushes are rejected
    ReadOnly,

    /// `Storage::create` / `Storage::openwrite`
    ReadWrite,
}

impl AccessMode {
    pub fn is_writable(self) -> bool {
        matches!(self, AccessMode::ReadWrite)
    }
}

/// An open item handle
#[derive(Debug)]
pub struct Item {
    /// Item name as given to Storage
    name: String,

    /// Payload bytes
    pub data: Data,

    /// Key/value attributes
    pub meta: Meta,
}

impl Item {
    pub(crate) fn new(name: &str, data: Data, meta: Meta) -> Self {
        Self {
            name: name.to_string(),
            data,
            meta,
        }
    }

    /// Name this item was opened under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Access mode shared by the data region and the meta map
    pub fn mode(&self) -> AccessMode {
        self.data.mode()
    }

    /// Close the data region, then the meta map
    ///
    /// Both closes are always attempted. The first error is returned; a
    /// second one is logged.
    pub fn close(self) -> Result<()> {
        let Item { name, data, meta } = self;

        first_error(data.close(), meta.close(), "Meta close")?;

        debug!(item = %name, "Item closed");
        Ok(())
    }

    /// Run `f` on this item, then close it on every exit path
    ///
    /// An error from `f` takes precedence over a close error.
    pub fn scope<T, F>(mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Item) -> Result<T>,
    {
        let outcome = f(&mut self);
        let (value, ()) = first_error(outcome, self.close(), "Close after scoped work")?;
        Ok(value)
    }
}
