//! Data region
//!
//! Seek-based offset I/O over the item's data file.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::config::SyncMode;
use crate::error::{Result, StoreError};
use crate::item::AccessMode;

/// Byte-addressable payload of an open item
#[derive(Debug)]
pub struct Data {
    /// Backing data file
    file: File,
    /// Whether writes are permitted
    mode: AccessMode,
    /// Applied by `sync()` and on close of writable handles
    sync_mode: SyncMode,
}

impl Data {
    pub(crate) fn new(file: File, mode: AccessMode, sync_mode: SyncMode) -> Self {
        Self {
            file,
            mode,
            sync_mode,
        }
    }

    /// Current length of the region in bytes
    ///
    /// Seeks to the end, so it reflects every completed `write()`.
    pub fn size(&mut self) -> Result<u64> {
        Ok(self.file.seek(SeekFrom::End(0))?)
    }

    /// Read up to `length` bytes starting at `offset`
    ///
    /// Returns fewer bytes if the region ends first, and an empty buffer
    /// if `offset` is at or past the end.
    pub fn read(&mut self, offset: u64, length: usize) -> Result<Bytes> {
        let end = self.size()?;
        if offset >= end || length == 0 {
            return Ok(Bytes::new());
        }

        // Size the buffer by what is actually there, not by the caller's length
        let available = (end - offset).min(length as u64);

        self.file.seek(SeekFrom::Start(offset))?;
        let mut buf = BytesMut::with_capacity(available as usize).writer();
        std::io::copy(&mut (&self.file).take(available), &mut buf)?;

        Ok(buf.into_inner().freeze())
    }

    /// Write `data` at `offset`, returning the number of bytes written
    ///
    /// Overwrites existing bytes in range and grows the region if
    /// `offset + data.len()` passes the current end.
    pub fn write(&mut self, data: &[u8], offset: u64) -> Result<usize> {
        if !self.mode.is_writable() {
            return Err(StoreError::ReadOnly("write data"));
        }

        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(data)?;

        Ok(data.len())
    }

    /// Force written bytes to stable storage
    pub fn sync(&self) -> Result<()> {
        if !self.mode.is_writable() {
            return Ok(());
        }

        match self.sync_mode {
            SyncMode::Full => self.file.sync_all()?,
            SyncMode::DataOnly => self.file.sync_data()?,
        }
        Ok(())
    }

    /// Access mode this region was opened with
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Release the data file
    ///
    /// Writable handles are synced first so deferred write errors surface
    /// here instead of being lost when the descriptor is dropped.
    pub fn close(self) -> Result<()> {
        self.sync()
    }
}
