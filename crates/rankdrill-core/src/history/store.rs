//! Persistence behind the history tracker.
//!
//! The tracker only needs three calls: load the whole list, save the whole
//! list, clear it. [`HistoryStore`] is that seam; [`MemoryStore`] and
//! [`JsonFileStore`] implement it.
//!
//! `JsonFileStore` writes through a temporary file in the same directory and
//! renames it over the target, so a crash mid-write leaves either the old or
//! the new list on disk, never a torn file.

use std::fs;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::HistoryEntry;

/// Errors reading or writing stored history.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("history store I/O error at {}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The stored document is not a valid history list.
    #[error("history at {} is corrupt: {source}", path.display())]
    Corrupt {
        /// File involved.
        path: PathBuf,
        /// Parse failure.
        source: serde_json::Error,
    },

    /// Entries could not be serialized.
    #[error("failed to serialize history: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The store refused the operation.
    #[error("history store unavailable: {0}")]
    Unavailable(String),
}

/// Durable home for the history list, most recent entry first.
pub trait HistoryStore {
    /// Read every stored entry. An empty store yields an empty list.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the store cannot be read.
    fn load(&self) -> Result<Vec<HistoryEntry>, StoreError>;

    /// Replace the stored list with `entries`.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the write is rejected.
    fn save(&mut self, entries: &[HistoryEntry]) -> Result<(), StoreError>;

    /// Remove every stored entry.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the store cannot be cleared.
    fn clear(&mut self) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process store; nothing survives the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Vec<HistoryEntry>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[HistoryEntry]) -> Result<(), StoreError> {
        self.entries = entries.to_vec();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// History kept as a pretty-printed JSON array in a single file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by `path`. Nothing is touched until the first call.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&mut self, entries: &[HistoryEntry]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(d) if !d.as_os_str().is_empty() => d.to_owned(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.io_error(e))?;

        let tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.io_error(e))?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, entries).map_err(StoreError::Serialize)?;
            writer.flush().map_err(|e| self.io_error(e))?;
        }
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        tracing::debug!(path = %self.path.display(), entries = entries.len(), "history saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
