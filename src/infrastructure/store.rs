//! Snapshot and history persistence.
//!
//! One logical snapshot and one history record per monitored target, each a
//! small JSON file overwritten unconditionally on save. Absent or corrupt
//! data reads back as "no previous state", never as an error. There is no
//! locking: concurrent monitor invocations against the same files can
//! interleave, so callers must serialize runs.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::shared::errors::StoreError;
use crate::shared::types::{HistoryEntry, PriceSnapshot};

/// Single-slot store for the last observed snapshot
pub trait SnapshotStore: Send + Sync {
    /// Absent or unreadable state is simply "no previous snapshot"
    fn load(&self) -> Option<PriceSnapshot>;
    fn save(&self, snapshot: &PriceSnapshot) -> Result<(), StoreError>;
}

/// Store for the bounded price history record
pub trait HistoryStore: Send + Sync {
    fn load(&self) -> Vec<HistoryEntry>;
    fn save(&self, entries: &[HistoryEntry]) -> Result<(), StoreError>;
}

pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn load(&self) -> Option<PriceSnapshot> {
        read_json(&self.path)
    }

    fn save(&self, snapshot: &PriceSnapshot) -> Result<(), StoreError> {
        write_json(&self.path, snapshot)
    }
}

pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> Vec<HistoryEntry> {
        read_json(&self.path).unwrap_or_default()
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), StoreError> {
        write_json(&self.path, &entries)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return None,
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring corrupt record at {}: {}", path.display(), e);
            None
        }
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let raw = serde_json::to_string_pretty(value)
        .map_err(|e| StoreError::Serialize(e.to_string()))?;
    fs::write(path, raw).map_err(|e| StoreError::Write {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
