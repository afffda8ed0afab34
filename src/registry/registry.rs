//! # Camera registry.
//!
//! Holds the configured cameras keyed by [`CameraId`], plus the grid layout
//! string the viewer persists alongside them. Every mutation rewrites the
//! backing file (when one is configured); persistence failures are logged
//! and never fail the mutation itself.
//!
//! The registry validates records on [`add`](CameraRegistry::add) so bad
//! input is rejected at the door, but consumers that can see records from
//! other sources (a hand-edited config file) must still validate before use.

use std::path::PathBuf;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::record::{CameraId, CameraRecord, RecordError};
use super::store::{self, CameraEntry, ConfigFile};

/// Thread-safe registry of camera configuration records.
pub struct CameraRegistry {
    inner: RwLock<ConfigFile>,
    path: Option<PathBuf>,
}

impl CameraRegistry {
    /// Creates an empty registry with no backing file.
    pub fn in_memory() -> Self {
        Self {
            inner: RwLock::new(ConfigFile::empty()),
            path: None,
        }
    }

    /// Opens a registry backed by `path`, loading whatever is there.
    ///
    /// A missing or malformed file yields an empty registry.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let inner = store::load(&path);
        Self {
            inner: RwLock::new(inner),
            path: Some(path),
        }
    }

    /// Registers a camera and returns its assigned id.
    pub fn add(&self, record: CameraRecord) -> Result<CameraId, RecordError> {
        record.validate()?;
        let mut inner = self.write();
        let id = inner.cameras.keys().next_back().map_or(1, |last| last + 1);
        inner.cameras.insert(
            id,
            CameraEntry {
                info: record,
                connected: false,
            },
        );
        self.persist(&inner);
        tracing::info!(camera = id, "camera registered");
        Ok(id)
    }

    /// Removes a camera, returning its record if it existed.
    pub fn remove(&self, id: CameraId) -> Option<CameraRecord> {
        let mut inner = self.write();
        let removed = inner.cameras.remove(&id);
        if removed.is_some() {
            self.persist(&inner);
            tracing::info!(camera = id, "camera removed");
        }
        removed.map(|entry| entry.info)
    }

    /// Returns a copy of the record for `id`.
    pub fn get(&self, id: CameraId) -> Option<CameraRecord> {
        self.read().cameras.get(&id).map(|entry| entry.info.clone())
    }

    /// Returns the persisted entry (record + connected flag) for `id`.
    pub fn entry(&self, id: CameraId) -> Option<CameraEntry> {
        self.read().cameras.get(&id).cloned()
    }

    /// Lists all cameras in ascending id order.
    pub fn list(&self) -> Vec<(CameraId, CameraRecord)> {
        self.read()
            .cameras
            .iter()
            .map(|(id, entry)| (*id, entry.info.clone()))
            .collect()
    }

    /// Updates the UI-facing connected flag. Returns false for unknown ids.
    pub fn set_connected(&self, id: CameraId, connected: bool) -> bool {
        let mut inner = self.write();
        match inner.cameras.get_mut(&id) {
            Some(entry) => {
                entry.connected = connected;
                self.persist(&inner);
                true
            }
            None => false,
        }
    }

    /// Current grid layout string (e.g. `"2x2"`).
    pub fn layout(&self) -> String {
        self.read().layout.clone()
    }

    /// Replaces the grid layout string.
    pub fn set_layout(&self, layout: impl Into<String>) {
        let mut inner = self.write();
        inner.layout = layout.into();
        self.persist(&inner);
    }

    pub fn len(&self) -> usize {
        self.read().cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().cameras.is_empty()
    }

    fn persist(&self, inner: &ConfigFile) {
        if let Some(path) = &self.path {
            if let Err(err) = store::save(path, inner) {
                tracing::error!(path = %path.display(), %err, "failed to save camera configuration");
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ConfigFile> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ConfigFile> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
