//! # Flat on-disk camera configuration.
//!
//! Serializes the registry as a single JSON document:
//!
//! ```json
//! {
//!   "cameras": {
//!     "1": { "info": { "name": "gate", "protocol": "rtsp", "url": "rtsp://..." },
//!            "connected": false }
//!   },
//!   "layout": "2x2"
//! }
//! ```
//!
//! The file is rewritten on every registry mutation. A missing or malformed
//! file is not an error: it loads as "no cameras configured" with a log
//! entry, so a corrupt config never prevents startup.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::record::{CameraId, CameraRecord};

pub(crate) const DEFAULT_LAYOUT: &str = "2x2";

/// One persisted camera: the record plus the UI-facing `connected` flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraEntry {
    pub info: CameraRecord,
    #[serde(default)]
    pub connected: bool,
}

/// Root of the persisted document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    pub cameras: BTreeMap<CameraId, CameraEntry>,
    #[serde(default = "default_layout")]
    pub layout: String,
}

fn default_layout() -> String {
    DEFAULT_LAYOUT.to_string()
}

impl ConfigFile {
    pub(crate) fn empty() -> Self {
        Self {
            cameras: BTreeMap::new(),
            layout: default_layout(),
        }
    }
}

/// Failures while writing the configuration file.
///
/// Read failures never surface as errors; see [`load`].
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to write camera configuration: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode camera configuration: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Loads the configuration, degrading to an empty one on any failure.
pub(crate) fn load(path: &Path) -> ConfigFile {
    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<ConfigFile>(&raw) {
            Ok(cfg) => {
                tracing::info!(path = %path.display(), cameras = cfg.cameras.len(), "camera configuration loaded");
                cfg
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "malformed camera configuration, starting empty");
                ConfigFile::empty()
            }
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no camera configuration file found");
            ConfigFile::empty()
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "failed to read camera configuration, starting empty");
            ConfigFile::empty()
        }
    }
}

/// Rewrites the configuration file in full.
pub(crate) fn save(path: &Path, cfg: &ConfigFile) -> Result<(), StoreError> {
    let raw = serde_json::to_string_pretty(cfg)?;
    std::fs::write(path, raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::record::Endpoint;
    use std::path::PathBuf;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("camvisor-store-{}-{}.json", std::process::id(), tag))
    }

    #[test]
    fn missing_file_loads_empty() {
        let cfg = load(Path::new("/nonexistent/camvisor/camera_config.json"));
        assert!(cfg.cameras.is_empty());
        assert_eq!(cfg.layout, DEFAULT_LAYOUT);
    }

    #[test]
    fn malformed_file_loads_empty() {
        let path = temp_path("malformed");
        std::fs::write(&path, "{ not json").unwrap();
        let cfg = load(&path);
        assert!(cfg.cameras.is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = temp_path("roundtrip");
        let mut cfg = ConfigFile::empty();
        cfg.layout = "3x3".into();
        cfg.cameras.insert(
            1,
            CameraEntry {
                info: CameraRecord::new(
                    "gate",
                    Endpoint::Rtsp {
                        url: "rtsp://10.0.0.2/stream1".into(),
                    },
                ),
                connected: true,
            },
        );

        save(&path, &cfg).unwrap();
        let loaded = load(&path);
        assert_eq!(loaded.layout, "3x3");
        assert_eq!(loaded.cameras.len(), 1);
        assert_eq!(loaded.cameras[&1], cfg.cameras[&1]);
        let _ = std::fs::remove_file(&path);
    }
}
