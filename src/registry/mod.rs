//! Camera configuration: records, validation, and the persisted registry.
//!
//! ## Contents
//! - [`CameraRecord`], [`Endpoint`], [`Credentials`] the configuration data model
//! - [`CameraRegistry`] id-keyed store, rewritten to disk on every mutation
//! - [`CameraEntry`] persisted record + `connected` flag, as stored on disk
//!
//! The supervisor only ever *reads* from the registry (it fetches the record
//! on each `start`); the `connected` flag and the layout string belong to
//! the UI layer.

mod record;
#[allow(clippy::module_inception)]
mod registry;
mod store;

pub use record::{CameraId, CameraRecord, Credentials, Endpoint, RecordError};
pub use registry::CameraRegistry;
pub use store::{CameraEntry, StoreError};
