//! Error types for the camvisor runtime.
//!
//! Three surfaces:
//!
//! - [`StartError`] / [`StopError`] — lifecycle misuse and configuration
//!   problems, returned synchronously from
//!   [`ConnectionSupervisor::start`](crate::ConnectionSupervisor::start) /
//!   [`stop`](crate::ConnectionSupervisor::stop).
//! - [`BackendError`] — transport failures from the stream backend. These
//!   are absorbed by the retry state machine and drive `retry_count`; they
//!   never surface to callers.
//!
//! Retry exhaustion is *not* an error: it is the `Failed` state, observed
//! via the emitted [`ConnectionFailed`](crate::EventKind::ConnectionFailed)
//! event or a status query. One camera's failure must never take the rest
//! of the system down.

use std::time::Duration;

use thiserror::Error;

use crate::registry::{CameraId, RecordError};

/// Rejections from [`ConnectionSupervisor::start`](crate::ConnectionSupervisor::start).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StartError {
    /// No record for this id in the registry.
    #[error("camera {camera} is not registered")]
    UnknownCamera { camera: CameraId },

    /// A live watcher already owns this id; existing state is untouched.
    #[error("camera {camera} is already under supervision")]
    AlreadyManaged { camera: CameraId },

    /// The record fails a validation invariant; no state was created.
    #[error("camera {camera} has invalid configuration: {source}")]
    InvalidConfiguration {
        camera: CameraId,
        #[source]
        source: RecordError,
    },
}

impl StartError {
    /// Short stable label (snake_case) for logs and metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StartError::UnknownCamera { .. } => "start_unknown_camera",
            StartError::AlreadyManaged { .. } => "start_already_managed",
            StartError::InvalidConfiguration { .. } => "start_invalid_configuration",
        }
    }
}

/// Rejections from [`ConnectionSupervisor::stop`](crate::ConnectionSupervisor::stop).
///
/// Non-fatal by design: callers that don't need strict accounting can
/// ignore it.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StopError {
    /// No watcher owns this id; the stop was a no-op.
    #[error("camera {camera} is not under supervision")]
    NotManaged { camera: CameraId },
}

/// Failures reported by a [`StreamBackend`](crate::StreamBackend).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BackendError {
    /// Transport or protocol failure while talking to the camera.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The supervisor's own timeout around the backend call expired.
    #[error("backend call timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}

impl BackendError {
    /// Convenience constructor for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        BackendError::Transport {
            message: message.into(),
        }
    }
}
