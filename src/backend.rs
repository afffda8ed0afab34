//! # Stream backend capability.
//!
//! The supervisor never speaks RTSP/HTTP itself; it depends on a
//! [`StreamBackend`] for the two things it needs: a liveness check and a
//! reconnect. A real deployment plugs in a protocol client here; tests plug
//! in a scripted fake and drive the state machine on a schedule.
//!
//! Both calls may block on network I/O. The supervisor bounds them with its
//! own timeout ([`SupervisorConfig::backend_timeout`](crate::SupervisorConfig))
//! and races them against the per-camera cancellation token, so a hung
//! backend cannot wedge `stop`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BackendError;
use crate::registry::CameraRecord;

/// Shared handle to a stream backend.
pub type BackendRef = Arc<dyn StreamBackend>;

/// Protocol client capability the supervisor depends on.
#[async_trait]
pub trait StreamBackend: Send + Sync + 'static {
    /// Returns whether the camera currently answers.
    ///
    /// Transport errors are a backend-internal concern here; implementations
    /// report them as `false` ("not alive").
    async fn check_alive(&self, record: &CameraRecord) -> bool;

    /// Attempts to re-establish the stream.
    async fn reconnect(&self, record: &CameraRecord) -> Result<(), BackendError>;
}

/// Placeholder backend that reports every camera as healthy.
///
/// Stands in until a real protocol client is wired up; with it, every
/// started camera connects on the first check and stays `Connected`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysUp;

#[async_trait]
impl StreamBackend for AlwaysUp {
    async fn check_alive(&self, _record: &CameraRecord) -> bool {
        true
    }

    async fn reconnect(&self, _record: &CameraRecord) -> Result<(), BackendError> {
        Ok(())
    }
}
