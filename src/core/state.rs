//! # Per-camera connection state.
//!
//! One [`ConnectionState`] exists per supervised camera, owned exclusively
//! by that camera's watcher task. Everyone else (status queries, the UI)
//! sees immutable snapshots published through a `tokio::sync::watch`
//! channel.

/// Position in the connection lifecycle state machine.
///
/// ```text
/// Disconnected --start--> Connecting --check ok--> Connected
/// Connected --check fails--> Disconnected --(auto)--> Reconnecting
/// Reconnecting --success--> Connected
/// Reconnecting --failure, retries remain--> Reconnecting (after backoff)
/// Reconnecting --failure, retries exhausted--> Failed
/// Failed --explicit start--> Connecting
/// (any state) --stop--> state destroyed
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
    /// Retries exhausted; stable until an explicit `start`.
    Failed,
}

impl ConnectionStatus {
    /// Short stable label (snake_case) for logs and metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Reconnecting => "reconnecting",
            ConnectionStatus::Failed => "failed",
        }
    }
}

/// Snapshot of one camera's lifecycle state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionState {
    pub status: ConnectionStatus,
    /// Reconnect attempts used since the last successful connection.
    /// Reset to 0 on every transition into `Connected`.
    pub retry_count: u32,
    /// Bound on reconnect attempts per loss episode.
    pub max_retries: u32,
}

impl ConnectionState {
    /// Initial state for a freshly started camera.
    pub(crate) fn connecting(max_retries: u32) -> Self {
        Self {
            status: ConnectionStatus::Connecting,
            retry_count: 0,
            max_retries,
        }
    }
}
