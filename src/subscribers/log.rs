//! # LogWriter — structured log sink.
//!
//! Emits a `tracing` event for every supervisor event, alongside (not
//! instead of) the typed notifications, so operators get logs and tests
//! assert on events.

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Subscriber that mirrors events into the `tracing` log stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::ConnectionLost => {
                warn!(camera = ?e.camera, "connection lost");
            }
            EventKind::ConnectionRestored => {
                info!(camera = ?e.camera, "connection restored");
            }
            EventKind::ConnectionFailed => {
                error!(
                    camera = ?e.camera,
                    attempts = ?e.attempt,
                    reason = ?e.reason,
                    "reconnect attempts exhausted"
                );
            }
            EventKind::ReconnectScheduled => {
                info!(
                    camera = ?e.camera,
                    attempt = ?e.attempt,
                    delay_ms = ?e.delay_ms,
                    reason = ?e.reason,
                    "reconnect scheduled"
                );
            }
            EventKind::WatchStarted => {
                info!(camera = ?e.camera, "watch started");
            }
            EventKind::WatchStopped => {
                debug!(camera = ?e.camera, "watch stopped");
            }
            EventKind::StopTimedOut => {
                warn!(camera = ?e.camera, reason = ?e.reason, "stop timed out");
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                warn!(reason = ?e.reason, "subscriber trouble");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
