//! # Camera watcher — the per-camera lifecycle loop.
//!
//! One [`CameraWatcher`] task runs per supervised camera. It owns the
//! camera's [`ConnectionState`] exclusively and publishes snapshots through
//! a `watch` channel; the supervisor and status queries only ever read.
//!
//! The loop:
//! 1. probe immediately, then every `check_interval`;
//! 2. on a dead probe, mark `Disconnected`, emit `ConnectionLost`, and
//!    enter the reconnect loop;
//! 3. reconnect attempts are spaced by the backoff policy; exhausting
//!    `max_retries` parks the camera in `Failed` and returns — the slot
//!    stays queryable until an explicit restart or stop;
//! 4. cancellation is honored at every await point.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::backend::BackendRef;
use crate::core::probe::{self, Probe, Reconnect};
use crate::core::state::{ConnectionState, ConnectionStatus};
use crate::events::{Bus, Event, EventKind};
use crate::policies::BackoffPolicy;
use crate::registry::{CameraId, CameraRecord};

/// Watcher tuning, copied out of the supervisor config at spawn time.
#[derive(Clone, Debug)]
pub(crate) struct WatcherParams {
    pub check_interval: Duration,
    pub backoff: BackoffPolicy,
    pub max_retries: u32,
    pub backend_timeout: Option<Duration>,
}

/// Why the watcher loop returned.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Cancellation token fired; the supervisor is tearing the slot down.
    Cancelled,
    /// Retries exhausted; the slot parks in `Failed` until restarted.
    Exhausted,
}

pub(crate) struct CameraWatcher {
    id: CameraId,
    record: CameraRecord,
    backend: BackendRef,
    bus: Bus,
    params: WatcherParams,
    state: watch::Sender<ConnectionState>,
}

impl CameraWatcher {
    pub(crate) fn new(
        id: CameraId,
        record: CameraRecord,
        backend: BackendRef,
        bus: Bus,
        params: WatcherParams,
        state: watch::Sender<ConnectionState>,
    ) -> Self {
        Self {
            id,
            record,
            backend,
            bus,
            params,
            state,
        }
    }

    pub(crate) async fn run(self, cancel: CancellationToken) -> Outcome {
        debug!(camera = self.id, name = %self.record.name, "watcher running");

        loop {
            let probe = probe::check_once(
                &self.backend,
                &self.record,
                self.params.backend_timeout,
                &cancel,
            )
            .await;

            match probe {
                Probe::Cancelled => return Outcome::Cancelled,
                Probe::Alive => self.mark_connected(),
                Probe::Dead => {
                    self.mark_disconnected();
                    match self.reconnect_loop(&cancel).await {
                        Some(outcome) => return outcome,
                        None => continue,
                    }
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Outcome::Cancelled,
                _ = time::sleep(self.params.check_interval) => {}
            }
        }
    }

    /// Retries until restored, cancelled, or exhausted. `None` means
    /// restored: the caller resumes periodic checking.
    async fn reconnect_loop(&self, cancel: &CancellationToken) -> Option<Outcome> {
        loop {
            let attempt = self.state.borrow().retry_count + 1;
            self.set_status(ConnectionStatus::Reconnecting);

            let out = probe::reconnect_once(
                &self.backend,
                &self.record,
                self.params.backend_timeout,
                cancel,
            )
            .await;

            match out {
                Reconnect::Cancelled => return Some(Outcome::Cancelled),
                Reconnect::Restored => {
                    self.mark_connected();
                    return None;
                }
                Reconnect::Failed(err) => {
                    self.state.send_modify(|s| s.retry_count = attempt);

                    if attempt >= self.params.max_retries {
                        self.set_status(ConnectionStatus::Failed);
                        self.bus.publish(
                            Event::now(EventKind::ConnectionFailed)
                                .with_camera(self.id)
                                .with_attempt(attempt)
                                .with_reason(err.to_string()),
                        );
                        return Some(Outcome::Exhausted);
                    }

                    let delay = self.params.backoff.next(attempt - 1);
                    self.bus.publish(
                        Event::now(EventKind::ReconnectScheduled)
                            .with_camera(self.id)
                            .with_attempt(attempt)
                            .with_delay(delay)
                            .with_reason(err.to_string()),
                    );

                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Some(Outcome::Cancelled),
                        _ = time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    /// Transition into `Connected`; a no-op if already there. Resets the
    /// retry counter and announces the restoration.
    fn mark_connected(&self) {
        let already = self.state.borrow().status == ConnectionStatus::Connected;
        if already {
            return;
        }
        self.state.send_modify(|s| {
            s.status = ConnectionStatus::Connected;
            s.retry_count = 0;
        });
        self.bus
            .publish(Event::now(EventKind::ConnectionRestored).with_camera(self.id));
    }

    fn mark_disconnected(&self) {
        self.set_status(ConnectionStatus::Disconnected);
        self.bus
            .publish(Event::now(EventKind::ConnectionLost).with_camera(self.id));
    }

    fn set_status(&self, status: ConnectionStatus) {
        self.state.send_modify(|s| s.status = status);
    }
}
