//! # Lifecycle events emitted by the supervisor and camera watchers.
//!
//! [`EventKind`] classifies what happened; [`Event`] carries the metadata
//! (camera id, attempt, delay, reason). Events are fire-and-forget
//! notifications for the UI layer: they are immutable snapshots and nothing
//! the receiver does feeds back into supervisor state.
//!
//! ## Ordering
//! Every event gets a globally monotonic sequence number (`seq`).
//! Events for one camera are published in state-machine order; no ordering
//! is guaranteed across cameras.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::registry::CameraId;

static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of supervisor events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A health check found the camera dead.
    ///
    /// Sets: `camera`.
    ConnectionLost,

    /// The camera transitioned into `Connected` (first check or reconnect).
    ///
    /// Sets: `camera`.
    ConnectionRestored,

    /// Reconnect attempts were exhausted; the camera is parked in `Failed`
    /// until an explicit `start`.
    ///
    /// Sets: `camera`, `attempt` (= retries used), `reason` (last error).
    ConnectionFailed,

    /// A reconnect attempt failed and another is scheduled after a delay.
    ///
    /// Sets: `camera`, `attempt`, `delay_ms`, `reason`.
    ReconnectScheduled,

    /// A watcher was spawned for a camera (`start` accepted).
    ///
    /// Sets: `camera`.
    WatchStarted,

    /// A watcher was stopped and joined (`stop` / `stop_all`).
    ///
    /// Sets: `camera`.
    WatchStopped,

    /// A watcher did not acknowledge cancellation within the grace period
    /// and was force-released.
    ///
    /// Sets: `camera` (single stop) or `reason` (aggregated `stop_all`).
    StopTimedOut,

    /// A subscriber queue overflowed and dropped this event.
    ///
    /// Sets: `reason` (subscriber name and cause).
    SubscriberOverflow,

    /// A subscriber panicked while handling an event.
    ///
    /// Sets: `reason` (subscriber name and panic message).
    SubscriberPanicked,
}

/// Supervisor event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally monotonic sequence number.
    pub seq: u64,
    /// Wall-clock timestamp, for logs.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Camera the event concerns, if any.
    pub camera: Option<CameraId>,
    /// Reconnect attempt number (1-based), where applicable.
    pub attempt: Option<u32>,
    /// Backoff delay before the next attempt, in milliseconds.
    pub delay_ms: Option<u32>,
    /// Human-readable detail (backend error, timeout summary, ...).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates an event with the current timestamp and next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            camera: None,
            attempt: None,
            delay_ms: None,
            reason: None,
        }
    }

    #[inline]
    pub fn with_camera(mut self, camera: CameraId) -> Self {
        self.camera = Some(camera);
        self
    }

    #[inline]
    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }

    /// Attaches a backoff delay (stored as milliseconds, saturating).
    #[inline]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_ms = Some(delay.as_millis().min(u128::from(u32::MAX)) as u32);
        self
    }

    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub(crate) fn subscriber_overflow(subscriber: &'static str, cause: &'static str) -> Self {
        Event::now(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} cause={cause}"))
    }

    pub(crate) fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::now(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} panic={info}"))
    }
}
