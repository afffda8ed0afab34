//! # Broadcast bus for supervisor events.
//!
//! Thin wrapper over [`tokio::sync::broadcast`]. Watchers and the
//! supervisor publish without blocking; each subscriber gets an independent
//! receiver and only sees events sent after it subscribed.
//!
//! The channel is a bounded ring buffer: a receiver that falls more than
//! `capacity` events behind observes `RecvError::Lagged(n)` and skips the
//! `n` oldest items. Events are not persisted anywhere.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for [`Event`]s. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus with the given ring-buffer capacity (clamped to >= 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all current receivers; never blocks.
    ///
    /// With no receivers the event is silently dropped.
    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Creates a receiver observing events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
