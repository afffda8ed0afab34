//! # Notification sink contract.
//!
//! [`Subscribe`] is the extension point the UI layer implements to react to
//! connection events (status indicators, status-bar messages, alert lists).
//! Each subscriber is driven by its own worker fed from a bounded queue
//! owned by the [`SubscriberSet`](crate::SubscriberSet), so a slow sink
//! never blocks the watchers or other sinks.
//!
//! Delivery is fire-and-forget: no acknowledgment, per-camera ordering
//! only, and events dropped on overflow (reported via
//! [`SubscriberOverflow`](crate::EventKind::SubscriberOverflow)).

use async_trait::async_trait;

use crate::events::Event;

/// Consumer of supervisor events.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event. Treat it as an immutable snapshot; never write
    /// back into supervisor state from here.
    async fn on_event(&self, event: &Event);

    /// Name used in overflow/panic reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of this subscriber's queue; events beyond it are dropped.
    fn queue_capacity(&self) -> usize {
        256
    }
}
