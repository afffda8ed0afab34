//! # Non-blocking fan-out to notification sinks.
//!
//! [`SubscriberSet`] gives every sink a bounded mpsc queue and a dedicated
//! worker task. `emit` uses `try_send`, so publishing never waits on a slow
//! sink; a full queue drops the event for that sink only and reports it on
//! the bus. Worker panics are caught with `catch_unwind`, reported, and the
//! worker keeps going.
//!
//! Per-sink delivery is FIFO; there is no ordering across sinks.

use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::events::{Bus, Event, EventKind};
use crate::subscribers::Subscribe;

struct SinkChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator over a fixed set of subscribers.
pub struct SubscriberSet {
    channels: Vec<SinkChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Spawns one worker per subscriber. Must run inside a tokio runtime.
    #[must_use]
    pub fn new(subscribers: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subscribers.len());
        let mut workers = Vec::with_capacity(subscribers.len());

        for sub in subscribers {
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(sub.queue_capacity().max(1));
            let report_bus = bus.clone();

            let worker = tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    let handled = std::panic::AssertUnwindSafe(sub.on_event(event.as_ref()))
                        .catch_unwind()
                        .await;
                    if let Err(panic) = handled {
                        let info = panic
                            .downcast_ref::<&'static str>()
                            .map(|s| (*s).to_string())
                            .or_else(|| panic.downcast_ref::<String>().cloned())
                            .unwrap_or_else(|| "unknown panic".to_string());
                        report_bus.publish(Event::subscriber_panicked(sub.name(), info));
                    }
                }
            });

            channels.push(SinkChannel { name, sender: tx });
            workers.push(worker);
        }

        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Delivers an event to every subscriber queue; never blocks.
    pub fn emit(&self, event: &Event) {
        self.emit_arc(Arc::new(event.clone()));
    }

    /// Delivers a pre-allocated event; never blocks.
    ///
    /// Overflow reports are not re-reported when they themselves overflow,
    /// which keeps a saturated sink from feeding back into the bus forever.
    pub fn emit_arc(&self, event: Arc<Event>) {
        let is_overflow = matches!(event.kind, EventKind::SubscriberOverflow);

        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    if !is_overflow {
                        self.bus
                            .publish(Event::subscriber_overflow(channel.name, "full"));
                    }
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    if !is_overflow {
                        self.bus
                            .publish(Event::subscriber_overflow(channel.name, "closed"));
                    }
                }
            }
        }
    }

    /// Closes all queues and waits for the workers to drain.
    pub async fn shutdown(self) {
        drop(self.channels);
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}
