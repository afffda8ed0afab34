//! # Supervisor assembly.
//!
//! [`SupervisorBuilder`] wires the pieces together: event bus, subscriber
//! fan-out, registry, and backend. `build` spawns the bus listener task, so
//! it must run inside a tokio runtime.

use std::sync::Arc;

use crate::backend::{AlwaysUp, BackendRef};
use crate::core::config::SupervisorConfig;
use crate::core::supervisor::{spawn_listener, ConnectionSupervisor};
use crate::events::Bus;
use crate::registry::CameraRegistry;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Builder for [`ConnectionSupervisor`].
///
/// ```no_run
/// use std::sync::Arc;
/// use camvisor::{CameraRegistry, LogWriter, SupervisorBuilder, SupervisorConfig};
///
/// # async fn assemble() {
/// let registry = Arc::new(CameraRegistry::open("camera_config.json"));
/// let supervisor = SupervisorBuilder::new(SupervisorConfig::default())
///     .with_registry(registry)
///     .add_subscriber(Arc::new(LogWriter::new()))
///     .build();
/// # }
/// ```
pub struct SupervisorBuilder {
    cfg: SupervisorConfig,
    registry: Option<Arc<CameraRegistry>>,
    backend: Option<BackendRef>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SupervisorBuilder {
    #[must_use]
    pub fn new(cfg: SupervisorConfig) -> Self {
        Self {
            cfg,
            registry: None,
            backend: None,
            subscribers: Vec::new(),
        }
    }

    /// Shares an existing registry. Defaults to an empty in-memory one.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<CameraRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Installs the stream backend. Defaults to [`AlwaysUp`].
    #[must_use]
    pub fn with_backend(mut self, backend: BackendRef) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Replaces the subscriber list.
    #[must_use]
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Appends one subscriber.
    #[must_use]
    pub fn add_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Assembles the supervisor and spawns its event listener.
    pub fn build(self) -> Arc<ConnectionSupervisor> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());

        if !self.subscribers.is_empty() {
            let set = SubscriberSet::new(self.subscribers, bus.clone());
            spawn_listener(&bus, set);
        }

        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(CameraRegistry::in_memory()));
        let backend = self.backend.unwrap_or_else(|| Arc::new(AlwaysUp));

        Arc::new(ConnectionSupervisor::new(self.cfg, bus, registry, backend))
    }
}
