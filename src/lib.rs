//! # camvisor
//!
//! Connection lifecycle supervision for camera fleets: one watcher task per
//! camera probes liveness on a fixed interval, runs bounded backoff-spaced
//! reconnects when the stream drops, and publishes lifecycle events for the
//! UI layer. One camera going dark never takes the rest down.
//!
//! ```text
//!                 ┌────────────────────┐
//!   start/stop ──▶│ ConnectionSupervisor│──▶ watcher task (camera 1)
//!   status     ──▶│   slot map          │──▶ watcher task (camera 2)
//!                 └─────────┬──────────┘          │ check / reconnect
//!                           │ events              ▼
//!                 ┌─────────▼──────────┐    StreamBackend
//!                 │ Bus (broadcast)    │
//!                 └─────────┬──────────┘
//!                           │ fan-out (bounded queues)
//!                 ┌─────────▼──────────┐
//!                 │ SubscriberSet      │──▶ LogWriter, UI sinks, ...
//!                 └────────────────────┘
//! ```
//!
//! ## Lifecycle
//!
//! `Disconnected → Connecting → Connected`, with
//! `Connected → Disconnected → Reconnecting → {Connected | Failed}` on
//! stream loss. `Failed` means the retry budget (default 3 attempts, 2 s
//! apart) is exhausted; the camera stays queryable and an explicit
//! [`start`](ConnectionSupervisor::start) revives it. Every wait is a
//! cancellation point, so [`stop`](ConnectionSupervisor::stop) and
//! [`stop_all`](ConnectionSupervisor::stop_all) complete within a bounded
//! grace period even over hung backends.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use camvisor::{
//!     CameraRecord, CameraRegistry, Endpoint, LogWriter, SupervisorBuilder,
//!     SupervisorConfig,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(CameraRegistry::open("camera_config.json"));
//! let id = registry.add(CameraRecord::new(
//!     "front-gate",
//!     Endpoint::Rtsp { url: "rtsp://10.0.0.12/stream1".into() },
//! ))?;
//!
//! let supervisor = SupervisorBuilder::new(SupervisorConfig::default())
//!     .with_registry(registry)
//!     .add_subscriber(Arc::new(LogWriter::new()))
//!     .build();
//!
//! supervisor.start(id).await?;
//! let mut events = supervisor.subscribe();
//! while let Ok(event) = events.recv().await {
//!     println!("{:?} camera={:?}", event.kind, event.camera);
//! }
//! # Ok(())
//! # }
//! ```

mod backend;
mod core;
mod error;
mod events;
mod policies;
mod registry;
mod subscribers;

pub use crate::backend::{AlwaysUp, BackendRef, StreamBackend};
pub use crate::core::{
    ConnectionState, ConnectionStatus, ConnectionSupervisor, SupervisorBuilder, SupervisorConfig,
};
pub use crate::error::{BackendError, StartError, StopError};
pub use crate::events::{Bus, Event, EventKind};
pub use crate::policies::{BackoffPolicy, JitterPolicy};
pub use crate::registry::{
    CameraEntry, CameraId, CameraRecord, CameraRegistry, Credentials, Endpoint, RecordError,
    StoreError,
};
pub use crate::subscribers::{LogWriter, Recorder, Subscribe, SubscriberSet};
