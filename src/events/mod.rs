//! Supervisor events: data model and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! Publishers: camera watchers and the supervisor. Consumers: the
//! supervisor's fan-out listener (which feeds the
//! [`SubscriberSet`](crate::SubscriberSet)) and any raw receiver obtained
//! via [`ConnectionSupervisor::subscribe`](crate::ConnectionSupervisor::subscribe).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
