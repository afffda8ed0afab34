//! Notification sinks: the consumer side of the event stream.
//!
//! ## Contents
//! - [`Subscribe`] the sink contract (the UI layer implements this)
//! - [`SubscriberSet`] bounded-queue fan-out with panic isolation
//! - [`LogWriter`] production sink emitting structured `tracing` logs
//! - [`Recorder`] in-memory sink for tests and diagnostics

mod log;
mod recorder;
mod set;
mod subscribe;

pub use log::LogWriter;
pub use recorder::Recorder;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
