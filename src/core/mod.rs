//! Supervision core: configuration, per-camera state, watcher tasks, and
//! the supervisor that owns them.

mod builder;
mod config;
mod probe;
mod state;
mod supervisor;
mod watcher;

pub use builder::SupervisorBuilder;
pub use config::SupervisorConfig;
pub use state::{ConnectionState, ConnectionStatus};
pub use supervisor::ConnectionSupervisor;
