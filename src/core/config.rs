//! # Supervisor configuration.
//!
//! Tuning knobs shared by every watcher the supervisor spawns. Defaults
//! match the classic surveillance setup: probe every 5 seconds, three
//! reconnect attempts 2 seconds apart, then give up until someone asks
//! again.

use std::time::Duration;

use crate::policies::BackoffPolicy;

/// Runtime parameters for [`ConnectionSupervisor`](crate::ConnectionSupervisor).
#[derive(Clone, Debug)]
pub struct SupervisorConfig {
    /// Interval between liveness probes while a camera is connected.
    pub check_interval: Duration,
    /// Delay schedule between reconnect attempts.
    pub backoff: BackoffPolicy,
    /// Reconnect attempts per loss episode before parking in `Failed`.
    pub max_retries: u32,
    /// How long `stop` waits for a watcher to wind down before aborting it.
    pub grace: Duration,
    /// Upper bound on a single backend call. Zero means unbounded.
    pub backend_timeout: Duration,
    /// Event bus depth. Clamped to at least 1.
    pub bus_capacity: usize,
}

impl SupervisorConfig {
    /// Backend call bound, `None` when unbounded.
    pub(crate) fn backend_timeout(&self) -> Option<Duration> {
        if self.backend_timeout.is_zero() {
            None
        } else {
            Some(self.backend_timeout)
        }
    }

    pub(crate) fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(5),
            backoff: BackoffPolicy::default(),
            max_retries: 3,
            grace: Duration::from_secs(5),
            backend_timeout: Duration::ZERO,
            bus_capacity: 1024,
        }
    }
}
