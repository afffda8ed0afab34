//! Retry policies: how long to wait between reconnect attempts.
//!
//! ## Contents
//! - [`BackoffPolicy`] delay schedule (fixed by default, exponential via `factor`)
//! - [`JitterPolicy`] randomization to avoid synchronized retries
//!
//! The retry *bound* itself (`max_retries`) lives in
//! [`SupervisorConfig`](crate::SupervisorConfig); these policies only shape
//! the spacing.

mod backoff;
mod jitter;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
