//! # Backoff policy for reconnect attempts.
//!
//! [`BackoffPolicy`] computes the delay inserted before reconnect attempt
//! `n` as `first × factor^n`, clamped to `max`, with optional jitter applied
//! on top. The default is the fixed 2-second spacing the monitoring UI
//! expects; setting `factor > 1.0` turns it into exponential backoff without
//! touching the call sites.
//!
//! The base delay derives purely from the attempt number, so jitter output
//! never feeds back into later delays.

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Delay schedule between reconnect attempts.
#[derive(Clone, Copy, Debug)]
pub struct BackoffPolicy {
    /// Delay before the first retry.
    pub first: Duration,
    /// Cap applied to every delay.
    pub max: Duration,
    /// Multiplicative growth factor (`1.0` = fixed spacing).
    pub factor: f64,
    /// Randomization applied to the clamped base delay.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Fixed 2s spacing, capped at 30s, no jitter.
    fn default() -> Self {
        Self {
            first: Duration::from_secs(2),
            max: Duration::from_secs(30),
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }
}

impl BackoffPolicy {
    /// Exponential variant: `first` doubling per attempt up to `max`.
    pub fn exponential(first: Duration, max: Duration) -> Self {
        Self {
            first,
            max,
            factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }

    /// Delay before retry number `attempt` (0-indexed).
    pub fn next(&self, attempt: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let exp = attempt.min(i32::MAX as u32) as i32;
        let raw = self.first.as_secs_f64() * self.factor.powi(exp);

        let base = if !raw.is_finite() || raw < 0.0 || raw > max_secs {
            self.max
        } else {
            Duration::from_secs_f64(raw)
        };
        self.jitter.apply(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fixed_two_seconds() {
        let policy = BackoffPolicy::default();
        for attempt in 0..8 {
            assert_eq!(policy.next(attempt), Duration::from_secs(2));
        }
    }

    #[test]
    fn exponential_doubles_until_cap() {
        let policy = BackoffPolicy::exponential(Duration::from_millis(500), Duration::from_secs(4));
        assert_eq!(policy.next(0), Duration::from_millis(500));
        assert_eq!(policy.next(1), Duration::from_secs(1));
        assert_eq!(policy.next(2), Duration::from_secs(2));
        assert_eq!(policy.next(3), Duration::from_secs(4));
        assert_eq!(policy.next(4), Duration::from_secs(4));
    }

    #[test]
    fn first_above_cap_is_clamped() {
        let policy = BackoffPolicy {
            first: Duration::from_secs(60),
            max: Duration::from_secs(5),
            factor: 1.0,
            jitter: JitterPolicy::None,
        };
        assert_eq!(policy.next(0), Duration::from_secs(5));
    }

    #[test]
    fn huge_attempt_does_not_overflow() {
        let policy = BackoffPolicy::exponential(Duration::from_millis(100), Duration::from_secs(10));
        assert_eq!(policy.next(u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn full_jitter_stays_within_base() {
        let policy = BackoffPolicy {
            first: Duration::from_secs(2),
            max: Duration::from_secs(30),
            factor: 1.0,
            jitter: JitterPolicy::Full,
        };
        for attempt in 0..32 {
            assert!(policy.next(attempt) <= Duration::from_secs(2));
        }
    }
}
