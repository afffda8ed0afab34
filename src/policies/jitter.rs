//! # Jitter for reconnect delays.
//!
//! When many cameras drop at once (a switch reboot takes a whole segment
//! down), identical backoff schedules make every watcher retry in lockstep.
//! [`JitterPolicy`] spreads those retries out.

use rand::Rng;
use std::time::Duration;

/// Randomization applied to a computed backoff delay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// Use the exact delay. Predictable; fine for a single camera.
    #[default]
    None,
    /// Random delay in `[0, delay]`. Maximum spread.
    Full,
    /// `delay/2 + random[0, delay/2]`. Keeps at least half the spacing.
    Equal,
}

impl JitterPolicy {
    /// Applies this policy to `delay`.
    pub fn apply(&self, delay: Duration) -> Duration {
        let ms = delay.as_millis().min(u128::from(u64::MAX)) as u64;
        if ms == 0 {
            return Duration::ZERO;
        }
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => {
                let mut rng = rand::rng();
                Duration::from_millis(rng.random_range(0..=ms))
            }
            JitterPolicy::Equal => {
                let half = ms / 2;
                let mut rng = rand::rng();
                let extra = if half == 0 { 0 } else { rng.random_range(0..=half) };
                Duration::from_millis(half + extra)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_identity() {
        let d = Duration::from_millis(1234);
        assert_eq!(JitterPolicy::None.apply(d), d);
    }

    #[test]
    fn equal_keeps_at_least_half() {
        let d = Duration::from_millis(1000);
        for _ in 0..100 {
            let out = JitterPolicy::Equal.apply(d);
            assert!(out >= Duration::from_millis(500) && out <= d);
        }
    }

    #[test]
    fn zero_delay_stays_zero() {
        assert_eq!(JitterPolicy::Full.apply(Duration::ZERO), Duration::ZERO);
    }
}
