//! # Single backend interactions, bounded and cancellable.
//!
//! Thin wrappers around [`StreamBackend`] calls that layer on the two
//! things every call site needs: an optional timeout and a race against
//! the watcher's cancellation token. Keeping these here keeps the watcher
//! loop readable.

use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::backend::BackendRef;
use crate::error::BackendError;
use crate::registry::CameraRecord;

/// Outcome of one liveness probe.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Probe {
    Alive,
    Dead,
    Cancelled,
}

/// Outcome of one reconnect attempt.
#[derive(Debug)]
pub(crate) enum Reconnect {
    Restored,
    Failed(BackendError),
    Cancelled,
}

/// Runs one liveness check. A timed-out check counts as dead.
pub(crate) async fn check_once(
    backend: &BackendRef,
    record: &CameraRecord,
    timeout: Option<Duration>,
    cancel: &CancellationToken,
) -> Probe {
    let call = async {
        match timeout {
            Some(limit) => time::timeout(limit, backend.check_alive(record))
                .await
                .unwrap_or(false),
            None => backend.check_alive(record).await,
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Probe::Cancelled,
        alive = call => {
            if alive { Probe::Alive } else { Probe::Dead }
        }
    }
}

/// Runs one reconnect attempt. A timed-out attempt maps to
/// [`BackendError::Timeout`].
pub(crate) async fn reconnect_once(
    backend: &BackendRef,
    record: &CameraRecord,
    timeout: Option<Duration>,
    cancel: &CancellationToken,
) -> Reconnect {
    let call = async {
        match timeout {
            Some(limit) => match time::timeout(limit, backend.reconnect(record)).await {
                Ok(result) => result,
                Err(_) => Err(BackendError::Timeout { timeout: limit }),
            },
            None => backend.reconnect(record).await,
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Reconnect::Cancelled,
        result = call => match result {
            Ok(()) => Reconnect::Restored,
            Err(err) => Reconnect::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::backend::StreamBackend;
    use crate::registry::{CameraRecord, Endpoint};

    struct SlowBackend;

    #[async_trait]
    impl StreamBackend for SlowBackend {
        async fn check_alive(&self, _record: &CameraRecord) -> bool {
            time::sleep(Duration::from_secs(60)).await;
            true
        }

        async fn reconnect(&self, _record: &CameraRecord) -> Result<(), BackendError> {
            time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }
    }

    fn record() -> CameraRecord {
        CameraRecord::new(
            "probe-cam",
            Endpoint::Rtsp {
                url: "rtsp://10.0.0.1/stream".into(),
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_check_counts_as_dead() {
        let backend: BackendRef = Arc::new(SlowBackend);
        let cancel = CancellationToken::new();

        let probe = check_once(
            &backend,
            &record(),
            Some(Duration::from_millis(100)),
            &cancel,
        )
        .await;
        assert_eq!(probe, Probe::Dead);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_reconnect_maps_to_timeout_error() {
        let backend: BackendRef = Arc::new(SlowBackend);
        let cancel = CancellationToken::new();

        let out = reconnect_once(
            &backend,
            &record(),
            Some(Duration::from_millis(100)),
            &cancel,
        )
        .await;
        assert!(matches!(out, Reconnect::Failed(BackendError::Timeout { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_wins_over_a_hung_backend() {
        let backend: BackendRef = Arc::new(SlowBackend);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let probe = check_once(&backend, &record(), None, &cancel).await;
        assert_eq!(probe, Probe::Cancelled);
    }
}
