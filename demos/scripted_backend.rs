//! Supervises two cameras over a scripted backend: one stays healthy, the
//! other drops its stream once and recovers, then drops for good.
//!
//! Run with: `cargo run --example scripted_backend`

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use camvisor::{
    BackendError, CameraRecord, CameraRegistry, Endpoint, LogWriter, StreamBackend,
    SupervisorBuilder, SupervisorConfig,
};

/// Per-camera scripts keyed by record name; unscripted calls succeed.
struct ScriptedBackend {
    checks: Mutex<VecDeque<(String, bool)>>,
}

#[async_trait]
impl StreamBackend for ScriptedBackend {
    async fn check_alive(&self, record: &CameraRecord) -> bool {
        let mut checks = self.checks.lock().unwrap();
        if let Some(pos) = checks.iter().position(|(name, _)| *name == record.name) {
            let (_, alive) = checks.remove(pos).unwrap();
            return alive;
        }
        true
    }

    async fn reconnect(&self, record: &CameraRecord) -> Result<(), BackendError> {
        if record.name == "flaky" {
            Err(BackendError::transport("stream refused"))
        } else {
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let registry = Arc::new(CameraRegistry::in_memory());
    let steady = registry.add(CameraRecord::new(
        "steady",
        Endpoint::Rtsp {
            url: "rtsp://10.0.0.11/main".into(),
        },
    ))?;
    let flaky = registry.add(CameraRecord::new(
        "flaky",
        Endpoint::Rtsp {
            url: "rtsp://10.0.0.12/main".into(),
        },
    ))?;

    let backend = Arc::new(ScriptedBackend {
        checks: Mutex::new(VecDeque::from([
            ("flaky".to_string(), true),
            ("flaky".to_string(), false),
        ])),
    });

    let cfg = SupervisorConfig {
        check_interval: Duration::from_secs(1),
        ..SupervisorConfig::default()
    };
    let supervisor = SupervisorBuilder::new(cfg)
        .with_registry(registry)
        .with_backend(backend)
        .add_subscriber(Arc::new(LogWriter::new()))
        .build();

    let mut events = supervisor.subscribe();
    supervisor.start(steady).await?;
    supervisor.start(flaky).await?;

    let watch = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            println!(
                "#{:<4} {:?} camera={:?} attempt={:?}",
                event.seq, event.kind, event.camera, event.attempt
            );
        }
    });

    tokio::time::sleep(Duration::from_secs(12)).await;

    for id in supervisor.managed().await {
        if let Some(state) = supervisor.status(id).await {
            println!(
                "camera {id}: {} (retries {}/{})",
                state.status.as_label(),
                state.retry_count,
                state.max_retries
            );
        }
    }

    supervisor.stop_all().await;
    watch.abort();
    Ok(())
}
