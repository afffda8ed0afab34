//! # Connection supervisor.
//!
//! [`ConnectionSupervisor`] owns the map of supervised cameras. Each `start`
//! spawns one watcher task ([`CameraWatcher`](crate::core::watcher)); the
//! supervisor keeps a slot per camera holding the watcher's cancellation
//! token, join handle, and a read side of its state channel.
//!
//! ## Invariants
//! - At most one watcher per camera id; `start` on a live id is rejected.
//! - A watcher parked in `Failed` (retries exhausted, task returned) keeps
//!   its slot so `status` still answers; an explicit `start` replaces it.
//! - `stop` joins the watcher within the configured grace period, aborting
//!   it on timeout; either way the slot is released and no further events
//!   for that id are published.
//! - One camera failing never affects the others.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::backend::BackendRef;
use crate::core::config::SupervisorConfig;
use crate::core::state::{ConnectionState, ConnectionStatus};
use crate::core::watcher::{CameraWatcher, Outcome, WatcherParams};
use crate::error::{StartError, StopError};
use crate::events::{Bus, Event, EventKind};
use crate::registry::{CameraId, CameraRegistry};
use crate::subscribers::SubscriberSet;

struct WatcherSlot {
    cancel: CancellationToken,
    join: JoinHandle<Outcome>,
    state: watch::Receiver<ConnectionState>,
}

/// Supervises one watcher task per camera.
pub struct ConnectionSupervisor {
    cfg: SupervisorConfig,
    bus: Bus,
    registry: Arc<CameraRegistry>,
    backend: BackendRef,
    watchers: Mutex<HashMap<CameraId, WatcherSlot>>,
}

impl ConnectionSupervisor {
    pub(crate) fn new(
        cfg: SupervisorConfig,
        bus: Bus,
        registry: Arc<CameraRegistry>,
        backend: BackendRef,
    ) -> Self {
        Self {
            cfg,
            bus,
            registry,
            backend,
            watchers: Mutex::new(HashMap::new()),
        }
    }

    /// Begins supervising camera `id`.
    ///
    /// The record is fetched from the registry and validated before any
    /// state is created. A camera whose watcher parked in `Failed` is
    /// restarted in place; a live watcher is rejected with `AlreadyManaged`.
    pub async fn start(&self, id: CameraId) -> Result<(), StartError> {
        let record = self
            .registry
            .get(id)
            .ok_or(StartError::UnknownCamera { camera: id })?;
        record
            .validate()
            .map_err(|source| StartError::InvalidConfiguration { camera: id, source })?;

        let mut watchers = self.watchers.lock().await;
        if let Some(slot) = watchers.get(&id) {
            let parked = slot.join.is_finished()
                && slot.state.borrow().status == ConnectionStatus::Failed;
            if !parked {
                return Err(StartError::AlreadyManaged { camera: id });
            }
            watchers.remove(&id);
        }

        let (state_tx, state_rx) = watch::channel(ConnectionState::connecting(self.cfg.max_retries));
        let cancel = CancellationToken::new();
        let params = WatcherParams {
            check_interval: self.cfg.check_interval,
            backoff: self.cfg.backoff,
            max_retries: self.cfg.max_retries,
            backend_timeout: self.cfg.backend_timeout(),
        };
        let watcher = CameraWatcher::new(
            id,
            record,
            Arc::clone(&self.backend),
            self.bus.clone(),
            params,
            state_tx,
        );
        let join = tokio::spawn(watcher.run(cancel.clone()));

        watchers.insert(id, WatcherSlot { cancel, join, state: state_rx });
        drop(watchers);

        info!(camera = id, "supervision started");
        self.bus
            .publish(Event::now(EventKind::WatchStarted).with_camera(id));
        Ok(())
    }

    /// Stops supervising camera `id`, releasing its state.
    pub async fn stop(&self, id: CameraId) -> Result<(), StopError> {
        let slot = self
            .watchers
            .lock()
            .await
            .remove(&id)
            .ok_or(StopError::NotManaged { camera: id })?;

        if self.wind_down(id, slot).await {
            self.bus.publish(
                Event::now(EventKind::StopTimedOut)
                    .with_camera(id)
                    .with_reason("grace period expired, watcher aborted"),
            );
        }

        info!(camera = id, "supervision stopped");
        self.bus
            .publish(Event::now(EventKind::WatchStopped).with_camera(id));
        Ok(())
    }

    /// Stops every supervised camera. Cancels all watchers up front, then
    /// joins each within the grace bound; stuck watchers are aborted and
    /// reported in one aggregated event.
    pub async fn stop_all(&self) {
        let drained: Vec<(CameraId, WatcherSlot)> =
            self.watchers.lock().await.drain().collect();
        if drained.is_empty() {
            return;
        }

        for (_, slot) in &drained {
            slot.cancel.cancel();
        }

        let mut stuck = Vec::new();
        for (id, slot) in drained {
            if self.wind_down(id, slot).await {
                stuck.push(id);
            }
            self.bus
                .publish(Event::now(EventKind::WatchStopped).with_camera(id));
        }

        if !stuck.is_empty() {
            warn!(cameras = ?stuck, "watchers aborted after grace period");
            self.bus.publish(
                Event::now(EventKind::StopTimedOut)
                    .with_reason(format!("aborted after grace: {stuck:?}")),
            );
        }
        info!("all supervision stopped");
    }

    /// Cancels and joins one watcher. Returns true if the grace period
    /// expired and the task was aborted.
    async fn wind_down(&self, id: CameraId, mut slot: WatcherSlot) -> bool {
        slot.cancel.cancel();
        match time::timeout(self.cfg.grace, &mut slot.join).await {
            Ok(_) => false,
            Err(_) => {
                warn!(camera = id, "watcher did not stop within grace, aborting");
                slot.join.abort();
                true
            }
        }
    }

    /// Current lifecycle snapshot for `id`, if supervised.
    pub async fn status(&self, id: CameraId) -> Option<ConnectionState> {
        self.watchers
            .lock()
            .await
            .get(&id)
            .map(|slot| slot.state.borrow().clone())
    }

    /// Ids with a supervision slot, in ascending order. Includes cameras
    /// parked in `Failed`.
    pub async fn managed(&self) -> Vec<CameraId> {
        let mut ids: Vec<CameraId> = self.watchers.lock().await.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub async fn is_managed(&self, id: CameraId) -> bool {
        self.watchers.lock().await.contains_key(&id)
    }

    /// Raw receiver over the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.cfg
    }

    pub fn registry(&self) -> &Arc<CameraRegistry> {
        &self.registry
    }
}

/// Forwards every bus event into the subscriber set until the bus closes,
/// then drains the sink workers.
pub(crate) fn spawn_listener(bus: &Bus, subscribers: SubscriberSet) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => subscribers.emit_arc(Arc::new(event)),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "event listener lagged, events skipped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        subscribers.shutdown().await;
    })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::backend::StreamBackend;
    use crate::core::builder::SupervisorBuilder;
    use crate::error::BackendError;
    use crate::registry::{CameraRecord, Endpoint};

    fn record(name: &str) -> CameraRecord {
        CameraRecord::new(
            name,
            Endpoint::Rtsp {
                url: format!("rtsp://192.168.1.10/{name}"),
            },
        )
    }

    fn registry_with(names: &[&str]) -> (Arc<CameraRegistry>, Vec<CameraId>) {
        let registry = Arc::new(CameraRegistry::in_memory());
        let ids = names
            .iter()
            .map(|name| registry.add(record(name)).unwrap())
            .collect();
        (registry, ids)
    }

    fn fast_cfg() -> SupervisorConfig {
        SupervisorConfig {
            check_interval: Duration::from_millis(100),
            grace: Duration::from_millis(500),
            ..SupervisorConfig::default()
        }
    }

    /// Camera that never answers: checks fail, reconnects fail.
    struct AlwaysDown;

    #[async_trait]
    impl StreamBackend for AlwaysDown {
        async fn check_alive(&self, _record: &CameraRecord) -> bool {
            false
        }

        async fn reconnect(&self, _record: &CameraRecord) -> Result<(), BackendError> {
            Err(BackendError::transport("connection refused"))
        }
    }

    /// Plays back scripted probe/reconnect outcomes, then settles on
    /// healthy behavior.
    #[derive(Default)]
    struct Scripted {
        checks: StdMutex<VecDeque<bool>>,
        reconnects: StdMutex<VecDeque<bool>>,
    }

    impl Scripted {
        fn with_checks(checks: &[bool]) -> Self {
            Self {
                checks: StdMutex::new(checks.iter().copied().collect()),
                reconnects: StdMutex::new(VecDeque::new()),
            }
        }
    }

    #[async_trait]
    impl StreamBackend for Scripted {
        async fn check_alive(&self, _record: &CameraRecord) -> bool {
            self.checks.lock().unwrap().pop_front().unwrap_or(true)
        }

        async fn reconnect(&self, _record: &CameraRecord) -> Result<(), BackendError> {
            if self.reconnects.lock().unwrap().pop_front().unwrap_or(true) {
                Ok(())
            } else {
                Err(BackendError::transport("still down"))
            }
        }
    }

    /// Never resolves; stops must stay bounded regardless.
    struct Hung;

    #[async_trait]
    impl StreamBackend for Hung {
        async fn check_alive(&self, _record: &CameraRecord) -> bool {
            std::future::pending().await
        }

        async fn reconnect(&self, _record: &CameraRecord) -> Result<(), BackendError> {
            std::future::pending().await
        }
    }

    /// Routes per camera name: cameras named "bad*" are permanently down.
    struct Split;

    #[async_trait]
    impl StreamBackend for Split {
        async fn check_alive(&self, record: &CameraRecord) -> bool {
            !record.name.starts_with("bad")
        }

        async fn reconnect(&self, record: &CameraRecord) -> Result<(), BackendError> {
            if record.name.starts_with("bad") {
                Err(BackendError::transport("no route"))
            } else {
                Ok(())
            }
        }
    }

    async fn wait_for_status(
        sup: &ConnectionSupervisor,
        id: CameraId,
        want: ConnectionStatus,
    ) -> ConnectionState {
        time::timeout(Duration::from_secs(120), async {
            loop {
                if let Some(state) = sup.status(id).await {
                    if state.status == want {
                        return state;
                    }
                }
                time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("camera {id} never reached {}", want.as_label()))
    }

    fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn count(events: &[Event], kind: EventKind) -> usize {
        events.iter().filter(|e| e.kind == kind).count()
    }

    #[tokio::test(start_paused = true)]
    async fn start_then_stop_leaves_no_residual_state() {
        let (registry, ids) = registry_with(&["gate"]);
        let sup = SupervisorBuilder::new(fast_cfg())
            .with_registry(registry)
            .build();
        let mut rx = sup.subscribe();

        sup.start(ids[0]).await.unwrap();
        wait_for_status(&sup, ids[0], ConnectionStatus::Connected).await;
        sup.stop(ids[0]).await.unwrap();

        assert!(sup.managed().await.is_empty());
        assert!(sup.status(ids[0]).await.is_none());
        assert!(matches!(
            sup.stop(ids[0]).await,
            Err(StopError::NotManaged { .. })
        ));

        // quiescent after stop: nothing new shows up however long we wait
        drain(&mut rx);
        time::sleep(Duration::from_secs(60)).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_is_rejected_without_touching_state() {
        let (registry, ids) = registry_with(&["gate"]);
        let sup = SupervisorBuilder::new(fast_cfg())
            .with_registry(registry)
            .build();

        sup.start(ids[0]).await.unwrap();
        let before = wait_for_status(&sup, ids[0], ConnectionStatus::Connected).await;

        let err = sup.start(ids[0]).await.unwrap_err();
        assert!(matches!(err, StartError::AlreadyManaged { camera } if camera == ids[0]));
        assert_eq!(sup.status(ids[0]).await, Some(before));
    }

    #[tokio::test(start_paused = true)]
    async fn start_of_unregistered_camera_is_rejected() {
        let sup = SupervisorBuilder::new(fast_cfg()).build();
        assert!(matches!(
            sup.start(42).await,
            Err(StartError::UnknownCamera { camera: 42 })
        ));
        assert!(sup.managed().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn hand_edited_config_with_bad_record_is_rejected_at_start() {
        let path = std::env::temp_dir().join(format!(
            "camvisor-supervisor-{}-badcfg.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"{
              "cameras": {
                "1": {
                  "info": { "name": "", "protocol": "rtsp", "url": "rtsp://x/1" },
                  "connected": false
                }
              },
              "layout": "2x2"
            }"#,
        )
        .unwrap();

        let registry = Arc::new(CameraRegistry::open(&path));
        let sup = SupervisorBuilder::new(fast_cfg())
            .with_registry(registry)
            .build();

        assert!(matches!(
            sup.start(1).await,
            Err(StartError::InvalidConfiguration { camera: 1, .. })
        ));
        assert!(sup.status(1).await.is_none());

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_parks_in_failed_after_exactly_three_attempts() {
        let (registry, ids) = registry_with(&["gate"]);
        let sup = SupervisorBuilder::new(fast_cfg())
            .with_registry(registry)
            .with_backend(Arc::new(AlwaysDown))
            .build();
        let mut rx = sup.subscribe();

        sup.start(ids[0]).await.unwrap();
        let state = wait_for_status(&sup, ids[0], ConnectionStatus::Failed).await;
        assert_eq!(state.retry_count, 3);

        // Failed is sticky until an explicit start
        time::sleep(Duration::from_secs(120)).await;
        assert_eq!(
            sup.status(ids[0]).await.map(|s| s.status),
            Some(ConnectionStatus::Failed)
        );
        assert!(sup.is_managed(ids[0]).await);

        let events = drain(&mut rx);
        assert_eq!(count(&events, EventKind::ConnectionLost), 1);
        assert_eq!(count(&events, EventKind::ReconnectScheduled), 2);
        assert_eq!(count(&events, EventKind::ConnectionFailed), 1);
        assert_eq!(count(&events, EventKind::ConnectionRestored), 0);

        let failed = events
            .iter()
            .find(|e| e.kind == EventKind::ConnectionFailed)
            .unwrap();
        assert_eq!(failed.camera, Some(ids[0]));
        assert_eq!(failed.attempt, Some(3));
        assert!(failed.reason.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_camera_is_restartable_by_explicit_start() {
        let (registry, ids) = registry_with(&["gate"]);
        let sup = SupervisorBuilder::new(fast_cfg())
            .with_registry(registry)
            .with_backend(Arc::new(AlwaysDown))
            .build();

        sup.start(ids[0]).await.unwrap();
        wait_for_status(&sup, ids[0], ConnectionStatus::Failed).await;

        // restart replaces the parked watcher and resets the retry budget
        sup.start(ids[0]).await.unwrap();
        let state = sup.status(ids[0]).await.unwrap();
        assert!(state.retry_count < 3 || state.status != ConnectionStatus::Failed);
        wait_for_status(&sup, ids[0], ConnectionStatus::Failed).await;
    }

    #[tokio::test(start_paused = true)]
    async fn blip_recovers_and_resets_retry_count() {
        let (registry, ids) = registry_with(&["gate"]);
        let sup = SupervisorBuilder::new(fast_cfg())
            .with_registry(registry)
            .with_backend(Arc::new(Scripted::with_checks(&[true, false])))
            .build();
        let mut rx = sup.subscribe();

        sup.start(ids[0]).await.unwrap();
        wait_for_status(&sup, ids[0], ConnectionStatus::Connected).await;

        // second probe fails, first reconnect succeeds
        time::sleep(Duration::from_secs(30)).await;
        let state = wait_for_status(&sup, ids[0], ConnectionStatus::Connected).await;
        assert_eq!(state.retry_count, 0);

        let events = drain(&mut rx);
        assert_eq!(count(&events, EventKind::ConnectionLost), 1);
        assert_eq!(count(&events, EventKind::ConnectionRestored), 2);
        assert_eq!(count(&events, EventKind::ConnectionFailed), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cameras_fail_independently() {
        let (registry, ids) = registry_with(&["good-lobby", "bad-garage"]);
        let sup = SupervisorBuilder::new(fast_cfg())
            .with_registry(registry)
            .with_backend(Arc::new(Split))
            .build();
        let mut rx = sup.subscribe();

        sup.start(ids[0]).await.unwrap();
        sup.start(ids[1]).await.unwrap();

        wait_for_status(&sup, ids[1], ConnectionStatus::Failed).await;
        assert_eq!(
            sup.status(ids[0]).await.map(|s| s.status),
            Some(ConnectionStatus::Connected)
        );
        assert_eq!(sup.managed().await, ids);

        let events = drain(&mut rx);
        assert!(events
            .iter()
            .filter(|e| e.camera == Some(ids[0]))
            .all(|e| e.kind != EventKind::ConnectionLost));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_all_is_bounded_even_with_hung_backends() {
        let (registry, ids) = registry_with(&["a", "b", "c"]);
        let cfg = fast_cfg();
        let grace = cfg.grace;
        let sup = SupervisorBuilder::new(cfg)
            .with_registry(registry)
            .with_backend(Arc::new(Hung))
            .build();

        for id in &ids {
            sup.start(*id).await.unwrap();
        }
        time::sleep(Duration::from_millis(50)).await;

        let bound = grace * (ids.len() as u32) + Duration::from_secs(1);
        time::timeout(bound, sup.stop_all())
            .await
            .expect("stop_all exceeded its bound");
        assert!(sup.managed().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_all_on_empty_supervisor_is_a_no_op() {
        let sup = SupervisorBuilder::new(fast_cfg()).build();
        let mut rx = sup.subscribe();
        sup.stop_all().await;
        assert!(drain(&mut rx).is_empty());
    }
}
