//! The sync coordinator decides for every read and write whether to go to the remote store, serve
//! the local cache or fall back to the local pending queue, and replays queued writes once the
//! remote is reachable again.

mod connectivity;
mod inner;
mod outcome;
mod remote;


pub use connectivity::Connectivity;
pub use outcome::{OperationOutcome, ReconcileReport, WriteMode};
pub use remote::TripRemote;

use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::SyncConfig;
use crate::stores::{KeyValueStore, LocalStore, StoreError};
use crate::trip::{Trip, TripInput};

use connectivity::ConnectivityFlag;
use inner::CoordinatorInner;

#[derive(Clone, Copy, Debug)]
struct Timings {
    reconcile_interval: Duration,
    reconnect_delay: Duration,
    startup_probe_delay: Duration,
}

impl From<&SyncConfig> for Timings {
    fn from(config: &SyncConfig) -> Self {
        Self {
            reconcile_interval: config.reconcile_interval,
            reconnect_delay: config.reconnect_delay,
            startup_probe_delay: config.startup_probe_delay,
        }
    }
}

/// Handles of the scheduled work owned by a coordinator. Everything still running is aborted
/// when the coordinator shuts down or is dropped.
#[derive(Default)]
struct BackgroundTasks {
    periodic: Mutex<Option<JoinHandle<()>>>,
    one_shots: Mutex<Vec<JoinHandle<()>>>,
}

impl BackgroundTasks {
    fn has_periodic(&self) -> bool {
        self.periodic
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn set_periodic(&self, handle: JoinHandle<()>) {
        let mut periodic = self.periodic.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = periodic.replace(handle) {
            previous.abort();
        }
    }

    fn push_one_shot(&self, handle: JoinHandle<()>) {
        let mut one_shots = self.one_shots.lock().unwrap_or_else(PoisonError::into_inner);
        one_shots.retain(|handle| !handle.is_finished());
        one_shots.push(handle);
    }

    fn abort_all(&self) {
        if let Some(handle) = self
            .periodic
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }

        let one_shots = std::mem::take(
            &mut *self.one_shots.lock().unwrap_or_else(PoisonError::into_inner),
        );

        for handle in one_shots {
            handle.abort();
        }
    }
}

struct Shared<R: TripRemote, KV: KeyValueStore> {
    connectivity: ConnectivityFlag,
    inner: async_std::sync::Mutex<CoordinatorInner<R, KV>>,
    tasks: BackgroundTasks,
    timings: Timings,
}

impl<R: TripRemote, KV: KeyValueStore> Shared<R, KV> {
    async fn reconcile(&self) -> ReconcileReport {
        self.inner.lock().await.reconcile(&self.connectivity).await
    }

    async fn probe(&self) -> Connectivity {
        self.inner.lock().await.probe(&self.connectivity).await
    }
}

/// Offline-first access to the trip collection.
///
/// All operations that touch the remote store or the pending queue are serialized, only one of
/// them is in flight at a time, including the scheduled reconciles. The connectivity state is
/// tracked separately and can be changed at any point by network status notifications.
///
/// Network failures are never returned to the caller. A failed remote call flips the coordinator
/// offline and the operation completes against the local store instead.
pub struct SyncCoordinator<R: TripRemote + 'static, KV: KeyValueStore + 'static> {
    shared: Arc<Shared<R, KV>>,
}

impl<R: TripRemote + 'static, KV: KeyValueStore + 'static> SyncCoordinator<R, KV> {
    /// Creates a coordinator over the provided remote and key-value storage. The initial
    /// connectivity should come from whatever network status signal the platform offers, it is
    /// corrected by the first remote call or probe.
    pub fn new(remote: R, kv: KV, config: &SyncConfig, initial: Connectivity) -> Self {
        let local = LocalStore::new(kv, config.cache_ttl);

        let shared = Shared {
            connectivity: ConnectivityFlag::new(initial),
            inner: async_std::sync::Mutex::new(CoordinatorInner::new(remote, local)),
            tasks: BackgroundTasks::default(),
            timings: Timings::from(config),
        };

        Self {
            shared: Arc::new(shared),
        }
    }

    pub fn connectivity(&self) -> Connectivity {
        self.shared.connectivity.get()
    }

    /// Network status notification that the platform is back online. The state is restored
    /// optimistically and a reconcile is scheduled after the reconnect delay.
    pub fn set_online(&self) {
        self.shared.connectivity.set(Connectivity::Online);

        let Ok(runtime) = Handle::try_current() else {
            tracing::debug!("no async runtime available, skipping the reconnect reconcile");
            return;
        };

        let weak = Arc::downgrade(&self.shared);
        let delay = self.shared.timings.reconnect_delay;

        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            let Some(shared) = weak.upgrade() else {
                return;
            };

            let report = shared.reconcile().await;
            if report.confirmed > 0 {
                tracing::info!(confirmed = report.confirmed, "queued trips synced after reconnecting");
            }
        });

        self.shared.tasks.push_one_shot(handle);
    }

    /// Network status notification that the platform went offline.
    pub fn set_offline(&self) {
        self.shared.connectivity.set(Connectivity::Offline);
    }

    /// Lists every known trip. Offline, or with a fresh cache and no forced refresh, this never
    /// touches the network.
    pub async fn fetch_all(&self, force_refresh: bool) -> Vec<Trip> {
        self.shared
            .inner
            .lock()
            .await
            .fetch_all(&self.shared.connectivity, force_refresh)
            .await
    }

    /// Records a new trip. A valid input always ends up persisted somewhere, the outcome's mode
    /// reports whether that was the remote store or the local queue.
    pub async fn save(&self, input: &TripInput) -> OperationOutcome {
        self.shared
            .inner
            .lock()
            .await
            .save(&self.shared.connectivity, input)
            .await
    }

    /// Edits a trip already held by the remote store. There is no offline editing, trips still
    /// waiting in the local queue are rejected.
    pub async fn update(&self, id: &str, input: &TripInput) -> OperationOutcome {
        self.shared
            .inner
            .lock()
            .await
            .update(&self.shared.connectivity, id, input)
            .await
    }

    pub async fn delete(&self, id: &str) -> OperationOutcome {
        self.shared
            .inner
            .lock()
            .await
            .delete(&self.shared.connectivity, id)
            .await
    }

    /// Replays every unsynced queued trip to the remote store. Does nothing while offline.
    pub async fn reconcile(&self) -> ReconcileReport {
        self.shared.reconcile().await
    }

    /// Asks the remote store whether it is reachable and records the answer as the current
    /// connectivity.
    pub async fn probe_connectivity(&self) -> Connectivity {
        self.shared.probe().await
    }

    pub async fn pending_records(&self) -> Vec<Trip> {
        self.shared.inner.lock().await.local.pending_records().await
    }

    /// Number of queued trips not yet confirmed by the remote store.
    pub async fn pending_count(&self) -> usize {
        self.pending_records()
            .await
            .iter()
            .filter(|trip| !trip.synced)
            .count()
    }

    /// Removes queue entries the remote store has already confirmed.
    pub async fn prune_synced(&self) -> Result<usize, StoreError> {
        self.shared.inner.lock().await.local.prune_synced().await
    }

    /// Schedules the startup connectivity probe and the periodic reconcile. While offline the
    /// periodic task probes the remote instead, so the coordinator recovers even without a status
    /// notification. Calling this again while the tasks are running has no effect.
    pub fn start_background_sync(&self) {
        if self.shared.tasks.has_periodic() {
            return;
        }

        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("background sync requires an async runtime, not scheduling it");
            return;
        };

        let timings = self.shared.timings;

        let weak = Arc::downgrade(&self.shared);
        let startup = runtime.spawn(async move {
            tokio::time::sleep(timings.startup_probe_delay).await;

            let Some(shared) = weak.upgrade() else {
                return;
            };

            if shared.probe().await.is_online() {
                shared.reconcile().await;
            }
        });
        self.shared.tasks.push_one_shot(startup);

        let weak = Arc::downgrade(&self.shared);
        let periodic = runtime.spawn(periodic_sync(weak, timings.reconcile_interval));
        self.shared.tasks.set_periodic(periodic);

        tracing::debug!(
            interval_secs = timings.reconcile_interval.as_secs(),
            "background sync scheduled"
        );
    }

    /// Stops every scheduled task. Operations remain usable afterwards, only the automatic
    /// reconciles end.
    pub fn shutdown(&self) {
        self.shared.tasks.abort_all();
    }
}

impl<R: TripRemote + 'static, KV: KeyValueStore + 'static> Drop for SyncCoordinator<R, KV> {
    fn drop(&mut self) {
        self.shared.tasks.abort_all();
    }
}

async fn periodic_sync<R: TripRemote + 'static, KV: KeyValueStore + 'static>(
    weak: Weak<Shared<R, KV>>,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    // The first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;

        let Some(shared) = weak.upgrade() else {
            return;
        };

        if !shared.connectivity.is_online() && !shared.probe().await.is_online() {
            continue;
        }

        shared.reconcile().await;
    }
}
