use std::collections::HashSet;

use rand_chacha::ChaCha20Rng;
use time::OffsetDateTime;

use crate::stores::{KeyValueStore, LocalStore};
use crate::sync::connectivity::{Connectivity, ConnectivityFlag};
use crate::sync::outcome::{OperationOutcome, ReconcileReport, WriteMode};
use crate::sync::remote::TripRemote;
use crate::trip::{newest_first, SourceTag, Trip, TripInput};
use crate::utils::{crypto_rng, is_local_record_id, local_record_id};

pub(crate) struct CoordinatorInner<R: TripRemote, KV: KeyValueStore> {
    pub(crate) remote: R,
    pub(crate) local: LocalStore<KV>,
    rng: ChaCha20Rng,
}

impl<R: TripRemote, KV: KeyValueStore> CoordinatorInner<R, KV> {
    pub(crate) fn new(remote: R, local: LocalStore<KV>) -> Self {
        Self {
            remote,
            local,
            rng: crypto_rng(),
        }
    }

    pub(crate) async fn fetch_all(
        &mut self,
        connectivity: &ConnectivityFlag,
        force_refresh: bool,
    ) -> Vec<Trip> {
        let offline = !connectivity.is_online();

        let cached = if offline || !force_refresh {
            self.local.read_cache().await
        } else {
            None
        };

        if offline || cached.is_some() {
            if let Some(trips) = cached {
                tracing::debug!(count = trips.len(), "serving trips from cache");
                return trips;
            }

            tracing::debug!("offline without a cache, serving the pending queue");
            return self.local.pending_records().await;
        }

        let remote_trips = match self.remote.list_all().await {
            Ok(trips) => trips,
            Err(err) => {
                tracing::warn!("failed to list remote trips, falling back to local data: {err}");
                connectivity.set(Connectivity::Offline);
                return self.local.pending_records().await;
            }
        };

        let pending: Vec<Trip> = self
            .local
            .pending_records()
            .await
            .into_iter()
            .filter(|trip| !trip.synced)
            .collect();

        tracing::info!(
            remote = remote_trips.len(),
            pending = pending.len(),
            "fetched trips from remote"
        );

        let mut seen = HashSet::new();
        let mut merged: Vec<Trip> = pending
            .into_iter()
            .chain(remote_trips)
            .filter(|trip| seen.insert(trip.id.clone()))
            .collect();

        // Stable sort, pending records keep their lead on equal timestamps
        merged.sort_by(newest_first);

        if let Err(err) = self.local.write_cache(&merged).await {
            tracing::warn!("failed to cache trip listing: {err}");
        }

        merged
    }

    pub(crate) async fn save(
        &mut self,
        connectivity: &ConnectivityFlag,
        input: &TripInput,
    ) -> OperationOutcome {
        if let Err(err) = input.validate() {
            return OperationOutcome::failed(err.to_string());
        }

        let now = OffsetDateTime::now_utc();

        if connectivity.is_online() {
            let draft = Trip::draft(input, Some(now));

            match self.remote.create(&draft).await {
                Ok(created) => {
                    tracing::info!(id = %created.id, "trip saved remotely");
                    self.invalidate_cache().await;

                    return OperationOutcome::completed(WriteMode::Remote, "trip saved")
                        .with_data(created);
                }
                Err(err) => {
                    tracing::warn!("remote save failed, queueing the trip locally: {err}");
                    connectivity.set(Connectivity::Offline);
                }
            }
        }

        let trip = Trip::local(local_record_id(&mut self.rng), input, now);

        match self.local.enqueue_pending(trip.clone()).await {
            Ok(()) => {
                tracing::info!(id = %trip.id, "trip queued locally");

                OperationOutcome::completed(
                    WriteMode::Local,
                    "trip saved locally, it will be synced when the connection returns",
                )
                .with_data(trip)
            }
            Err(err) => {
                tracing::error!("failed to queue trip locally: {err}");
                OperationOutcome::failed(format!("failed to save trip: {err}"))
            }
        }
    }

    pub(crate) async fn update(
        &mut self,
        connectivity: &ConnectivityFlag,
        id: &str,
        input: &TripInput,
    ) -> OperationOutcome {
        if let Err(err) = input.validate() {
            return OperationOutcome::failed(err.to_string());
        }

        if is_local_record_id(id) || self.find_unsynced(id).await.is_some() {
            return OperationOutcome::failed("trips waiting to be synced can't be edited");
        }

        let draft = Trip::draft(input, None);

        match self.remote.update(id, &draft).await {
            Ok(updated) => {
                tracing::info!(%id, "trip updated remotely");
                self.invalidate_cache().await;

                OperationOutcome::completed(WriteMode::Remote, "trip updated").with_data(updated)
            }
            Err(err) => {
                tracing::error!(%id, "failed to update trip: {err}");
                connectivity.set(Connectivity::Offline);

                OperationOutcome::failed(format!("failed to update trip: {err}"))
            }
        }
    }

    pub(crate) async fn delete(
        &mut self,
        connectivity: &ConnectivityFlag,
        id: &str,
    ) -> OperationOutcome {
        let queued = self
            .local
            .pending_records()
            .await
            .into_iter()
            .find(|trip| trip.id == id);

        let local_only = is_local_record_id(id)
            || queued
                .as_ref()
                .is_some_and(|trip| trip.source == SourceTag::Local);

        if local_only {
            // Local identifiers are queue keys the remote never assigned, removing the queue
            // entry is the whole deletion even once its copy was replayed
            return match self.local.remove_pending(id).await {
                Ok(Some(_)) => {
                    tracing::info!(%id, "removed queued trip");
                    self.invalidate_cache().await;
                    OperationOutcome::completed(WriteMode::Local, "trip removed")
                }
                Ok(None) => OperationOutcome::failed(format!("no queued trip with id {id}")),
                Err(err) => {
                    tracing::error!(%id, "failed to remove queued trip: {err}");
                    OperationOutcome::failed(format!("failed to remove trip: {err}"))
                }
            };
        }

        match self.remote.delete(id).await {
            Ok(()) => {
                tracing::info!(%id, "trip deleted remotely");

                if queued.is_some() {
                    if let Err(err) = self.local.remove_pending(id).await {
                        tracing::warn!(%id, "failed to drop synced queue entry: {err}");
                    }
                }

                self.invalidate_cache().await;
                OperationOutcome::completed(WriteMode::Remote, "trip deleted")
            }
            Err(err) => {
                tracing::error!(%id, "failed to delete trip: {err}");
                connectivity.set(Connectivity::Offline);

                OperationOutcome::failed(format!("failed to delete trip: {err}"))
            }
        }
    }

    pub(crate) async fn reconcile(&mut self, connectivity: &ConnectivityFlag) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        if !connectivity.is_online() {
            tracing::debug!("offline, skipping reconcile");
            return report;
        }

        let pending: Vec<Trip> = self
            .local
            .pending_records()
            .await
            .into_iter()
            .filter(|trip| !trip.synced)
            .collect();

        if pending.is_empty() {
            return report;
        }

        tracing::info!(count = pending.len(), "replaying queued trips");

        for trip in pending {
            match self.remote.create(&trip).await {
                Ok(created) => {
                    report.confirmed += 1;
                    tracing::debug!(local_id = %trip.id, remote_id = %created.id, "queued trip confirmed");

                    // The remote already holds the record, a failure here means it will be
                    // submitted again on the next pass
                    if let Err(err) = self.local.mark_synced(&trip.id).await {
                        tracing::error!(local_id = %trip.id, "failed to mark trip as synced: {err}");
                    }
                }
                Err(err) => {
                    report.failed += 1;
                    tracing::warn!(local_id = %trip.id, "failed to replay queued trip: {err}");
                    connectivity.set(Connectivity::Offline);
                }
            }
        }

        if report.confirmed > 0 {
            self.invalidate_cache().await;
        }

        tracing::info!(
            confirmed = report.confirmed,
            failed = report.failed,
            "reconcile finished"
        );

        report
    }

    pub(crate) async fn probe(&mut self, connectivity: &ConnectivityFlag) -> Connectivity {
        let state = Connectivity::from(self.remote.ping().await);
        connectivity.set(state);
        state
    }

    async fn find_unsynced(&self, id: &str) -> Option<Trip> {
        self.local
            .pending_records()
            .await
            .into_iter()
            .find(|trip| trip.id == id && !trip.synced)
    }

    async fn invalidate_cache(&self) {
        if let Err(err) = self.local.invalidate_cache().await {
            tracing::warn!("failed to invalidate trip cache: {err}");
        }
    }
}
