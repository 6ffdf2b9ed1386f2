use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::stores::traits::{KeyValueStore, StoreError};
use crate::trip::Trip;
use crate::utils::current_time_ms;

/// Key of the cached copy of the last full listing.
pub const CACHE_KEY: &str = "trips_cache";

/// Key of the queue of locally created trips awaiting remote confirmation.
pub const PENDING_KEY: &str = "trips_pending";

#[derive(Debug, Serialize, Deserialize)]
struct CacheBlob {
    data: Vec<Trip>,

    /// Unix milliseconds of the write.
    timestamp: i64,

    /// Lifetime in milliseconds, recorded with the entry so a changed TTL only affects new writes.
    expiry: i64,
}

impl CacheBlob {
    fn is_fresh_at(&self, now_ms: i64) -> bool {
        now_ms.saturating_sub(self.timestamp) < self.expiry
    }
}

/// The two logical tables kept on the device: a time limited cache of the last listing and the
/// pending queue of trips written while offline. Both are stored as JSON documents in a
/// [`KeyValueStore`].
///
/// Reads are forgiving. Absent or malformed documents are logged and treated as empty, local
/// persistence problems never stop the caller from making progress.
pub struct LocalStore<KV: KeyValueStore> {
    kv: KV,
    cache_ttl: Duration,
}

impl<KV: KeyValueStore> LocalStore<KV> {
    pub fn new(kv: KV, cache_ttl: Duration) -> Self {
        Self { kv, cache_ttl }
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    /// All queued trips, synced or not, most recently queued first.
    pub async fn pending_records(&self) -> Vec<Trip> {
        match self.load_pending().await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!("failed to read pending queue, treating it as empty: {err}");
                Vec::new()
            }
        }
    }

    /// Places a trip at the front of the queue. The caller is responsible for handing in a fresh
    /// identifier, no deduplication happens here.
    pub async fn enqueue_pending(&self, trip: Trip) -> Result<(), StoreError> {
        let mut records = self.load_pending_for_update().await?;
        records.insert(0, trip);
        self.save_pending(&records).await
    }

    /// Flags the queued trip as confirmed by the remote store. Returns whether a matching record
    /// was found, an unknown id leaves the queue untouched.
    pub async fn mark_synced(&self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.load_pending_for_update().await?;

        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };

        record.synced = true;
        self.save_pending(&records).await?;

        Ok(true)
    }

    pub async fn remove_pending(&self, id: &str) -> Result<Option<Trip>, StoreError> {
        let mut records = self.load_pending_for_update().await?;

        let Some(idx) = records.iter().position(|r| r.id == id) else {
            return Ok(None);
        };

        let removed = records.remove(idx);
        self.save_pending(&records).await?;

        Ok(Some(removed))
    }

    /// Drops every queue entry that has already been confirmed remotely, returning how many were
    /// removed.
    pub async fn prune_synced(&self) -> Result<usize, StoreError> {
        let records = self.load_pending_for_update().await?;
        let before = records.len();

        let remaining: Vec<Trip> = records.into_iter().filter(|r| !r.synced).collect();
        let pruned = before - remaining.len();

        if pruned > 0 {
            self.save_pending(&remaining).await?;
        }

        Ok(pruned)
    }

    /// The cached listing, if one was written less than its lifetime ago. Expired entries are
    /// ignored but left in place.
    pub async fn read_cache(&self) -> Option<Vec<Trip>> {
        self.read_cache_at(current_time_ms()).await
    }

    pub(crate) async fn read_cache_at(&self, now_ms: i64) -> Option<Vec<Trip>> {
        let raw = match self.kv.get(CACHE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!("failed to read trip cache: {err}");
                return None;
            }
        };

        let blob: CacheBlob = match serde_json::from_str(&raw) {
            Ok(blob) => blob,
            Err(err) => {
                tracing::warn!("ignoring malformed trip cache: {err}");
                return None;
            }
        };

        if !blob.is_fresh_at(now_ms) {
            tracing::debug!(cached_at = blob.timestamp, "trip cache expired");
            return None;
        }

        Some(blob.data)
    }

    pub async fn write_cache(&self, trips: &[Trip]) -> Result<(), StoreError> {
        self.write_cache_at(trips, current_time_ms()).await
    }

    pub(crate) async fn write_cache_at(&self, trips: &[Trip], now_ms: i64) -> Result<(), StoreError> {
        let blob = CacheBlob {
            data: trips.to_vec(),
            timestamp: now_ms,
            expiry: self.cache_ttl.as_millis().min(i64::MAX as u128) as i64,
        };

        self.kv.set(CACHE_KEY, serde_json::to_string(&blob)?).await
    }

    /// Discards the cached listing so the next read has to go back to the remote store.
    pub async fn invalidate_cache(&self) -> Result<(), StoreError> {
        self.kv.remove(CACHE_KEY).await
    }

    async fn load_pending(&self) -> Result<Vec<Trip>, StoreError> {
        let Some(raw) = self.kv.get(PENDING_KEY).await? else {
            return Ok(Vec::new());
        };

        let entries: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
        let mut records = Vec::with_capacity(entries.len());

        // A single damaged entry shouldn't cost the rest of the queue
        for entry in entries {
            match serde_json::from_value::<Trip>(entry) {
                Ok(trip) if !trip.id.is_empty() => records.push(trip),
                Ok(_) => tracing::warn!("dropping queued trip without an identifier"),
                Err(err) => tracing::warn!("dropping malformed queued trip: {err}"),
            }
        }

        Ok(records)
    }

    /// The queue as the base for a rewrite. A damaged document is replaced, but a failed read
    /// aborts the write so the stored queue is never overwritten from a partial view.
    async fn load_pending_for_update(&self) -> Result<Vec<Trip>, StoreError> {
        match self.load_pending().await {
            Ok(records) => Ok(records),
            Err(StoreError::Malformed(err)) => {
                tracing::warn!("replacing malformed pending queue: {err}");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    async fn save_pending(&self, records: &[Trip]) -> Result<(), StoreError> {
        self.kv
            .set(PENDING_KEY, serde_json::to_string(records)?)
            .await
    }
}
