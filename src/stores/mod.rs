//! Local persistence: the [`KeyValueStore`] seam with its backends, and the [`LocalStore`] that
//! keeps the listing cache and the pending queue on top of one.

#[cfg(feature = "local-store")]
mod file_kv_store;
mod local_store;
mod memory_kv_store;
mod traits;

#[cfg(feature = "local-store")]
pub use file_kv_store::FileKeyValueStore;
pub use local_store::{LocalStore, CACHE_KEY, PENDING_KEY};
pub use memory_kv_store::MemoryKeyValueStore;
pub use traits::{KeyValueStore, StoreError};
