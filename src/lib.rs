pub mod api;
pub mod config;
pub mod error;
pub mod stores;
pub mod sync;
pub mod trip;
pub mod utils;
pub mod version;

// Re-export some of our dependencies for QoL
pub use async_trait;

pub mod prelude {
    pub use crate::api::{ApiClient, ApiClientError, ApiError};
    pub use crate::config::{ApiKey, ConfigError, SyncConfig};
    pub use crate::error::*;
    pub use crate::stores::{KeyValueStore, LocalStore, MemoryKeyValueStore, StoreError};
    pub use crate::sync::{
        Connectivity, OperationOutcome, ReconcileReport, SyncCoordinator, TripRemote, WriteMode,
    };
    pub use crate::trip::{Driver, SourceTag, Trip, TripId, TripInput, ValidationError};
    pub use crate::version::*;

    #[cfg(feature = "local-store")]
    pub use crate::stores::FileKeyValueStore;
}
