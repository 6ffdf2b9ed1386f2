use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{trips, ApiClient, ApiError};
use crate::trip::Trip;

/// The remote operations the coordinator depends on. [`ApiClient`] is the production
/// implementation, the trait exists so the coordinator can be driven against other backends.
#[async_trait]
pub trait TripRemote: Send + Sync {
    async fn create(&self, trip: &Trip) -> Result<Trip, ApiError>;

    async fn update(&self, id: &str, trip: &Trip) -> Result<Trip, ApiError>;

    async fn delete(&self, id: &str) -> Result<(), ApiError>;

    async fn list_all(&self) -> Result<Vec<Trip>, ApiError>;

    /// Must not fail, an unreachable remote answers `false`.
    async fn ping(&self) -> bool;
}

#[async_trait]
impl TripRemote for ApiClient {
    async fn create(&self, trip: &Trip) -> Result<Trip, ApiError> {
        trips::create(self, trip).await
    }

    async fn update(&self, id: &str, trip: &Trip) -> Result<Trip, ApiError> {
        trips::update(self, id, trip).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        trips::delete(self, id).await
    }

    async fn list_all(&self) -> Result<Vec<Trip>, ApiError> {
        trips::list_all(self).await
    }

    async fn ping(&self) -> bool {
        trips::ping(self).await
    }
}

#[async_trait]
impl<T: TripRemote + ?Sized> TripRemote for Arc<T> {
    async fn create(&self, trip: &Trip) -> Result<Trip, ApiError> {
        (**self).create(trip).await
    }

    async fn update(&self, id: &str, trip: &Trip) -> Result<Trip, ApiError> {
        (**self).update(id, trip).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        (**self).delete(id).await
    }

    async fn list_all(&self) -> Result<Vec<Trip>, ApiError> {
        (**self).list_all().await
    }

    async fn ping(&self) -> bool {
        (**self).ping().await
    }
}
