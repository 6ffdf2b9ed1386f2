use crate::api::{ApiClientError, ApiError};
use crate::config::ConfigError;
use crate::stores::StoreError;
use crate::trip::ValidationError;

/// Every failure the crate can surface, for callers that want a single error type. The sync
/// coordinator itself never returns these for network problems, they only reach callers that use
/// the lower layers directly or fail during setup.
#[derive(Debug, thiserror::Error)]
pub enum TripLogError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build the API client: {0}")]
    ApiClient(#[from] ApiClientError),

    #[error("remote request failed: {0}")]
    Api(#[from] ApiError),

    #[error("local storage failed: {0}")]
    Store(#[from] StoreError),

    #[error("invalid trip: {0}")]
    Validation(#[from] ValidationError),
}

pub type TripLogResult<T> = Result<T, TripLogError>;
