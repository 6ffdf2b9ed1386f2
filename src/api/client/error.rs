/// Failures while constructing an [`ApiClient`](crate::api::ApiClient).
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("base URL {0} can't have a collection path appended")]
    UnsupportedBaseUrl(String),

    #[error("underlying HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Failures of individual calls against the remote collection.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("API returned {status_code} response with message: {message}")]
    Message { status_code: u16, message: String },

    #[error("request couldn't be completed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("remote row is unusable: {0}")]
    InvalidRow(String),

    #[error("API accepted the write but returned no representation of the record")]
    MissingRepresentation,

    #[error("no remote record with id {0}")]
    NotFound(String),
}

impl ApiError {
    /// The HTTP status returned by the remote, when the failure got that far.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Message { status_code, .. } => Some(*status_code),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
