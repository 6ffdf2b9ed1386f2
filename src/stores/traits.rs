use async_trait::async_trait;

/// Durable key-value persistence for the client. This is the minimum requirement for keeping
/// trips available on a device while the remote store can't be reached. Values are opaque strings
/// (the local store writes JSON documents into them) addressed by a small fixed set of keys.
///
/// Implementations are expected to make a completed `set` visible to every following `get`, a
/// write that was only buffered must not be acknowledged.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value for the key if there is one. A missing key is not an error.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value stored under the key.
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Drop the key and its value. Removing a key that doesn't exist succeeds.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key).await
    }
}

/// Failures raised by the local persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An error that couldn't be represented by one of the standard error types, representing some
    /// kind of error specific to the underlying implementation.
    #[error("implementation specific error: {0}")]
    Implementation(String),

    /// The underlying storage medium rejected the read or write.
    #[error("local storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document couldn't be decoded, or a record couldn't be encoded for storage.
    #[error("stored data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The provided key can't be represented by the backend.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}
