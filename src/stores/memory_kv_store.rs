use std::collections::HashMap;

use async_std::sync::RwLock;
use async_trait::async_trait;

use crate::stores::traits::{KeyValueStore, StoreError};

/// Keeps every value in process memory. Nothing survives a restart, useful for tests and for
/// sessions where durability isn't wanted.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    data: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.data.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.data.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryKeyValueStore::default();
        assert_eq!(store.get("trips_cache").await.unwrap(), None);

        store.set("trips_cache", "[]".to_string()).await.unwrap();
        assert_eq!(store.get("trips_cache").await.unwrap().as_deref(), Some("[]"));

        store.set("trips_cache", "[1]".to_string()).await.unwrap();
        assert_eq!(store.get("trips_cache").await.unwrap().as_deref(), Some("[1]"));

        store.remove("trips_cache").await.unwrap();
        assert_eq!(store.get("trips_cache").await.unwrap(), None);

        // Removing again is fine
        store.remove("trips_cache").await.unwrap();
    }
}
