use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use directories::ProjectDirs;

use crate::stores::traits::{KeyValueStore, StoreError};

/// Persists each key as its own file inside a data directory. Writes go to a temporary sibling
/// first and are renamed into place so a crash never leaves a half written document behind.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    data_dir: PathBuf,
}

impl FileKeyValueStore {
    /// Uses the platform's per-user data directory for the application.
    pub async fn platform_default() -> Result<Self, StoreError> {
        let proj_dirs = ProjectDirs::from("log", "Triplog", "triplog").ok_or_else(|| {
            StoreError::Implementation("no home directory available for local data".to_string())
        })?;

        Self::open(proj_dirs.data_dir()).await
    }

    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref().to_owned();
        tokio::fs::create_dir_all(&data_dir).await?;

        tracing::debug!(data_dir = %data_dir.display(), "opened file backed key-value store");

        Ok(Self { data_dir })
    }

    fn key_to_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }

        Ok(self.data_dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.key_to_path(key)?;

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let path = self.key_to_path(key)?;
        let staging = path.with_extension("json.tmp");

        tokio::fs::write(&staging, value).await?;
        tokio::fs::rename(&staging, &path).await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.key_to_path(key)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let store = FileKeyValueStore::open(dir.path()).await.unwrap();
        store.set("trips_pending", "[]".to_string()).await.unwrap();
        drop(store);

        let reopened = FileKeyValueStore::open(dir.path()).await.unwrap();
        assert_eq!(
            reopened.get("trips_pending").await.unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_missing_key_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path().join("nested")).await.unwrap();

        assert_eq!(store.get("trips_cache").await.unwrap(), None);
        store.remove("trips_cache").await.unwrap();

        store.set("trips_cache", "{}".to_string()).await.unwrap();
        store.remove("trips_cache").await.unwrap();
        assert_eq!(store.get("trips_cache").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path()).await.unwrap();

        let result = store.set("../escape", "x".to_string()).await;
        assert!(matches!(result, Err(StoreError::InvalidKey(_))));
    }
}
