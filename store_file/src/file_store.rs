//! A [`DraftStore`] backed by one JSON object file.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use veriflow_store::{DraftStore, StoreError};

/// Key/value store persisted as a single JSON object on disk.
///
/// Writes go through a temp file + rename so a crash mid-write never
/// leaves a half-written store behind. An internal mutex serializes
/// read-modify-write cycles.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StoreError::Backend(e.to_string())),
        };
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Corruption(e.to_string()))
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(entries)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

impl DraftStore for FileStore {
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>, StoreError>> {
        let key = key.to_string();
        async move {
            let _guard = self.lock.lock().await;
            Ok(self.read_all().await?.remove(&key))
        }
        .boxed()
    }

    fn put<'a>(&'a self, key: &'a str, value: &'a str) -> BoxFuture<'a, Result<(), StoreError>> {
        async move {
            let _guard = self.lock.lock().await;
            let mut entries = self.read_all().await?;
            entries.insert(key.to_string(), value.to_string());
            self.write_all(&entries).await
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("drafts.json"));

        store.put("current_step", "2").await.unwrap();
        assert_eq!(
            store.get("current_step").await.unwrap(),
            Some("2".to_string())
        );
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drafts.json");

        {
            let store = FileStore::new(&path);
            store.put("verification_data", r#"{"a":"1"}"#).await.unwrap();
        }

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get("verification_data").await.unwrap(),
            Some(r#"{"a":"1"}"#.to_string())
        );
    }

    #[tokio::test]
    async fn put_replaces_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("drafts.json"));

        store.put("current_step", "0").await.unwrap();
        store.put("current_step", "3").await.unwrap();
        assert_eq!(
            store.get("current_step").await.unwrap(),
            Some("3".to_string())
        );
    }

    #[tokio::test]
    async fn corrupt_file_surfaces_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drafts.json");
        tokio::fs::write(&path, b"not json at all").await.unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.get("anything").await,
            Err(StoreError::Corruption(_))
        ));
    }
}
