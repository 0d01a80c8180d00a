//! Local key-value string storage. Backs the guest profile, the
//! recommendation cache and the completion blocklist.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::store::StoreError;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    /// Writes every entry or none of them.
    async fn set_many(&self, batch: Vec<(String, String)>) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// JSON-file-backed store. The whole map is held in memory and rewritten
/// (temp file + rename) on every mutation.
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileKeyValueStore {
    /// Opens the store, creating an empty one if the file does not exist.
    /// An unreadable or corrupt file is set aside and replaced by an empty map.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    let backup = path.with_extension("corrupt");
                    warn!(
                        "Local store {} is corrupt ({e}); moving it to {}",
                        path.display(),
                        backup.display()
                    );
                    tokio::fs::rename(&path, &backup).await?;
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        info!("Local store opened at {} ({} keys)", path.display(), entries.len());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    async fn flush(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(entries)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.set_many(vec![(key.to_string(), value)]).await
    }

    async fn set_many(&self, batch: Vec<(String, String)>) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        let mut previous = Vec::with_capacity(batch.len());
        for (key, value) in batch {
            let old = entries.insert(key.clone(), value);
            previous.push((key, old));
        }
        if let Err(e) = self.flush(&entries).await {
            // keep memory and disk in step
            for (key, old) in previous.into_iter().rev() {
                match old {
                    Some(v) => entries.insert(key, v),
                    None => entries.remove(&key),
                };
            }
            return Err(e);
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        if let Some(previous) = entries.remove(key) {
            if let Err(e) = self.flush(&entries).await {
                entries.insert(key.to_string(), previous);
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Non-persistent store for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn set_many(&self, batch: Vec<(String, String)>) -> Result<(), StoreError> {
        self.entries.lock().await.extend(batch);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}
