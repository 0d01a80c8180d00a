//! Per-user recommendation cache and the permanent completion blocklist,
//! both kept in the local key-value store.
//!
//! There is one cache slot per user, tagged with the gap signature it was
//! built for. A slot whose signature no longer matches is simply overwritten
//! by the next generation.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::recommendation::RecommendationItem;
use crate::store::kv::KeyValueStore;
use crate::store::StoreError;

/// Bump when `CacheEntry` changes shape so old payloads are never parsed.
pub const CACHE_VERSION: u32 = 4;

pub const BLOCKLIST_KEY: &str = "completed_recommendations_blocklist";

const GUEST_PARTITION: &str = "guest";

pub fn cache_key(uid: Option<&str>) -> String {
    format!("rec_cache_v{CACHE_VERSION}_{}", uid.unwrap_or(GUEST_PARTITION))
}

#[derive(Serialize)]
struct SignatureParts<'a> {
    goal: &'a str,
    weak: Vec<&'a str>,
    missing: Vec<&'a str>,
}

/// Deterministic fingerprint of the gap state. Order of the input lists does
/// not matter.
pub fn signature(role: &str, weak: &[String], missing: &[String]) -> String {
    let mut weak: Vec<&str> = weak.iter().map(String::as_str).collect();
    let mut missing: Vec<&str> = missing.iter().map(String::as_str).collect();
    weak.sort_unstable();
    missing.sort_unstable();
    let parts = SignatureParts {
        goal: role,
        weak,
        missing,
    };
    // Serializing a struct of strings cannot fail.
    serde_json::to_string(&parts).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub signature: String,
    #[serde(rename = "data")]
    pub items: Vec<RecommendationItem>,
    #[serde(rename = "aiText", default)]
    pub explanation: String,
}

#[derive(Clone)]
pub struct RecommendationCache {
    kv: Arc<dyn KeyValueStore>,
}

impl RecommendationCache {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Reads the slot under `key`. A corrupt payload counts as a miss and is
    /// discarded.
    pub async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let Some(raw) = self.kv.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                warn!("Discarding corrupt recommendation cache {key}: {e}");
                self.kv.remove(key).await?;
                Ok(None)
            }
        }
    }

    /// The slot's entry, only if it was built for `signature`.
    pub async fn lookup(&self, key: &str, signature: &str) -> Result<Option<CacheEntry>, StoreError> {
        Ok(self
            .get(key)
            .await?
            .filter(|entry| entry.signature == signature))
    }

    pub async fn put(&self, key: &str, entry: &CacheEntry) -> Result<(), StoreError> {
        let raw = serde_json::to_string(entry)?;
        self.kv.set(key, raw).await?;
        debug!("Cached {} recommendations under {key}", entry.items.len());
        Ok(())
    }

    /// Drops items titled `title` from the slot. The signature is untouched.
    pub async fn remove_item(&self, key: &str, title: &str) -> Result<(), StoreError> {
        let Some(mut entry) = self.get(key).await? else {
            return Ok(());
        };
        let before = entry.items.len();
        entry.items.retain(|item| item.title != title);
        if entry.items.len() != before {
            self.put(key, &entry).await?;
        }
        Ok(())
    }
}

/// Titles the user has completed. Matched exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blocklist(HashSet<String>);

impl Blocklist {
    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(titles.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, title: &str) -> bool {
        self.0.contains(title)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Persists the blocklist as a JSON array of titles, insertion ordered.
#[derive(Clone)]
pub struct BlocklistStore {
    kv: Arc<dyn KeyValueStore>,
}

impl BlocklistStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    async fn titles(&self) -> Result<Vec<String>, StoreError> {
        let Some(raw) = self.kv.get(BLOCKLIST_KEY).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(titles) => Ok(titles),
            Err(e) => {
                warn!("Completion blocklist is corrupt, starting empty: {e}");
                Ok(Vec::new())
            }
        }
    }

    pub async fn load(&self) -> Result<Blocklist, StoreError> {
        Ok(Blocklist::from_titles(self.titles().await?))
    }

    /// Adds `title` unless already present.
    pub async fn append(&self, title: &str) -> Result<(), StoreError> {
        let mut titles = self.titles().await?;
        if titles.iter().any(|t| t == title) {
            return Ok(());
        }
        titles.push(title.to_string());
        self.kv.set(BLOCKLIST_KEY, serde_json::to_string(&titles)?).await
    }
}
