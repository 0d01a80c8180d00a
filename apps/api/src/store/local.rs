//! Guest profile storage on the local key-value store.
//!
//! The goal lives under `userGoal`, everything else under `userProfile`.
//! There is a single local partition: the uid argument is only logged.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use crate::models::profile::{Goal, ProfilePatch, UserProfile};
use crate::store::kv::KeyValueStore;
use crate::store::{ProfileStore, ProfileSubscription, Snapshot, StoreError, SUBSCRIPTION_BUFFER};

pub const GOAL_KEY: &str = "userGoal";
pub const PROFILE_KEY: &str = "userProfile";

pub struct LocalProfileStore {
    kv: Arc<dyn KeyValueStore>,
    changes: broadcast::Sender<()>,
}

impl LocalProfileStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        let (changes, _) = broadcast::channel(SUBSCRIPTION_BUFFER);
        Self { kv, changes }
    }
}

/// Stored profile fields as a JSON object. A corrupt entry reads as empty
/// and is overwritten by the next write.
async fn stored_fields(kv: &dyn KeyValueStore) -> Result<Option<Map<String, Value>>, StoreError> {
    let Some(raw) = kv.get(PROFILE_KEY).await? else {
        return Ok(None);
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        Ok(_) | Err(_) => {
            warn!("Local profile entry is corrupt, treating it as empty");
            Ok(Some(Map::new()))
        }
    }
}

async fn load(kv: &dyn KeyValueStore) -> Result<Option<UserProfile>, StoreError> {
    let fields = stored_fields(kv).await?;
    let goal = kv.get(GOAL_KEY).await?;
    if fields.is_none() && goal.is_none() {
        return Ok(None);
    }

    let mut doc: UserProfile = match fields {
        Some(map) => serde_json::from_value(Value::Object(map)).unwrap_or_else(|e| {
            warn!("Local profile does not match the profile shape ({e}), ignoring it");
            UserProfile::default()
        }),
        None => UserProfile::default(),
    };
    if let Some(raw) = goal {
        doc.goal = serde_json::from_str::<Option<Goal>>(&raw).unwrap_or_else(|e| {
            warn!("Local goal entry is corrupt ({e}), ignoring it");
            None
        });
    }
    Ok(Some(doc))
}

#[async_trait]
impl ProfileStore for LocalProfileStore {
    async fn get(&self, uid: &str) -> Result<Option<UserProfile>, StoreError> {
        debug!("Loading local profile (uid={uid})");
        load(self.kv.as_ref()).await
    }

    async fn set_or_merge(&self, uid: &str, patch: ProfilePatch) -> Result<(), StoreError> {
        let mut fields = patch.as_object().unwrap_or_default();
        let mut batch = Vec::with_capacity(2);

        if let Some(goal) = fields.remove("goal") {
            batch.push((GOAL_KEY.to_string(), goal.to_string()));
        }

        if !fields.is_empty() {
            let mut stored = stored_fields(self.kv.as_ref()).await?.unwrap_or_default();
            stored.extend(fields);
            batch.push((PROFILE_KEY.to_string(), Value::Object(stored).to_string()));
        }

        if batch.is_empty() {
            return Ok(());
        }
        // goal and fields land together or not at all
        self.kv.set_many(batch).await?;

        debug!("Local profile written (uid={uid})");
        // No receivers is fine.
        let _ = self.changes.send(());
        Ok(())
    }

    async fn subscribe(&self, uid: &str) -> Result<ProfileSubscription, StoreError> {
        let mut changes = self.changes.subscribe();
        let initial = load(self.kv.as_ref()).await?;
        let kv = Arc::clone(&self.kv);
        let (tx, rx) = mpsc::channel::<Snapshot>(SUBSCRIPTION_BUFFER);
        debug!("Local profile subscription opened (uid={uid})");

        let feeder = tokio::spawn(async move {
            if tx.send(initial).await.is_err() {
                return;
            }
            loop {
                match changes.recv().await {
                    Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                    Err(broadcast::error::RecvError::Closed) => break,
                }
                match load(kv.as_ref()).await {
                    Ok(snapshot) => {
                        if tx.send(snapshot).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Local profile reload failed: {e}"),
                }
            }
        });

        Ok(ProfileSubscription::new(rx, feeder))
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}
