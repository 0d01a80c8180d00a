//! Profile storage behind one interface, with two backends: the remote
//! document store (Postgres, used when a user is signed in) and the local
//! key-value store (used for guests).

pub mod kv;
pub mod local;
pub mod remote;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::profile::{ProfilePatch, UserProfile};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A profile snapshot. `None` means the user has no document yet.
pub type Snapshot = Option<UserProfile>;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, uid: &str) -> Result<Option<UserProfile>, StoreError>;

    /// Merges present fields of `patch` into the stored document, creating it
    /// if needed.
    async fn set_or_merge(&self, uid: &str, patch: ProfilePatch) -> Result<(), StoreError>;

    /// Streams the current document, then every subsequent change.
    async fn subscribe(&self, uid: &str) -> Result<ProfileSubscription, StoreError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Live feed of profile snapshots. Dropping it tears down the feed.
pub struct ProfileSubscription {
    rx: mpsc::Receiver<Snapshot>,
    feeder: JoinHandle<()>,
}

impl ProfileSubscription {
    pub(crate) fn new(rx: mpsc::Receiver<Snapshot>, feeder: JoinHandle<()>) -> Self {
        Self { rx, feeder }
    }

    /// Next snapshot, or `None` once the feed has ended.
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.rx.recv().await
    }
}

impl Drop for ProfileSubscription {
    fn drop(&mut self) {
        self.feeder.abort();
    }
}

/// Buffered snapshots per subscription before the feeder waits.
pub(crate) const SUBSCRIPTION_BUFFER: usize = 16;
