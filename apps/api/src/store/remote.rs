//! Remote document store on Postgres: one JSONB document per user.
//!
//! Writes are a top-level JSONB merge followed by `pg_notify` on
//! `CHANGE_CHANNEL` with the uid as payload; subscribers re-read their
//! document when a matching notification arrives.

use async_trait::async_trait;
use sqlx::postgres::PgListener;
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::models::profile::{ProfilePatch, UserProfile};
use crate::store::{ProfileStore, ProfileSubscription, Snapshot, StoreError, SUBSCRIPTION_BUFFER};

pub const CHANGE_CHANNEL: &str = "user_documents_changed";

#[derive(Clone)]
pub struct RemoteProfileStore {
    pool: PgPool,
}

impl RemoteProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn fetch(pool: &PgPool, uid: &str) -> Result<Option<UserProfile>, StoreError> {
    let doc: Option<Json<UserProfile>> =
        sqlx::query_scalar("SELECT data FROM user_documents WHERE uid = $1")
            .bind(uid)
            .fetch_optional(pool)
            .await?;
    Ok(doc.map(|Json(profile)| profile))
}

#[async_trait]
impl ProfileStore for RemoteProfileStore {
    async fn get(&self, uid: &str) -> Result<Option<UserProfile>, StoreError> {
        fetch(&self.pool, uid).await
    }

    async fn set_or_merge(&self, uid: &str, patch: ProfilePatch) -> Result<(), StoreError> {
        let fields = serde_json::Value::Object(patch.as_object().unwrap_or_default());

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO user_documents (uid, data, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (uid) DO UPDATE
                SET data = user_documents.data || EXCLUDED.data,
                    updated_at = now()
            "#,
        )
        .bind(uid)
        .bind(Json(&fields))
        .execute(&mut *tx)
        .await?;

        // Delivered on commit.
        sqlx::query("SELECT pg_notify($1, $2)")
            .bind(CHANGE_CHANNEL)
            .bind(uid)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!("Merged document for user {uid}");
        Ok(())
    }

    async fn subscribe(&self, uid: &str) -> Result<ProfileSubscription, StoreError> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(CHANGE_CHANNEL).await?;
        let initial = fetch(&self.pool, uid).await?;
        info!("Subscribed to document changes for user {uid}");

        let pool = self.pool.clone();
        let uid = uid.to_string();
        let (tx, rx) = mpsc::channel::<Snapshot>(SUBSCRIPTION_BUFFER);

        let feeder = tokio::spawn(async move {
            if tx.send(initial).await.is_err() {
                return;
            }
            loop {
                let notification = match listener.recv().await {
                    Ok(n) => n,
                    Err(e) => {
                        warn!("Document listener for user {uid} failed: {e}");
                        break;
                    }
                };
                if notification.payload() != uid {
                    continue;
                }
                match fetch(&pool, &uid).await {
                    Ok(snapshot) => {
                        if tx.send(snapshot).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Reloading document for user {uid} failed: {e}"),
                }
            }
        });

        Ok(ProfileSubscription::new(rx, feeder))
    }

    fn backend(&self) -> &'static str {
        "remote"
    }
}
