mod assessment;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod recommendations;
mod routes;
mod session;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assessment::catalog::RoleCatalog;
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::LlmClient;
use crate::recommendations::cache::{BlocklistStore, RecommendationCache};
use crate::recommendations::generator::{LlmRecommender, RecommendationGenerator, RecommendationSource};
use crate::routes::build_router;
use crate::session::{Pipeline, Session};
use crate::state::AppState;
use crate::store::kv::{FileKeyValueStore, KeyValueStore};
use crate::store::local::LocalProfileStore;
use crate::store::remote::RemoteProfileStore;
use crate::store::ProfileStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MedSkill API v{}", env!("CARGO_PKG_VERSION"));

    // Local key-value store: guest profile, recommendation cache, blocklist
    let kv: Arc<dyn KeyValueStore> =
        Arc::new(FileKeyValueStore::open(&config.local_store_path).await?);
    let local: Arc<dyn ProfileStore> = Arc::new(LocalProfileStore::new(Arc::clone(&kv)));

    // Remote document store for signed-in users
    let remote: Option<Arc<dyn ProfileStore>> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Some(Arc::new(RemoteProfileStore::new(pool)))
        }
        None => {
            warn!("DATABASE_URL not set; signed-in users will use the local store");
            None
        }
    };

    // External recommendation strategy
    let external: Option<Arc<dyn RecommendationSource>> = match &config.recommender {
        Some(llm_config) => {
            let llm = LlmClient::new(llm_config.clone())?;
            info!("External recommendations enabled (model: {})", llm.model());
            Some(Arc::new(LlmRecommender::new(llm)))
        }
        None => {
            info!("RECOMMENDER_API_KEY not set; using local recommendations only");
            None
        }
    };

    let catalog = Arc::new(RoleCatalog::builtin());
    let pipeline = Pipeline::new(
        Arc::clone(&catalog),
        RecommendationGenerator::new(external),
        RecommendationCache::new(Arc::clone(&kv)),
        BlocklistStore::new(Arc::clone(&kv)),
    );
    let session = Arc::new(Session::new(local, remote, pipeline));
    session.switch_user(None).await?;

    let state = AppState {
        session,
        catalog,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.bind_addr, config.port).parse()?;
    if !addr.ip().is_loopback() {
        warn!("Binding to non-loopback address {addr}; profile data is served without authentication");
    }
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
