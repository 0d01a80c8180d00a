use std::sync::Arc;

use crate::assessment::catalog::RoleCatalog;
use crate::config::Config;
use crate::session::Session;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Session>,
    pub catalog: Arc<RoleCatalog>,
    pub config: Config,
}
