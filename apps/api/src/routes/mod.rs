pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::assessment::handlers as assessment;
use crate::recommendations::handlers as recommendations;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Identity and profile
        .route(
            "/api/v1/session",
            get(session::handle_get_session)
                .put(session::handle_switch_session)
                .delete(session::handle_end_session),
        )
        .route("/api/v1/goal", put(session::handle_save_goal))
        .route(
            "/api/v1/profile",
            get(session::handle_get_profile).put(session::handle_save_profile),
        )
        // Assessment screens
        .route("/api/v1/catalog", get(assessment::handle_get_catalog))
        .route("/api/v1/assessment", get(assessment::handle_get_assessment))
        .route("/api/v1/dashboard", get(assessment::handle_get_dashboard))
        // Roadmap
        .route(
            "/api/v1/recommendations",
            get(recommendations::handle_get_recommendations),
        )
        .route(
            "/api/v1/recommendations/complete",
            post(recommendations::handle_complete),
        )
        .with_state(state)
}
