use axum::{extract::State, Json};
use serde::Serialize;

use crate::assessment::catalog::CatalogListing;
use crate::assessment::dashboard::DashboardStats;
use crate::assessment::gap::GapResult;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    pub role_title: String,
    #[serde(flatten)]
    pub gap: GapResult,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub role_title: String,
    #[serde(flatten)]
    pub stats: DashboardStats,
}

/// GET /api/v1/catalog
pub async fn handle_get_catalog(State(state): State<AppState>) -> Json<CatalogListing> {
    Json(state.catalog.listing())
}

/// GET /api/v1/assessment
pub async fn handle_get_assessment(
    State(state): State<AppState>,
) -> Result<Json<AssessmentResponse>, AppError> {
    let view = state.session.view().await?;
    Ok(Json(AssessmentResponse {
        role_title: view.role_title,
        gap: view.gap,
    }))
}

/// GET /api/v1/dashboard
pub async fn handle_get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AppError> {
    let view = state.session.view().await?;
    Ok(Json(DashboardResponse {
        role_title: view.role_title,
        stats: view.dashboard,
    }))
}
