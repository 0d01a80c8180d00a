use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::recommendation::RecommendationItem;
use crate::recommendations::roadmap::Roadmap;
use crate::session::{AnalysisView, Completion, ItemSource};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResponse {
    pub role_title: String,
    pub items: Vec<RecommendationItem>,
    pub explanation: String,
    pub roadmap: Roadmap,
    pub source: ItemSource,
}

impl From<AnalysisView> for RecommendationsResponse {
    fn from(view: AnalysisView) -> Self {
        Self {
            role_title: view.role_title,
            items: view.items,
            explanation: view.explanation,
            roadmap: view.roadmap,
            source: view.source,
        }
    }
}

#[derive(Deserialize)]
pub struct CompleteRequest {
    pub title: String,
}

/// GET /api/v1/recommendations
pub async fn handle_get_recommendations(
    State(state): State<AppState>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    Ok(Json(state.session.view().await?.into()))
}

/// POST /api/v1/recommendations/complete
/// Raises the related skill, prunes the item and blocklists its title.
pub async fn handle_complete(
    State(state): State<AppState>,
    Json(req): Json<CompleteRequest>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    match state.session.complete(title).await {
        Completion::Done(view) => Ok(Json(view.into())),
        Completion::NotFound => Err(AppError::NotFound(format!(
            "'{title}' is not on the current roadmap"
        ))),
        Completion::Failed => Err(AppError::CompletionFailed(title.to_string())),
        Completion::UserChanged => Err(AppError::UserChanged),
    }
}
