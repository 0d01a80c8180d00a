use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::profile::{Goal, ProfilePatch, UserProfile};
use crate::session::{AnalysisView, SessionInfo};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SwitchUserRequest {
    pub uid: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    #[serde(flatten)]
    pub session: SessionInfo,
    pub remote_store_enabled: bool,
    pub external_recommendations_enabled: bool,
}

fn session_response(state: &AppState, session: SessionInfo) -> SessionResponse {
    SessionResponse {
        session,
        remote_store_enabled: state.config.database_url.is_some(),
        external_recommendations_enabled: state.config.recommender.is_some(),
    }
}

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let info = state.session.current_user().await;
    Json(session_response(&state, info))
}

/// PUT /api/v1/session
/// Identity change from the sign-in flow. A missing or blank uid means guest.
pub async fn handle_switch_session(
    State(state): State<AppState>,
    Json(req): Json<SwitchUserRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let info = state.session.switch_user(req.uid).await?;
    Ok(Json(session_response(&state, info)))
}

/// DELETE /api/v1/session
pub async fn handle_end_session(
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, AppError> {
    let info = state.session.switch_user(None).await?;
    Ok(Json(session_response(&state, info)))
}

/// PUT /api/v1/goal
pub async fn handle_save_goal(
    State(state): State<AppState>,
    Json(goal): Json<Goal>,
) -> Result<Json<AnalysisView>, AppError> {
    if goal.domain.is_none() && goal.specialization.is_none() {
        return Err(AppError::Validation(
            "goal needs a domain or a specialization".to_string(),
        ));
    }
    Ok(Json(state.session.save_goal(goal).await?))
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, AppError> {
    state
        .session
        .profile()
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No profile has been saved yet".to_string()))
}

/// PUT /api/v1/profile
/// Merges the given top-level fields; absent fields are left alone.
pub async fn handle_save_profile(
    State(state): State<AppState>,
    Json(mut patch): Json<ProfilePatch>,
) -> Result<Json<UserProfile>, AppError> {
    if patch.is_empty() {
        return Err(AppError::Validation("profile update is empty".to_string()));
    }
    if let Some(skills) = &patch.skills {
        if skills.iter().any(|s| s.name.trim().is_empty()) {
            return Err(AppError::Validation("skill names must not be blank".to_string()));
        }
    }
    patch.updated_at = Some(chrono::Utc::now());

    state.session.save_profile(patch).await?;
    state
        .session
        .profile()
        .await?
        .map(Json)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("profile missing right after save")))
}
