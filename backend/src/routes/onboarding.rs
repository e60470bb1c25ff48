//! Onboarding wizard API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::OnboardingService;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use top_tier_shared::types::OnboardingResponse;

/// Create onboarding routes
pub fn onboarding_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_status))
        .route("/advance", post(advance))
        .route("/complete", post(complete))
}

/// GET /api/v1/onboarding - Current step and visible dashboard sections
async fn get_status(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<OnboardingResponse>, ApiError> {
    Ok(Json(OnboardingService::get(state.db(), auth.user_id).await?))
}

/// POST /api/v1/onboarding/advance - Move to the next step
async fn advance(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<OnboardingResponse>, ApiError> {
    Ok(Json(OnboardingService::advance(state.db(), auth.user_id).await?))
}

/// POST /api/v1/onboarding/complete - Finish onboarding
async fn complete(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<OnboardingResponse>, ApiError> {
    Ok(Json(OnboardingService::complete(state.db(), auth.user_id).await?))
}
