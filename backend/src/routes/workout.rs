//! Workout session API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::nutrition::parse_id;
use crate::services::WorkoutService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use top_tier_shared::types::{
    LimitQuery, SessionProgressRequest, StartSessionRequest, WorkoutSessionResponse,
    WorkoutStatsResponse,
};

/// Create workout session routes
pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(start_session).get(list_sessions))
        .route("/stats", get(get_stats))
        .route("/:id", get(get_session))
        .route("/:id/progress", put(save_progress))
        .route("/:id/complete", post(complete_session))
}

/// POST /api/v1/workout-sessions - Start a session from a plan
async fn start_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<WorkoutSessionResponse>), ApiError> {
    let session = WorkoutService::start(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/v1/workout-sessions - Own sessions, newest first
async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<WorkoutSessionResponse>>, ApiError> {
    Ok(Json(WorkoutService::list(state.db(), auth.user_id, query.limit).await?))
}

/// GET /api/v1/workout-sessions/stats - Totals and weekly streak
async fn get_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<WorkoutStatsResponse>, ApiError> {
    Ok(Json(WorkoutService::stats(state.db(), auth.user_id).await?))
}

/// GET /api/v1/workout-sessions/:id - Get a session
async fn get_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<WorkoutSessionResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    Ok(Json(WorkoutService::get(state.db(), auth.user_id, id).await?))
}

/// PUT /api/v1/workout-sessions/:id/progress - Store the client's snapshot
async fn save_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<SessionProgressRequest>,
) -> Result<Json<WorkoutSessionResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    let session = WorkoutService::save_progress(state.db(), auth.user_id, id, req.snapshot).await?;
    Ok(Json(session))
}

/// POST /api/v1/workout-sessions/:id/complete - Finish a session
async fn complete_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<SessionProgressRequest>,
) -> Result<Json<WorkoutSessionResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    let session = WorkoutService::complete(state.db(), auth.user_id, id, req.snapshot).await?;
    Ok(Json(session))
}
