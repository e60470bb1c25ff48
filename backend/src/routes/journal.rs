//! Journal API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::nutrition::parse_id;
use crate::services::JournalService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use top_tier_shared::types::{CreateJournalEntryRequest, JournalEntryResponse, LimitQuery};

/// Create journal routes
pub fn journal_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entries).post(create_entry))
        .route("/:id", delete(delete_entry))
}

/// POST /api/v1/journal - Write an entry
async fn create_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateJournalEntryRequest>,
) -> Result<(StatusCode, Json<JournalEntryResponse>), ApiError> {
    let entry = JournalService::create(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/v1/journal - Own entries, newest first
async fn list_entries(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<JournalEntryResponse>>, ApiError> {
    Ok(Json(JournalService::list(state.db(), auth.user_id, query.limit).await?))
}

/// DELETE /api/v1/journal/:id - Delete an own entry
async fn delete_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id("id", &id)?;
    JournalService::delete(state.db(), auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
