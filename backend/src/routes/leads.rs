//! Prelaunch lead API routes

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::services::LeadService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use top_tier_shared::types::{
    CreateLeadRequest, DeleteLeadQuery, DeleteLeadsResponse, LeadResponse,
};

/// Create prelaunch lead routes
pub fn lead_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(capture_lead).get(list_leads).delete(delete_leads))
        .route("/export", get(export_leads))
}

/// POST /api/v1/prelaunch-leads - Join the prelaunch list (public)
async fn capture_lead(
    State(state): State<AppState>,
    Json(req): Json<CreateLeadRequest>,
) -> Result<(StatusCode, Json<LeadResponse>), ApiError> {
    let lead = LeadService::capture(state.db(), req).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

/// GET /api/v1/prelaunch-leads - All leads, newest first
async fn list_leads(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<LeadResponse>>, ApiError> {
    Ok(Json(LeadService::list(state.db()).await?))
}

/// DELETE /api/v1/prelaunch-leads?email= - Remove leads by email
async fn delete_leads(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<DeleteLeadQuery>,
) -> Result<Json<DeleteLeadsResponse>, ApiError> {
    Ok(Json(LeadService::delete_by_email(state.db(), &query.email).await?))
}

/// GET /api/v1/prelaunch-leads/export - Download all leads as CSV
async fn export_leads(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, ApiError> {
    let csv = LeadService::export_csv(state.db()).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"prelaunch-leads.csv\""),
    );

    Ok((headers, csv))
}
