//! Brotherhood API routes - groups, events and forum

use crate::auth::{AdminUser, AuthUser};
use crate::error::ApiError;
use crate::services::nutrition::parse_id;
use crate::services::BrotherhoodService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use top_tier_shared::calendar::CalendarLinks;
use top_tier_shared::types::{
    CreateEventRequest, CreateGroupRequest, CreatePostRequest, CreateTopicRequest, EventQuery,
    EventResponse, GroupResponse, PostResponse, RsvpRequest, TopicResponse,
};

/// Forum topic filter
#[derive(Debug, Deserialize)]
struct TopicQuery {
    group_id: Option<String>,
    limit: Option<i64>,
}

/// Create brotherhood routes
pub fn brotherhood_routes() -> Router<AppState> {
    Router::new()
        .route("/groups", get(list_groups).post(create_group))
        .route("/groups/:id/join", post(join_group))
        .route("/groups/:id/leave", post(leave_group))
        .route("/events", get(list_events).post(create_event))
        .route("/events/:id", get(get_event))
        .route("/events/:id/rsvp", put(rsvp))
        .route("/events/:id/calendar.ics", get(event_ics))
        .route("/events/:id/calendar-links", get(event_links))
        .route("/forum/topics", get(list_topics).post(create_topic))
        .route("/forum/topics/:id/posts", get(list_posts).post(reply))
}

// ============================================================================
// Groups
// ============================================================================

/// GET /api/v1/brotherhood/groups - Groups with member counts
async fn list_groups(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<GroupResponse>>, ApiError> {
    Ok(Json(BrotherhoodService::list_groups(state.db(), auth.user_id).await?))
}

/// POST /api/v1/brotherhood/groups - Create a group
async fn create_group(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), ApiError> {
    let group = BrotherhoodService::create_group(state.db(), admin.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// POST /api/v1/brotherhood/groups/:id/join - Join a group
async fn join_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<GroupResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    Ok(Json(BrotherhoodService::join_group(state.db(), auth.user_id, id).await?))
}

/// POST /api/v1/brotherhood/groups/:id/leave - Leave a group
async fn leave_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<GroupResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    Ok(Json(BrotherhoodService::leave_group(state.db(), auth.user_id, id).await?))
}

// ============================================================================
// Events
// ============================================================================

/// GET /api/v1/brotherhood/events - Upcoming events
async fn list_events(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<EventQuery>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    Ok(Json(BrotherhoodService::list_events(state.db(), auth.user_id, query).await?))
}

/// POST /api/v1/brotherhood/events - Create an event
async fn create_event(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    let event = BrotherhoodService::create_event(state.db(), admin.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/v1/brotherhood/events/:id - Event with RSVP counts
async fn get_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<EventResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    Ok(Json(BrotherhoodService::get_event(state.db(), auth.user_id, id).await?))
}

/// PUT /api/v1/brotherhood/events/:id/rsvp - Answer an invitation
async fn rsvp(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<RsvpRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    let id = parse_id("id", &id)?;
    Ok(Json(BrotherhoodService::rsvp(state.db(), auth.user_id, id, req).await?))
}

/// GET /api/v1/brotherhood/events/:id/calendar.ics - iCalendar download
async fn event_ics(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id("id", &id)?;
    let (filename, ics) = BrotherhoodService::event_ics(state.db(), auth.user_id, id).await?;

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Invalid file name: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/calendar; charset=utf-8"),
    );
    headers.insert(header::CONTENT_DISPOSITION, disposition);

    Ok((headers, ics))
}

/// GET /api/v1/brotherhood/events/:id/calendar-links - Google and Outlook links
async fn event_links(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<CalendarLinks>, ApiError> {
    let id = parse_id("id", &id)?;
    Ok(Json(BrotherhoodService::event_links(state.db(), auth.user_id, id).await?))
}

// ============================================================================
// Forum
// ============================================================================

/// GET /api/v1/brotherhood/forum/topics - Topics by latest activity
async fn list_topics(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<TopicQuery>,
) -> Result<Json<Vec<TopicResponse>>, ApiError> {
    let topics =
        BrotherhoodService::list_topics(state.db(), query.group_id.as_deref(), query.limit).await?;
    Ok(Json(topics))
}

/// POST /api/v1/brotherhood/forum/topics - Open a topic
async fn create_topic(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateTopicRequest>,
) -> Result<(StatusCode, Json<TopicResponse>), ApiError> {
    let topic = BrotherhoodService::create_topic(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(topic)))
}

/// GET /api/v1/brotherhood/forum/topics/:id/posts - Replies, oldest first
async fn list_posts(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let id = parse_id("id", &id)?;
    Ok(Json(BrotherhoodService::list_posts(state.db(), id).await?))
}

/// POST /api/v1/brotherhood/forum/topics/:id/posts - Reply to a topic
async fn reply(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let id = parse_id("id", &id)?;
    let post = BrotherhoodService::reply(state.db(), auth.user_id, id, req).await?;
    Ok((StatusCode::CREATED, Json(post)))
}
