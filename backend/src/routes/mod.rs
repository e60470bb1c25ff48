//! Route definitions for the Top Tier Men API
//!
//! Every feature lives under `/api/v1`; health and metrics stay at the
//! root for probes and scrapers.

use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod brotherhood;
mod health;
mod journal;
mod leads;
mod nutrition;
mod onboarding;
mod workout;

#[cfg(test)]
mod access_tests;

pub use brotherhood::brotherhood_routes;
pub use journal::journal_routes;
pub use leads::lead_routes;
pub use nutrition::nutrition_routes;
pub use onboarding::onboarding_routes;
pub use workout::workout_routes;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(health::metrics))
        .nest("/api/v1", api_routes())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Top Tier Men API v1" }))
        .nest("/prelaunch-leads", lead_routes())
        .nest("/nutrition", nutrition_routes())
        .nest("/workout-sessions", workout_routes())
        .nest("/brotherhood", brotherhood_routes())
        .nest("/journal", journal_routes())
        .nest("/onboarding", onboarding_routes())
}
