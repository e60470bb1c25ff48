//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal and domain errors to appropriate HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use top_tier_shared::types::{ErrorDetail, ErrorResponse};
use top_tier_shared::{CalendarError, NutritionError, OnboardingError, WorkoutError};
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation error on {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// Validation failure tied to a request field
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<NutritionError> for ApiError {
    fn from(err: NutritionError) -> Self {
        match err {
            NutritionError::UnknownIngredient(_) => ApiError::field("schedule", err.to_string()),
            NutritionError::InvalidDay(_) | NutritionError::DuplicateDay(_) => {
                ApiError::field("schedule", err.to_string())
            }
            NutritionError::InvalidSplit(_) => ApiError::field("macro_split", err.to_string()),
            NutritionError::InvalidAmount { .. } => ApiError::field("schedule", err.to_string()),
        }
    }
}

impl From<WorkoutError> for ApiError {
    fn from(err: WorkoutError) -> Self {
        match err {
            WorkoutError::AlreadyCompleted => ApiError::Conflict(err.to_string()),
            WorkoutError::EmptyPlan
            | WorkoutError::NoSets(_)
            | WorkoutError::TooManyExercises(_)
            | WorkoutError::ExerciseTooLarge(..) => {
                ApiError::field("exercises", err.to_string())
            }
            WorkoutError::InvalidSnapshot(_) => ApiError::field("snapshot", err.to_string()),
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<CalendarError> for ApiError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::EmptyTitle => ApiError::field("title", err.to_string()),
            CalendarError::InvalidRange => ApiError::field("ends_at", err.to_string()),
        }
    }
}

impl From<OnboardingError> for ApiError {
    fn from(err: OnboardingError) -> Self {
        match err {
            OnboardingError::AlreadyCompleted => ApiError::Conflict(err.to_string()),
            OnboardingError::UnknownStep(_) => ApiError::Internal(anyhow::anyhow!(err)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut field = None;
        let (status, code, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            ApiError::InvalidField { field: name, message } => {
                field = Some(name);
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Postgres unique_violation
pub(crate) fn is_unique_violation(err: &anyhow::Error) -> bool {
    has_sqlstate(err, "23505")
}

/// Postgres foreign_key_violation
pub(crate) fn is_foreign_key_violation(err: &anyhow::Error) -> bool {
    has_sqlstate(err, "23503")
}

fn has_sqlstate(err: &anyhow::Error, code: &str) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| match e {
            sqlx::Error::Database(db) => db.code().map(|c| c == code),
            _ => None,
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_error_status() {
        let error = ApiError::Validation("Invalid input".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_status() {
        let error = ApiError::NotFound("Plan not found".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_error_status() {
        let response = ApiError::Conflict("exists".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_field_error_carries_field_name() {
        let response = ApiError::field("name", "Categorienaam is verplicht").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["field"], "name");
        assert_eq!(body["error"]["message"], "Categorienaam is verplicht");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = ApiError::Internal(anyhow::anyhow!("connection refused")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "An internal error occurred");
        assert!(body["error"].get("field").is_none());
    }

    #[test]
    fn test_completed_workout_maps_to_conflict() {
        let response = ApiError::from(WorkoutError::AlreadyCompleted).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_snapshot_maps_to_bad_request() {
        let err = ApiError::from(WorkoutError::InvalidSnapshot("set out of range".to_string()));
        assert!(matches!(err, ApiError::InvalidField { ref field, .. } if field == "snapshot"));
    }

    #[test]
    fn test_oversized_exercise_maps_to_exercises_field() {
        let err = ApiError::from(WorkoutError::ExerciseTooLarge("Curl".to_string(), 100, 1000, 3600));
        assert!(matches!(err, ApiError::InvalidField { ref field, .. } if field == "exercises"));
    }

    #[test]
    fn test_calendar_range_maps_to_field() {
        let err = ApiError::from(CalendarError::InvalidRange);
        assert!(matches!(err, ApiError::InvalidField { ref field, .. } if field == "ends_at"));
    }

    #[test]
    fn test_non_database_error_is_not_unique_violation() {
        assert!(!is_unique_violation(&anyhow::anyhow!("nope")));
        assert!(!is_foreign_key_violation(&anyhow::anyhow!("nope")));
    }
}
