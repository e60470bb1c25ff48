//! Prelaunch lead service
//!
//! Captures signups from the public landing page and gives admins a
//! way to review, export and remove them.

use crate::error::{is_unique_violation, ApiError};
use crate::repositories::{CreateLead, LeadRecord, LeadRepository};
use crate::telemetry::LEADS_CAPTURED;
use serde::Serialize;
use sqlx::PgPool;
use top_tier_shared::types::{CreateLeadRequest, DeleteLeadsResponse, LeadResponse};
use top_tier_shared::validation::validate_email;
use tracing::info;
use validator::ValidateEmail;

impl From<LeadRecord> for LeadResponse {
    fn from(record: LeadRecord) -> Self {
        LeadResponse {
            id: record.id.to_string(),
            email: record.email,
            name: record.name,
            source: record.source,
            created_at: record.created_at,
        }
    }
}

const CSV_HEADER: [&str; 4] = ["email", "name", "source", "created_at"];

/// CSV row for the lead export, columns in [`CSV_HEADER`] order
#[derive(Debug, Serialize)]
struct LeadCsvRow {
    email: String,
    name: String,
    source: String,
    created_at: String,
}

/// Trim and lower-case an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Lead service for business logic
pub struct LeadService;

impl LeadService {
    /// Store a prelaunch signup
    pub async fn capture(pool: &PgPool, req: CreateLeadRequest) -> Result<LeadResponse, ApiError> {
        let email = normalize_email(&req.email);
        validate_email(&email).map_err(|msg| ApiError::field("email", msg))?;
        // HTML5 email rules
        if !email.validate_email() {
            return Err(ApiError::field("email", "Invalid email format"));
        }

        let input = CreateLead {
            email,
            name: non_blank(req.name),
            source: non_blank(req.source),
        };

        let record = LeadRepository::create(pool, input).await.map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("Email is already on the prelaunch list".to_string())
            } else {
                ApiError::Internal(e)
            }
        })?;

        metrics::counter!(LEADS_CAPTURED).increment(1);
        info!(lead_id = %record.id, source = ?record.source, "Prelaunch lead captured");

        Ok(record.into())
    }

    /// All leads, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<LeadResponse>, ApiError> {
        let records = LeadRepository::list(pool).await.map_err(ApiError::Internal)?;
        Ok(records.into_iter().map(LeadResponse::from).collect())
    }

    /// Remove every lead with the given email
    ///
    /// Succeeds with an empty list when nothing matched.
    pub async fn delete_by_email(pool: &PgPool, email: &str) -> Result<DeleteLeadsResponse, ApiError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(ApiError::field("email", "Email cannot be empty"));
        }

        let deleted = LeadRepository::delete_by_email(pool, &email)
            .await
            .map_err(ApiError::Internal)?;

        info!(count = deleted.len(), "Prelaunch leads deleted");

        Ok(DeleteLeadsResponse {
            success: true,
            deleted: deleted.into_iter().map(LeadResponse::from).collect(),
        })
    }

    /// Export all leads as CSV
    pub async fn export_csv(pool: &PgPool) -> Result<String, ApiError> {
        let records = LeadRepository::list(pool).await.map_err(ApiError::Internal)?;
        leads_to_csv(&records)
    }
}

/// Render leads as CSV with a header row
pub fn leads_to_csv(records: &[LeadRecord]) -> Result<String, ApiError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    wtr.write_record(CSV_HEADER)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV header error: {}", e)))?;
    for record in records {
        wtr.serialize(LeadCsvRow {
            email: record.email.clone(),
            name: record.name.clone().unwrap_or_default(),
            source: record.source.clone().unwrap_or_default(),
            created_at: record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV serialization error: {}", e)))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV flush error: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV encoding error: {}", e)))
}
