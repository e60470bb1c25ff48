//! Journal service

use crate::error::ApiError;
use crate::repositories::{JournalEntryRecord, JournalRepository};
use crate::services::workout::normalize_limit;
use crate::telemetry::JOURNAL_ENTRIES_CREATED;
use sqlx::PgPool;
use top_tier_shared::types::{CreateJournalEntryRequest, JournalEntryResponse};
use top_tier_shared::validation::{validate_journal_content, validate_mood};
use tracing::info;
use uuid::Uuid;

impl From<JournalEntryRecord> for JournalEntryResponse {
    fn from(r: JournalEntryRecord) -> Self {
        JournalEntryResponse {
            id: r.id.to_string(),
            content: r.content,
            mood: r.mood,
            prompt: r.prompt,
            created_at: r.created_at,
        }
    }
}

/// Journal service for business logic
pub struct JournalService;

impl JournalService {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        req: CreateJournalEntryRequest,
    ) -> Result<JournalEntryResponse, ApiError> {
        validate_journal_content(&req.content).map_err(|msg| ApiError::field("content", msg))?;
        if let Some(mood) = req.mood {
            validate_mood(mood).map_err(|msg| ApiError::field("mood", msg))?;
        }
        let prompt = req
            .prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        let record = JournalRepository::create(pool, user_id, req.content.trim(), req.mood, prompt)
            .await
            .map_err(ApiError::Internal)?;

        metrics::counter!(JOURNAL_ENTRIES_CREATED).increment(1);
        info!(entry_id = %record.id, mood = ?record.mood, "Journal entry created");

        Ok(record.into())
    }

    /// The user's entries, newest first
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<JournalEntryResponse>, ApiError> {
        let records = JournalRepository::list(pool, user_id, normalize_limit(limit))
            .await
            .map_err(ApiError::Internal)?;
        Ok(records.into_iter().map(JournalEntryResponse::from).collect())
    }

    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let deleted = JournalRepository::delete(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Journal entry not found".to_string()));
        }
        Ok(())
    }
}
