//! Journal entry repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Journal entry record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JournalEntryRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub mood: Option<i16>,
    pub prompt: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Journal repository
pub struct JournalRepository;

impl JournalRepository {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        content: &str,
        mood: Option<i16>,
        prompt: Option<&str>,
    ) -> Result<JournalEntryRecord> {
        let record = sqlx::query_as::<_, JournalEntryRecord>(
            r#"
            INSERT INTO journal_entries (user_id, content, mood, prompt)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, content, mood, prompt, created_at
            "#,
        )
        .bind(user_id)
        .bind(content)
        .bind(mood)
        .bind(prompt)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// A user's entries, newest first
    pub async fn list(pool: &PgPool, user_id: Uuid, limit: i64) -> Result<Vec<JournalEntryRecord>> {
        let records = sqlx::query_as::<_, JournalEntryRecord>(
            r#"
            SELECT id, user_id, content, mood, prompt, created_at
            FROM journal_entries
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Delete an entry owned by the user
    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
