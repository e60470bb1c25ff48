//! Onboarding progress repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Onboarding status record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OnboardingRecord {
    pub user_id: Uuid,
    pub step: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Onboarding repository
pub struct OnboardingRepository;

impl OnboardingRepository {
    /// Fetch the user's status, creating the initial row when absent
    pub async fn get_or_create(pool: &PgPool, user_id: Uuid) -> Result<OnboardingRecord> {
        sqlx::query(
            r#"
            INSERT INTO onboarding_status (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        let record = sqlx::query_as::<_, OnboardingRecord>(
            "SELECT user_id, step, completed_at, updated_at FROM onboarding_status WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Move from `from` to `to`; returns None when the stored step is no longer `from`
    pub async fn set_step(
        pool: &PgPool,
        user_id: Uuid,
        from: &str,
        to: &str,
        completed: bool,
    ) -> Result<Option<OnboardingRecord>> {
        let record = sqlx::query_as::<_, OnboardingRecord>(
            r#"
            UPDATE onboarding_status
            SET step = $3,
                completed_at = CASE WHEN $4 THEN NOW() ELSE completed_at END,
                updated_at = NOW()
            WHERE user_id = $1 AND step = $2
            RETURNING user_id, step, completed_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .bind(completed)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}
