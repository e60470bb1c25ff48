//! Workout session repository for database operations

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use top_tier_shared::workout::{ExercisePlan, SessionSnapshot, WorkoutSummary};
use uuid::Uuid;

/// Workout session record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkoutSessionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workout_name: String,
    pub status: String,
    pub exercises: Json<Vec<ExercisePlan>>,
    pub snapshot: Json<SessionSnapshot>,
    pub summary: Option<Json<WorkoutSummary>>,
    pub duration_seconds: i32,
    pub sets_completed: i32,
    pub total_reps: i32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate counters over a member's sessions
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct WorkoutTotals {
    pub total_sessions: i64,
    pub completed_sessions: i64,
    pub total_seconds: i64,
    pub total_sets: i64,
    pub total_reps: i64,
}

const SESSION_COLUMNS: &str = r#"
    id, user_id, workout_name, status, exercises, snapshot, summary,
    duration_seconds, sets_completed, total_reps, started_at, completed_at, updated_at
"#;

/// Workout session repository
pub struct WorkoutSessionRepository;

impl WorkoutSessionRepository {
    /// Insert a new in-progress session
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        workout_name: &str,
        exercises: &[ExercisePlan],
        snapshot: &SessionSnapshot,
    ) -> Result<WorkoutSessionRecord> {
        let sql = format!(
            r#"
            INSERT INTO workout_sessions (user_id, workout_name, exercises, snapshot)
            VALUES ($1, $2, $3, $4)
            RETURNING {SESSION_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, WorkoutSessionRecord>(&sql)
            .bind(user_id)
            .bind(workout_name)
            .bind(Json(exercises))
            .bind(Json(snapshot))
            .fetch_one(pool)
            .await?;

        Ok(record)
    }

    /// Get a session owned by the user
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<WorkoutSessionRecord>> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM workout_sessions WHERE id = $1 AND user_id = $2"
        );

        let record = sqlx::query_as::<_, WorkoutSessionRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// Most recent sessions of a user
    pub async fn list_recent(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<WorkoutSessionRecord>> {
        let sql = format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM workout_sessions
            WHERE user_id = $1
            ORDER BY started_at DESC
            LIMIT $2
            "#
        );

        let records = sqlx::query_as::<_, WorkoutSessionRecord>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        Ok(records)
    }

    /// Store progress of a session that is still in progress
    ///
    /// Returns None when the session is missing or already completed.
    pub async fn update_snapshot(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        snapshot: &SessionSnapshot,
    ) -> Result<Option<WorkoutSessionRecord>> {
        let sql = format!(
            r#"
            UPDATE workout_sessions
            SET snapshot = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND status = 'in_progress'
            RETURNING {SESSION_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, WorkoutSessionRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(Json(snapshot))
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// Mark a session completed
    ///
    /// The status guard makes completion happen at most once.
    pub async fn complete(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        snapshot: &SessionSnapshot,
        summary: &WorkoutSummary,
    ) -> Result<Option<WorkoutSessionRecord>> {
        let duration = i32::try_from(summary.duration_seconds).context("duration out of range")?;
        let sets = i32::try_from(summary.sets_completed).context("set count out of range")?;
        let reps = i32::try_from(summary.total_reps).context("rep count out of range")?;

        let sql = format!(
            r#"
            UPDATE workout_sessions
            SET status = 'completed', snapshot = $3, summary = $4,
                duration_seconds = $5, sets_completed = $6, total_reps = $7,
                completed_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND status = 'in_progress'
            RETURNING {SESSION_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, WorkoutSessionRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(Json(snapshot))
            .bind(Json(summary))
            .bind(duration)
            .bind(sets)
            .bind(reps)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// Totals over all of a user's sessions
    pub async fn totals(pool: &PgPool, user_id: Uuid) -> Result<WorkoutTotals> {
        let totals = sqlx::query_as::<_, WorkoutTotals>(
            r#"
            SELECT
                COUNT(*) AS total_sessions,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_sessions,
                COALESCE(SUM(duration_seconds), 0)::bigint AS total_seconds,
                COALESCE(SUM(sets_completed), 0)::bigint AS total_sets,
                COALESCE(SUM(total_reps), 0)::bigint AS total_reps
            FROM workout_sessions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(totals)
    }

    /// Completion times of a user's completed sessions, newest first
    pub async fn completion_times(pool: &PgPool, user_id: Uuid) -> Result<Vec<DateTime<Utc>>> {
        let times: Vec<DateTime<Utc>> = sqlx::query_scalar(
            r#"
            SELECT completed_at
            FROM workout_sessions
            WHERE user_id = $1 AND completed_at IS NOT NULL
            ORDER BY completed_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(times)
    }
}
