//! Workout session service
//!
//! The client runs the session timer; the server stores its snapshots.
//! Every snapshot is replayed through the shared state machine against
//! the stored plan before it is accepted, and completion is recorded once.

use crate::error::ApiError;
use crate::repositories::{WorkoutSessionRecord, WorkoutSessionRepository};
use crate::telemetry::WORKOUT_SESSIONS_COMPLETED;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use sqlx::PgPool;
use std::collections::BTreeSet;
use top_tier_shared::types::{StartSessionRequest, WorkoutSessionResponse, WorkoutStatsResponse};
use top_tier_shared::validation::validate_name;
use top_tier_shared::workout::{SessionSnapshot, WorkoutSession};
use top_tier_shared::{SessionRecordStatus, WorkoutError};
use tracing::{info, warn};
use uuid::Uuid;

const DEFAULT_LIST_LIMIT: i64 = 20;
const MAX_LIST_LIMIT: i64 = 100;

/// Clamp a requested page size
pub fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

impl From<WorkoutSessionRecord> for WorkoutSessionResponse {
    fn from(r: WorkoutSessionRecord) -> Self {
        let exercises = r.exercises.0;
        let snapshot = r.snapshot.0;
        let progress_percent = match WorkoutSession::restore(exercises.clone(), snapshot.clone()) {
            Ok(session) => session.progress_percent(),
            Err(e) => {
                warn!(session_id = %r.id, error = %e, "Stored snapshot does not restore");
                0.0
            }
        };

        WorkoutSessionResponse {
            id: r.id.to_string(),
            workout_name: r.workout_name,
            status: r.status,
            exercises,
            snapshot,
            progress_percent,
            summary: r.summary.map(|s| s.0),
            started_at: r.started_at,
            completed_at: r.completed_at,
        }
    }
}

/// Workout service for business logic
pub struct WorkoutService;

impl WorkoutService {
    /// Start a session at the first set of the first exercise
    pub async fn start(
        pool: &PgPool,
        user_id: Uuid,
        req: StartSessionRequest,
    ) -> Result<WorkoutSessionResponse, ApiError> {
        validate_name("Workout name", &req.workout_name)
            .map_err(|msg| ApiError::field("workout_name", msg))?;
        let session = WorkoutSession::new(req.exercises)?;

        let record = WorkoutSessionRepository::create(
            pool,
            user_id,
            req.workout_name.trim(),
            session.plan(),
            session.snapshot(),
        )
        .await
        .map_err(ApiError::Internal)?;

        info!(session_id = %record.id, user_id = %user_id, "Workout session started");
        Ok(record.into())
    }

    /// Store the client's progress for a running session
    pub async fn save_progress(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        snapshot: SessionSnapshot,
    ) -> Result<WorkoutSessionResponse, ApiError> {
        let record = Self::find_open(pool, user_id, id).await?;
        let session = WorkoutSession::restore(record.exercises.0, snapshot)?;
        if session.is_completed() {
            return Err(ApiError::field(
                "snapshot",
                "Finished sessions must be submitted through complete",
            ));
        }

        WorkoutSessionRepository::update_snapshot(pool, user_id, id, session.snapshot())
            .await
            .map_err(ApiError::Internal)?
            .map(WorkoutSessionResponse::from)
            .ok_or_else(|| WorkoutError::AlreadyCompleted.into())
    }

    /// Record the final snapshot and summary of a finished session
    pub async fn complete(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        snapshot: SessionSnapshot,
    ) -> Result<WorkoutSessionResponse, ApiError> {
        let record = Self::find_open(pool, user_id, id).await?;
        let session = WorkoutSession::restore(record.exercises.0, snapshot)?;
        if !session.is_completed() {
            return Err(ApiError::field("snapshot", "Workout is not finished yet"));
        }
        let summary = session.summary();

        let completed = WorkoutSessionRepository::complete(
            pool,
            user_id,
            id,
            session.snapshot(),
            &summary,
        )
        .await
        .map_err(ApiError::Internal)?
        .ok_or(WorkoutError::AlreadyCompleted)?;

        metrics::counter!(WORKOUT_SESSIONS_COMPLETED).increment(1);
        info!(
            session_id = %id,
            duration_seconds = summary.duration_seconds,
            sets = summary.sets_completed,
            "Workout session completed"
        );

        Ok(completed.into())
    }

    pub async fn get(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<WorkoutSessionResponse, ApiError> {
        Self::find(pool, user_id, id).await.map(Into::into)
    }

    /// The user's sessions, newest first
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<WorkoutSessionResponse>, ApiError> {
        let records = WorkoutSessionRepository::list_recent(pool, user_id, normalize_limit(limit))
            .await
            .map_err(ApiError::Internal)?;
        Ok(records.into_iter().map(WorkoutSessionResponse::from).collect())
    }

    pub async fn stats(pool: &PgPool, user_id: Uuid) -> Result<WorkoutStatsResponse, ApiError> {
        let totals = WorkoutSessionRepository::totals(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        let completions = WorkoutSessionRepository::completion_times(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(WorkoutStatsResponse {
            total_sessions: totals.total_sessions,
            completed_sessions: totals.completed_sessions,
            total_minutes: totals.total_seconds / 60,
            total_sets: totals.total_sets,
            total_reps: totals.total_reps,
            weekly_streak: weekly_streak(&completions, Utc::now()),
        })
    }

    async fn find(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<WorkoutSessionRecord, ApiError> {
        WorkoutSessionRepository::find_for_user(pool, user_id, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Workout session not found".to_string()))
    }

    async fn find_open(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<WorkoutSessionRecord, ApiError> {
        let record = Self::find(pool, user_id, id).await?;
        if record.status == SessionRecordStatus::Completed.as_str() {
            return Err(WorkoutError::AlreadyCompleted.into());
        }
        Ok(record)
    }
}

fn week_start(at: DateTime<Utc>) -> NaiveDate {
    let date = at.date_naive();
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Number of consecutive weeks (Monday to Sunday, UTC) with at least one
/// completed session, counted back from the current week
///
/// A current week without a session yet does not break the streak; it
/// then counts from the previous week.
pub fn weekly_streak(completions: &[DateTime<Utc>], now: DateTime<Utc>) -> u32 {
    let weeks: BTreeSet<NaiveDate> = completions.iter().map(|at| week_start(*at)).collect();

    let mut week = week_start(now);
    if !weeks.contains(&week) {
        week -= Duration::weeks(1);
    }

    let mut streak = 0;
    while weeks.contains(&week) {
        streak += 1;
        week -= Duration::weeks(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use sqlx::types::Json;
    use top_tier_shared::workout::ExercisePlan;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 18, 0, 0).unwrap()
    }

    // Wednesday
    fn now() -> DateTime<Utc> {
        at(2025, 3, 12)
    }

    #[test]
    fn test_streak_empty() {
        assert_eq!(weekly_streak(&[], now()), 0);
    }

    #[test]
    fn test_streak_counts_consecutive_weeks() {
        let completions = [at(2025, 3, 10), at(2025, 3, 4), at(2025, 2, 24), at(2025, 2, 26)];
        assert_eq!(weekly_streak(&completions, now()), 3);
    }

    #[test]
    fn test_streak_survives_empty_current_week() {
        let completions = [at(2025, 3, 7), at(2025, 2, 28)];
        assert_eq!(weekly_streak(&completions, now()), 2);
    }

    #[test]
    fn test_streak_broken_by_gap() {
        let completions = [at(2025, 3, 11), at(2025, 2, 25)];
        assert_eq!(weekly_streak(&completions, now()), 1);
    }

    #[test]
    fn test_week_starts_on_monday() {
        assert_eq!(week_start(at(2025, 3, 16)), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(week_start(at(2025, 3, 10)), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    }

    #[test]
    fn test_normalize_limit() {
        assert_eq!(normalize_limit(None), 20);
        assert_eq!(normalize_limit(Some(0)), 1);
        assert_eq!(normalize_limit(Some(500)), 100);
    }

    #[test]
    fn test_response_reports_progress() {
        let plan = vec![ExercisePlan {
            name: "Squat".to_string(),
            sets: 2,
            reps: 5,
            rest_seconds: 0,
        }];
        let mut session = WorkoutSession::new(plan.clone()).unwrap();
        session.complete_set().unwrap();

        let record = WorkoutSessionRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            workout_name: "Leg day".to_string(),
            status: "in_progress".to_string(),
            exercises: Json(plan),
            snapshot: Json(session.snapshot().clone()),
            summary: None,
            duration_seconds: 0,
            sets_completed: 0,
            total_reps: 0,
            started_at: Utc::now(),
            completed_at: None,
            updated_at: Utc::now(),
        };

        let response = WorkoutSessionResponse::from(record);
        assert_eq!(response.progress_percent, 50.0);
        assert_eq!(response.status, "in_progress");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: the streak never exceeds the number of distinct completion weeks
        #[test]
        fn prop_streak_bounded_by_weeks(offsets in prop::collection::vec(0i64..400, 0..30)) {
            let completions: Vec<DateTime<Utc>> =
                offsets.iter().map(|d| now() - Duration::days(*d)).collect();
            let distinct: BTreeSet<NaiveDate> = completions.iter().map(|c| week_start(*c)).collect();

            prop_assert!(weekly_streak(&completions, now()) as usize <= distinct.len());
        }

        /// Property: a session every day means every week back to the first counts
        #[test]
        fn prop_daily_sessions_unbroken(days in 1i64..120) {
            let completions: Vec<DateTime<Utc>> =
                (0..days).map(|d| now() - Duration::days(d)).collect();
            let expected = (week_start(now()) - week_start(now() - Duration::days(days - 1))).num_weeks() + 1;

            prop_assert_eq!(weekly_streak(&completions, now()) as i64, expected);
        }
    }
}
