//! Onboarding wizard service
//!
//! Progress is stored per user as the current step. Advancing is a
//! compare-and-set on the stored step, so two concurrent requests cannot
//! skip a step.

use crate::error::ApiError;
use crate::repositories::{OnboardingRecord, OnboardingRepository};
use sqlx::PgPool;
use top_tier_shared::onboarding::OnboardingStep;
use top_tier_shared::types::OnboardingResponse;
use top_tier_shared::OnboardingError;
use tracing::info;
use uuid::Uuid;

fn stored_step(record: &OnboardingRecord) -> Result<OnboardingStep, ApiError> {
    Ok(record.step.parse::<OnboardingStep>()?)
}

/// Onboarding service for business logic
pub struct OnboardingService;

impl OnboardingService {
    /// Current step, starting at the welcome step for new users
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<OnboardingResponse, ApiError> {
        let record = OnboardingRepository::get_or_create(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(stored_step(&record)?.into())
    }

    /// Move to the next step
    pub async fn advance(pool: &PgPool, user_id: Uuid) -> Result<OnboardingResponse, ApiError> {
        let record = OnboardingRepository::get_or_create(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        let current = stored_step(&record)?;
        let next = current.next()?;

        Self::transition(pool, user_id, current, next).await
    }

    /// Skip the remaining steps
    pub async fn complete(pool: &PgPool, user_id: Uuid) -> Result<OnboardingResponse, ApiError> {
        let record = OnboardingRepository::get_or_create(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        let current = stored_step(&record)?;
        if current.is_completed() {
            return Err(OnboardingError::AlreadyCompleted.into());
        }

        Self::transition(pool, user_id, current, OnboardingStep::Completed).await
    }

    async fn transition(
        pool: &PgPool,
        user_id: Uuid,
        from: OnboardingStep,
        to: OnboardingStep,
    ) -> Result<OnboardingResponse, ApiError> {
        let updated = OnboardingRepository::set_step(
            pool,
            user_id,
            from.as_str(),
            to.as_str(),
            to.is_completed(),
        )
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| {
            ApiError::Conflict("Onboarding progress changed, reload and try again".to_string())
        })?;

        info!(user_id = %user_id, from = %from, to = %to, "Onboarding step changed");
        Ok(stored_step(&updated)?.into())
    }
}
