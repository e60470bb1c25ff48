//! API request and response types

use crate::nutrition::{MacroSplit, Macros, PlanSummary, WeeklySchedule};
use crate::onboarding::{DashboardSection, OnboardingStep};
use crate::targets::{BodyProfile, PlanGoal};
use crate::units::MeasureUnit;
use crate::workout::{ExercisePlan, SessionSnapshot, WorkoutSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Optional result limit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

// ============================================================================
// Prelaunch Lead Types
// ============================================================================

/// Prelaunch signup request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLeadRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Prelaunch lead response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadResponse {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Delete-by-email query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteLeadQuery {
    pub email: String,
}

/// Result of a delete; `deleted` is empty when nothing matched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteLeadsResponse {
    pub success: bool,
    pub deleted: Vec<LeadResponse>,
}

// ============================================================================
// Nutrition Admin Types
// ============================================================================

/// Create or rename a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

/// Ingredient category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub ingredient_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Create a unit type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUnitTypeRequest {
    pub name: String,
    /// Unit keyword, e.g. "g", "stuk", "handje"
    pub unit: String,
}

/// Unit type an ingredient's facts are declared against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitTypeResponse {
    pub id: String,
    pub name: String,
    pub unit: MeasureUnit,
    pub per_label: String,
}

/// Create or update an ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientRequest {
    pub name: String,
    #[serde(default)]
    pub category_id: Option<String>,
    pub unit_type_id: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Ingredient response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub unit_type_id: String,
    pub unit: MeasureUnit,
    pub per_label: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Ingredient list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientQuery {
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

/// Create or update a nutrition plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub goal: PlanGoal,
    #[serde(default)]
    pub target_calories: Option<i32>,
    #[serde(default)]
    pub macro_split: Option<MacroSplit>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub schedule: WeeklySchedule,
}

/// Nutrition plan response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub goal: PlanGoal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_calories: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macro_split: Option<MacroSplit>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Plan with schedule and computed figures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDetailResponse {
    pub plan: PlanResponse,
    pub schedule: WeeklySchedule,
    pub summary: PlanSummary,
    /// Gram targets derived from the calorie target and split
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Macros>,
    /// Weekly average against the target, in percent per macro
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deviation: Option<Macros>,
}

/// Calorie target calculation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalorieTargetRequest {
    pub profile: BodyProfile,
    #[serde(default)]
    pub goal: PlanGoal,
    #[serde(default)]
    pub split: Option<MacroSplit>,
}

// ============================================================================
// Workout Session Types
// ============================================================================

/// Start a workout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub workout_name: String,
    pub exercises: Vec<ExercisePlan>,
}

/// Client-side progress to persist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionProgressRequest {
    pub snapshot: SessionSnapshot,
}

/// Stored workout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSessionResponse {
    pub id: String,
    pub workout_name: String,
    pub status: String,
    pub exercises: Vec<ExercisePlan>,
    pub snapshot: SessionSnapshot,
    pub progress_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<WorkoutSummary>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Aggregate workout statistics for a member
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutStatsResponse {
    pub total_sessions: i64,
    pub completed_sessions: i64,
    pub total_minutes: i64,
    pub total_sets: i64,
    pub total_reps: i64,
    /// Consecutive ISO weeks, up to the current one, with a completed session
    pub weekly_streak: u32,
}

// ============================================================================
// Brotherhood Types
// ============================================================================

/// Create a group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Brotherhood group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub member_count: i64,
    pub is_member: bool,
    pub created_at: DateTime<Utc>,
}

/// Create an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub group_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub capacity: Option<i32>,
}

/// Event list filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQuery {
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// RSVP counts per status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpCounts {
    pub going: i64,
    pub maybe: i64,
    pub not_going: i64,
}

/// Brotherhood event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
    pub rsvps: RsvpCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_rsvp: Option<String>,
}

/// RSVP to an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsvpRequest {
    pub status: String,
}

/// Create a forum topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTopicRequest {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub group_id: Option<String>,
}

/// Forum topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicResponse {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub reply_count: i64,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

/// Reply to a topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub body: String,
}

/// Forum post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub topic_id: String,
    pub author_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Mind & Focus Types
// ============================================================================

/// Create a journal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJournalEntryRequest {
    pub content: String,
    #[serde(default)]
    pub mood: Option<i16>,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Journal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntryResponse {
    pub id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Onboarding Types
// ============================================================================

/// Onboarding progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingResponse {
    pub step: OnboardingStep,
    pub completed: bool,
    pub visible_sections: Vec<DashboardSection>,
}

impl From<OnboardingStep> for OnboardingResponse {
    fn from(step: OnboardingStep) -> Self {
        Self {
            step,
            completed: step.is_completed(),
            visible_sections: step.visible_sections(),
        }
    }
}
