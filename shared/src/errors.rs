//! Error types for the Top Tier Men domain logic

use thiserror::Error;

/// Nutrition calculation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NutritionError {
    #[error("Invalid amount {amount} for ingredient {ingredient}")]
    InvalidAmount { ingredient: String, amount: f64 },

    #[error("Unknown ingredient: {0}")]
    UnknownIngredient(String),

    #[error("Plan day {0} is outside 1..=7")]
    InvalidDay(u8),

    #[error("Plan day {0} appears more than once")]
    DuplicateDay(u8),

    #[error("Macro split must add up to 100%, got {0}%")]
    InvalidSplit(f64),
}

/// Workout session state machine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkoutError {
    #[error("Workout plan has no exercises")]
    EmptyPlan,

    #[error("Exercise '{0}' must have at least one set")]
    NoSets(String),

    #[error("Workout plan has more than {0} exercises")]
    TooManyExercises(usize),

    #[error("Exercise '{0}' exceeds the limits of {1} sets, {2} reps and {3} seconds rest")]
    ExerciseTooLarge(String, u32, u32, u32),

    #[error("Session is not running")]
    NotRunning,

    #[error("Session is already paused")]
    AlreadyPaused,

    #[error("Session is not paused")]
    NotPaused,

    #[error("Session is currently resting")]
    Resting,

    #[error("Session is not resting")]
    NotResting,

    #[error("Session is already completed")]
    AlreadyCompleted,

    #[error("Snapshot does not match the workout plan: {0}")]
    InvalidSnapshot(String),
}

/// Calendar export errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Event title cannot be empty")]
    EmptyTitle,

    #[error("Event must end after it starts")]
    InvalidRange,
}

/// Focus tool errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FocusError {
    #[error("Phase duration must be positive")]
    ZeroDuration,

    #[error("Breathing pattern has no phases")]
    EmptyPattern,

    #[error("Timer is not running")]
    NotRunning,

    #[error("Timer is already running")]
    AlreadyRunning,

    #[error("Timer state is inconsistent: {0}")]
    InvalidState(&'static str),
}

/// Onboarding flow errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OnboardingError {
    #[error("Onboarding is already completed")]
    AlreadyCompleted,

    #[error("Unknown onboarding step: {0}")]
    UnknownStep(String),
}
