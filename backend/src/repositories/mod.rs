//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod brotherhood;
pub mod journal;
pub mod leads;
pub mod nutrition;
pub mod onboarding;
pub mod workout;

pub use brotherhood::{
    CreateEvent, EventRecord, EventRepository, ForumRepository, GroupRecord, GroupRepository,
    PostRecord, RsvpWrite, TopicRecord,
};
pub use journal::{JournalEntryRecord, JournalRepository};
pub use leads::{CreateLead, LeadRecord, LeadRepository};
pub use nutrition::{
    CategoryRecord, CategoryRepository, IngredientInput, IngredientRecord, IngredientRepository,
    PlanInput, PlanRecord, PlanRepository, UnitTypeRecord, UnitTypeRepository,
};
pub use onboarding::{OnboardingRecord, OnboardingRepository};
pub use workout::{WorkoutSessionRecord, WorkoutSessionRepository, WorkoutTotals};
