//! Business logic services
//!
//! Services validate requests, coordinate repositories and map records
//! to the shared response types.

pub mod brotherhood;
pub mod journal;
pub mod leads;
pub mod nutrition;
pub mod onboarding;
pub mod workout;

pub use brotherhood::BrotherhoodService;
pub use journal::JournalService;
pub use leads::LeadService;
pub use nutrition::NutritionService;
pub use onboarding::OnboardingService;
pub use workout::WorkoutService;
