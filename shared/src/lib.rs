//! Top Tier Men Shared Library
//!
//! Domain types and the pure calculations used by the backend and by the
//! browser (through the WASM crate): nutrition aggregation, the workout
//! session state machine, focus timers, onboarding and calendar export.

pub mod calendar;
pub mod errors;
pub mod focus;
pub mod models;
pub mod nutrition;
pub mod onboarding;
pub mod targets;
pub mod types;
pub mod units;
pub mod validation;
pub mod workout;

// Re-export commonly used items
pub use errors::*;
pub use models::{RsvpStatus, SessionRecordStatus};
pub use units::MeasureUnit;
