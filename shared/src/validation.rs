//! Input validation functions
//!
//! Admin-facing messages are in Dutch, matching the admin console.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

pub const MAX_CATEGORY_NAME_LEN: usize = 50;
pub const MAX_NAME_LEN: usize = 120;
pub const MAX_JOURNAL_ENTRY_LEN: usize = 10_000;

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate an ingredient category name
pub fn validate_category_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Categorienaam is verplicht".to_string());
    }
    if name.chars().any(|c| c.is_ascii_digit()) {
        return Err("Categorienaam mag geen cijfers bevatten".to_string());
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(format!(
            "Categorienaam mag maximaal {} tekens bevatten",
            MAX_CATEGORY_NAME_LEN
        ));
    }
    Ok(())
}

/// Validate a display name (ingredients, plans, groups, topics)
pub fn validate_name(label: &str, name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("{} is verplicht", label));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(format!("{} mag maximaal {} tekens bevatten", label, MAX_NAME_LEN));
    }
    Ok(())
}

/// Validate a per-unit nutrition value
pub fn validate_macro_value(label: &str, value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err(format!("{} moet een geldig getal zijn", label));
    }
    if value < 0.0 {
        return Err(format!("{} mag niet negatief zijn", label));
    }
    if value > 10_000.0 {
        return Err(format!("{} is onrealistisch hoog", label));
    }
    Ok(())
}

/// Validate a calorie target for a plan
pub fn validate_calorie_target(calories: i32) -> Result<(), String> {
    if !(800..=10_000).contains(&calories) {
        return Err("Caloriedoel moet tussen 800 en 10000 liggen".to_string());
    }
    Ok(())
}

/// Valid RSVP status values
pub const VALID_RSVP_STATUSES: &[&str] = &["going", "maybe", "not_going"];

/// Validate RSVP status
pub fn validate_rsvp_status(status: &str) -> Result<(), String> {
    if VALID_RSVP_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid RSVP status. Must be one of: {}",
            VALID_RSVP_STATUSES.join(", ")
        ))
    }
}

/// Validate a journal entry body
pub fn validate_journal_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Journal entry cannot be empty".to_string());
    }
    if content.len() > MAX_JOURNAL_ENTRY_LEN {
        return Err(format!(
            "Journal entry cannot exceed {} characters",
            MAX_JOURNAL_ENTRY_LEN
        ));
    }
    Ok(())
}

/// Validate mood score (1-5)
pub fn validate_mood(mood: i16) -> Result<(), String> {
    if !(1..=5).contains(&mood) {
        return Err("Mood must be between 1 and 5".to_string());
    }
    Ok(())
}
