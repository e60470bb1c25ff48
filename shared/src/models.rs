//! Domain enums shared between the backend and its clients

use serde::{Deserialize, Serialize};
use std::fmt;

/// RSVP answer for a brotherhood event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    Going,
    Maybe,
    NotGoing,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Going => "going",
            RsvpStatus::Maybe => "maybe",
            RsvpStatus::NotGoing => "not_going",
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RsvpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::validation::validate_rsvp_status(s)?;
        Ok(match s {
            "going" => RsvpStatus::Going,
            "maybe" => RsvpStatus::Maybe,
            _ => RsvpStatus::NotGoing,
        })
    }
}

/// Stored workout session record state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionRecordStatus {
    InProgress,
    Completed,
}

impl SessionRecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionRecordStatus::InProgress => "in_progress",
            SessionRecordStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for SessionRecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SessionRecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(SessionRecordStatus::InProgress),
            "completed" => Ok(SessionRecordStatus::Completed),
            _ => Err(format!("Unknown session status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsvp_status_parse() {
        assert_eq!("going".parse::<RsvpStatus>(), Ok(RsvpStatus::Going));
        assert_eq!("not_going".parse::<RsvpStatus>(), Ok(RsvpStatus::NotGoing));
        assert!("yes".parse::<RsvpStatus>().is_err());
    }

    #[test]
    fn test_rsvp_status_serde_matches_as_str() {
        for status in [RsvpStatus::Going, RsvpStatus::Maybe, RsvpStatus::NotGoing] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_session_status_roundtrip() {
        for status in [SessionRecordStatus::InProgress, SessionRecordStatus::Completed] {
            assert_eq!(status.as_str().parse::<SessionRecordStatus>(), Ok(status));
        }
    }
}
