//! Onboarding V2 wizard steps and the dashboard sections each step unlocks

use crate::errors::OnboardingError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dashboard area a member can see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardSection {
    Dashboard,
    Profile,
    Missions,
    Challenges,
    Nutrition,
    Workouts,
    Brotherhood,
    Academy,
    MindFocus,
    Finance,
}

impl DashboardSection {
    pub const ALL: [DashboardSection; 10] = [
        DashboardSection::Dashboard,
        DashboardSection::Profile,
        DashboardSection::Missions,
        DashboardSection::Challenges,
        DashboardSection::Nutrition,
        DashboardSection::Workouts,
        DashboardSection::Brotherhood,
        DashboardSection::Academy,
        DashboardSection::MindFocus,
        DashboardSection::Finance,
    ];
}

/// Wizard step, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    #[default]
    Welcome,
    Profile,
    Goals,
    Nutrition,
    Training,
    Brotherhood,
    Completed,
}

impl OnboardingStep {
    const ORDER: [OnboardingStep; 7] = [
        OnboardingStep::Welcome,
        OnboardingStep::Profile,
        OnboardingStep::Goals,
        OnboardingStep::Nutrition,
        OnboardingStep::Training,
        OnboardingStep::Brotherhood,
        OnboardingStep::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OnboardingStep::Welcome => "welcome",
            OnboardingStep::Profile => "profile",
            OnboardingStep::Goals => "goals",
            OnboardingStep::Nutrition => "nutrition",
            OnboardingStep::Training => "training",
            OnboardingStep::Brotherhood => "brotherhood",
            OnboardingStep::Completed => "completed",
        }
    }

    pub fn is_completed(&self) -> bool {
        *self == OnboardingStep::Completed
    }

    /// The following step; completion is terminal
    pub fn next(&self) -> Result<OnboardingStep, OnboardingError> {
        let idx = Self::ORDER
            .iter()
            .position(|s| s == self)
            .unwrap_or(Self::ORDER.len() - 1);
        Self::ORDER
            .get(idx + 1)
            .copied()
            .ok_or(OnboardingError::AlreadyCompleted)
    }

    /// Sections visible while this step is current
    ///
    /// Each step unlocks the section it configures; every section is
    /// visible once onboarding is completed.
    pub fn visible_sections(&self) -> Vec<DashboardSection> {
        if self.is_completed() {
            return DashboardSection::ALL.to_vec();
        }
        let mut sections = vec![DashboardSection::Dashboard];
        if *self >= OnboardingStep::Goals {
            sections.push(DashboardSection::Profile);
        }
        if *self >= OnboardingStep::Nutrition {
            sections.push(DashboardSection::Missions);
        }
        if *self >= OnboardingStep::Training {
            sections.push(DashboardSection::Nutrition);
        }
        if *self >= OnboardingStep::Brotherhood {
            sections.push(DashboardSection::Workouts);
        }
        sections
    }
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OnboardingStep {
    type Err = OnboardingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .iter()
            .find(|step| step.as_str() == s)
            .copied()
            .ok_or_else(|| OnboardingError::UnknownStep(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_advance_in_order() {
        let mut step = OnboardingStep::default();
        let mut seen = vec![step];
        while let Ok(next) = step.next() {
            step = next;
            seen.push(step);
        }
        assert_eq!(seen, OnboardingStep::ORDER.to_vec());
        assert_eq!(
            OnboardingStep::Completed.next(),
            Err(OnboardingError::AlreadyCompleted)
        );
    }

    #[test]
    fn test_visible_sections_grow() {
        let mut previous = 0;
        for step in OnboardingStep::ORDER {
            let count = step.visible_sections().len();
            assert!(count >= previous, "{} hides sections", step);
            previous = count;
        }
    }

    #[test]
    fn test_welcome_only_shows_dashboard() {
        assert_eq!(
            OnboardingStep::Welcome.visible_sections(),
            vec![DashboardSection::Dashboard]
        );
    }

    #[test]
    fn test_completed_shows_everything() {
        assert_eq!(
            OnboardingStep::Completed.visible_sections().len(),
            DashboardSection::ALL.len()
        );
    }

    #[test]
    fn test_parse_step() {
        assert_eq!("training".parse::<OnboardingStep>(), Ok(OnboardingStep::Training));
        assert!("nope".parse::<OnboardingStep>().is_err());
    }
}
