//! Daily calorie target estimation for nutrition plans
//!
//! BMR uses the Mifflin-St Jeor equation, scaled by an activity multiplier
//! and shifted by the plan goal.

use crate::errors::NutritionError;
use crate::nutrition::{MacroSplit, Macros};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest daily calorie target a plan will suggest
pub const MIN_CALORIE_TARGET: f64 = 1500.0;

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    #[default]
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise, physical job
    ExtraActive,
}

impl ActivityLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }
}

/// What a nutrition plan is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanGoal {
    Cut,
    #[default]
    Maintain,
    Bulk,
}

impl PlanGoal {
    /// Daily calorie adjustment relative to maintenance
    pub fn calorie_adjustment(&self) -> f64 {
        match self {
            PlanGoal::Cut => -500.0,
            PlanGoal::Maintain => 0.0,
            PlanGoal::Bulk => 300.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanGoal::Cut => "cut",
            PlanGoal::Maintain => "maintain",
            PlanGoal::Bulk => "bulk",
        }
    }
}

impl fmt::Display for PlanGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlanGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cut" | "afvallen" => Ok(PlanGoal::Cut),
            "maintain" | "onderhoud" => Ok(PlanGoal::Maintain),
            "bulk" | "aankomen" => Ok(PlanGoal::Bulk),
            _ => Err(format!("Unknown plan goal: {}", s)),
        }
    }
}

/// Body data used to estimate a calorie target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    #[serde(default = "default_is_male")]
    pub is_male: bool,
    #[serde(default)]
    pub activity: ActivityLevel,
}

fn default_is_male() -> bool {
    true
}

/// Estimated daily targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieTarget {
    pub bmr: f64,
    pub tdee: f64,
    pub goal: PlanGoal,
    pub macros: Macros,
}

/// Basal metabolic rate (Mifflin-St Jeor)
pub fn bmr_mifflin(weight_kg: f64, height_cm: f64, age_years: u32, is_male: bool) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    if is_male {
        base + 5.0
    } else {
        base - 161.0
    }
}

/// Daily calorie target with gram targets for the given split
pub fn calorie_target(
    profile: &BodyProfile,
    goal: PlanGoal,
    split: &MacroSplit,
) -> Result<CalorieTarget, NutritionError> {
    let bmr = bmr_mifflin(
        profile.weight_kg,
        profile.height_cm,
        profile.age_years,
        profile.is_male,
    );
    let tdee = bmr * profile.activity.multiplier();
    let calories = (tdee + goal.calorie_adjustment()).max(MIN_CALORIE_TARGET).round();

    Ok(CalorieTarget {
        bmr: bmr.round(),
        tdee: tdee.round(),
        goal,
        macros: split.grams_for(calories)?.rounded(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn profile() -> BodyProfile {
        BodyProfile {
            weight_kg: 80.0,
            height_cm: 180.0,
            age_years: 30,
            is_male: true,
            activity: ActivityLevel::ModeratelyActive,
        }
    }

    #[test]
    fn test_bmr_known_value() {
        // 10*80 + 6.25*180 - 5*30 + 5 = 1780
        assert_eq!(bmr_mifflin(80.0, 180.0, 30, true), 1780.0);
        assert_eq!(bmr_mifflin(80.0, 180.0, 30, false), 1614.0);
    }

    #[test]
    fn test_calorie_target_goals() {
        let split = MacroSplit::default();
        let maintain = calorie_target(&profile(), PlanGoal::Maintain, &split).unwrap();
        let cut = calorie_target(&profile(), PlanGoal::Cut, &split).unwrap();
        let bulk = calorie_target(&profile(), PlanGoal::Bulk, &split).unwrap();

        assert_eq!(maintain.tdee, 2759.0);
        assert_eq!(maintain.macros.calories, 2759.0);
        assert_eq!(cut.macros.calories, 2259.0);
        assert_eq!(bulk.macros.calories, 3059.0);
    }

    #[test]
    fn test_calorie_target_floor() {
        let small = BodyProfile {
            weight_kg: 45.0,
            height_cm: 150.0,
            age_years: 70,
            is_male: false,
            activity: ActivityLevel::Sedentary,
        };
        let target = calorie_target(&small, PlanGoal::Cut, &MacroSplit::default()).unwrap();
        assert_eq!(target.macros.calories, MIN_CALORIE_TARGET);
    }

    #[test]
    fn test_goal_parsing() {
        assert_eq!("cut".parse::<PlanGoal>().unwrap(), PlanGoal::Cut);
        assert_eq!("Aankomen".parse::<PlanGoal>().unwrap(), PlanGoal::Bulk);
        assert!("shred".parse::<PlanGoal>().is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: target never drops below the floor
        #[test]
        fn prop_target_respects_floor(
            weight in 40.0f64..200.0,
            height in 140.0f64..220.0,
            age in 16u32..90
        ) {
            let p = BodyProfile {
                weight_kg: weight,
                height_cm: height,
                age_years: age,
                is_male: true,
                activity: ActivityLevel::Sedentary,
            };
            let t = calorie_target(&p, PlanGoal::Cut, &MacroSplit::default()).unwrap();
            prop_assert!(t.macros.calories >= MIN_CALORIE_TARGET);
        }
    }
}
