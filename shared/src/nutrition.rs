//! Macro and calorie aggregation for nutrition plans
//!
//! A plan is a weekly schedule of days, each day a list of meals, each meal
//! a list of ingredient amounts. Totals are computed bottom-up from the
//! ingredient facts and the unit factor of each ingredient.

use crate::errors::NutritionError;
use crate::units::MeasureUnit;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::iter::Sum;
use std::ops::Add;
use uuid::Uuid;

/// Energy per gram of macronutrient
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Number of days a weekly average is taken over
pub const DAYS_PER_WEEK: usize = 7;

/// Calorie and macronutrient amounts
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Macros {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl Macros {
    pub fn new(calories: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        Self {
            calories,
            protein_g,
            carbs_g,
            fat_g,
        }
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein_g: self.protein_g * factor,
            carbs_g: self.carbs_g * factor,
            fat_g: self.fat_g * factor,
        }
    }

    /// Divide every value, zero divisor yields zero
    pub fn div(&self, divisor: f64) -> Self {
        if divisor == 0.0 {
            return Self::default();
        }
        Self {
            calories: self.calories / divisor,
            protein_g: self.protein_g / divisor,
            carbs_g: self.carbs_g / divisor,
            fat_g: self.fat_g / divisor,
        }
    }

    /// Round every value to one decimal for display
    pub fn rounded(&self) -> Self {
        let round = |v: f64| (v * 10.0).round() / 10.0;
        Self {
            calories: round(self.calories),
            protein_g: round(self.protein_g),
            carbs_g: round(self.carbs_g),
            fat_g: round(self.fat_g),
        }
    }
}

impl Add for Macros {
    type Output = Macros;

    fn add(self, rhs: Macros) -> Macros {
        Macros {
            calories: self.calories + rhs.calories,
            protein_g: self.protein_g + rhs.protein_g,
            carbs_g: self.carbs_g + rhs.carbs_g,
            fat_g: self.fat_g + rhs.fat_g,
        }
    }
}

impl Sum for Macros {
    fn sum<I: Iterator<Item = Macros>>(iter: I) -> Self {
        iter.fold(Macros::default(), Add::add)
    }
}

/// Nutrition facts of an ingredient, declared against its unit basis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientFacts {
    pub id: Uuid,
    pub name: String,
    pub unit: MeasureUnit,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl IngredientFacts {
    pub fn macros(&self) -> Macros {
        Macros::new(self.calories, self.protein_g, self.carbs_g, self.fat_g)
    }
}

/// Macros contributed by `amount` of an ingredient
pub fn ingredient_macros(facts: &IngredientFacts, amount: f64) -> Result<Macros, NutritionError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(NutritionError::InvalidAmount {
            ingredient: facts.name.clone(),
            amount,
        });
    }
    Ok(facts.macros().scale(facts.unit.factor(amount)))
}

/// Ingredient amount inside a meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealIngredient {
    pub ingredient_id: Uuid,
    pub amount: f64,
}

/// A meal in a plan day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanMeal {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<MealIngredient>,
}

/// One day of a weekly plan (1 = Monday ... 7 = Sunday)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDay {
    pub day: u8,
    #[serde(default)]
    pub meals: Vec<PlanMeal>,
}

/// Weekly meal schedule of a nutrition plan
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeeklySchedule {
    #[serde(default)]
    pub days: Vec<PlanDay>,
}

impl WeeklySchedule {
    /// Check the day numbers are in range and unique and every amount is
    /// finite and non-negative
    pub fn validate(&self) -> Result<(), NutritionError> {
        let mut seen = HashSet::new();
        for day in &self.days {
            if !(1..=DAYS_PER_WEEK as u8).contains(&day.day) {
                return Err(NutritionError::InvalidDay(day.day));
            }
            if !seen.insert(day.day) {
                return Err(NutritionError::DuplicateDay(day.day));
            }
            let bad_amount = day
                .meals
                .iter()
                .flat_map(|m| m.ingredients.iter())
                .find(|i| !i.amount.is_finite() || i.amount < 0.0);
            if let Some(item) = bad_amount {
                return Err(NutritionError::InvalidAmount {
                    ingredient: item.ingredient_id.to_string(),
                    amount: item.amount,
                });
            }
        }
        Ok(())
    }

    /// All distinct ingredient ids referenced by the schedule
    pub fn ingredient_ids(&self) -> Vec<Uuid> {
        let mut seen = HashSet::new();
        self.days
            .iter()
            .flat_map(|d| d.meals.iter())
            .flat_map(|m| m.ingredients.iter())
            .filter(|i| seen.insert(i.ingredient_id))
            .map(|i| i.ingredient_id)
            .collect()
    }
}

/// Lookup of ingredient facts by id
pub type IngredientIndex = HashMap<Uuid, IngredientFacts>;

/// Build an index from a list of facts
pub fn index_ingredients(facts: impl IntoIterator<Item = IngredientFacts>) -> IngredientIndex {
    facts.into_iter().map(|f| (f.id, f)).collect()
}

/// Totals of a single meal
pub fn meal_totals(meal: &PlanMeal, index: &IngredientIndex) -> Result<Macros, NutritionError> {
    meal.ingredients
        .iter()
        .map(|item| {
            let facts = index
                .get(&item.ingredient_id)
                .ok_or_else(|| NutritionError::UnknownIngredient(item.ingredient_id.to_string()))?;
            ingredient_macros(facts, item.amount)
        })
        .sum()
}

/// Totals of a single day
pub fn day_totals(day: &PlanDay, index: &IngredientIndex) -> Result<Macros, NutritionError> {
    day.meals.iter().map(|meal| meal_totals(meal, index)).sum()
}

/// Computed totals for one meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSummary {
    pub name: String,
    pub totals: Macros,
}

/// Computed totals for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub day: u8,
    pub meals: Vec<MealSummary>,
    pub totals: Macros,
}

/// Computed totals for a whole plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub days: Vec<DaySummary>,
    pub weekly_total: Macros,
    pub weekly_average: Macros,
}

/// Compute per-meal, per-day and weekly figures of a schedule
///
/// The weekly average always divides by seven; days missing from the
/// schedule count as empty days.
pub fn plan_summary(
    schedule: &WeeklySchedule,
    index: &IngredientIndex,
) -> Result<PlanSummary, NutritionError> {
    schedule.validate()?;

    let mut days = Vec::with_capacity(schedule.days.len());
    for day in &schedule.days {
        let mut meals = Vec::with_capacity(day.meals.len());
        for meal in &day.meals {
            meals.push(MealSummary {
                name: meal.name.clone(),
                totals: meal_totals(meal, index)?,
            });
        }
        let totals: Macros = meals.iter().map(|m| m.totals).sum();
        days.push(DaySummary {
            day: day.day,
            meals,
            totals,
        });
    }
    days.sort_by_key(|d| d.day);

    let weekly_total: Macros = days.iter().map(|d| d.totals).sum();

    Ok(PlanSummary {
        days,
        weekly_total,
        weekly_average: weekly_total.div(DAYS_PER_WEEK as f64),
    })
}

/// Percentage distribution of calories over the macronutrients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein_percent: f64,
    pub carbs_percent: f64,
    pub fat_percent: f64,
}

impl Default for MacroSplit {
    fn default() -> Self {
        Self {
            protein_percent: 30.0,
            carbs_percent: 40.0,
            fat_percent: 30.0,
        }
    }
}

impl MacroSplit {
    pub fn validate(&self) -> Result<(), NutritionError> {
        let parts = [self.protein_percent, self.carbs_percent, self.fat_percent];
        let total: f64 = parts.iter().sum();
        if parts.iter().any(|p| !p.is_finite() || *p < 0.0) || (total - 100.0).abs() > 0.01 {
            return Err(NutritionError::InvalidSplit(total));
        }
        Ok(())
    }

    /// Gram targets for a calorie budget
    pub fn grams_for(&self, calories: f64) -> Result<Macros, NutritionError> {
        self.validate()?;
        Ok(Macros {
            calories,
            protein_g: calories * self.protein_percent / 100.0 / KCAL_PER_GRAM_PROTEIN,
            carbs_g: calories * self.carbs_percent / 100.0 / KCAL_PER_GRAM_CARBS,
            fat_g: calories * self.fat_percent / 100.0 / KCAL_PER_GRAM_FAT,
        })
    }
}

/// Percentage difference of actual values against a target, per macro
///
/// A zero target yields zero deviation for that macro.
pub fn deviation(actual: &Macros, target: &Macros) -> Macros {
    let pct = |a: f64, t: f64| if t == 0.0 { 0.0 } else { (a - t) / t * 100.0 };
    Macros {
        calories: pct(actual.calories, target.calories),
        protein_g: pct(actual.protein_g, target.protein_g),
        carbs_g: pct(actual.carbs_g, target.carbs_g),
        fat_g: pct(actual.fat_g, target.fat_g),
    }
}
