//! Top Tier Men WASM Module
//!
//! WebAssembly bindings so the browser runs the same workout session state
//! machine, focus timers and nutrition calculations as the backend.
//! Structured values cross the boundary as JSON strings.

use serde::Serialize;
use top_tier_shared::focus::{BreathingPattern, PomodoroConfig, PomodoroTimer};
use top_tier_shared::nutrition::{
    index_ingredients, ingredient_macros, plan_summary, IngredientFacts, MacroSplit,
    WeeklySchedule,
};
use top_tier_shared::targets::{calorie_target as estimate_target, ActivityLevel, BodyProfile, PlanGoal};
use top_tier_shared::workout::{
    ExercisePlan, SessionSnapshot, SessionStatus, SetOutcome, Tick, WorkoutSession,
    WorkoutSummary,
};
use top_tier_shared::MeasureUnit;
use wasm_bindgen::prelude::*;

fn js_err(message: impl ToString) -> JsValue {
    JsValue::from_str(&message.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

/// Outcome of completing a set, as sent to the UI
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum OutcomeView {
    NextSet { set: u32, rest_seconds: u32 },
    NextExercise { exercise_index: usize, rest_seconds: u32 },
    Completed { summary: WorkoutSummary },
}

impl From<SetOutcome> for OutcomeView {
    fn from(outcome: SetOutcome) -> Self {
        match outcome {
            SetOutcome::NextSet { set, rest_seconds } => OutcomeView::NextSet { set, rest_seconds },
            SetOutcome::NextExercise {
                exercise_index,
                rest_seconds,
            } => OutcomeView::NextExercise {
                exercise_index,
                rest_seconds,
            },
            SetOutcome::Completed(summary) => OutcomeView::Completed { summary },
        }
    }
}

/// Everything the workout player renders
#[derive(Serialize)]
struct SessionStateView<'a> {
    status: SessionStatus,
    elapsed_seconds: u32,
    exercise_index: usize,
    exercise_name: &'a str,
    set: u32,
    total_sets: u32,
    rest_remaining: Option<u32>,
    progress_percent: f64,
}

impl<'a> From<&'a WorkoutSession> for SessionStateView<'a> {
    fn from(session: &'a WorkoutSession) -> Self {
        let exercise = session.current_exercise();
        Self {
            status: session.status(),
            elapsed_seconds: session.elapsed_seconds(),
            exercise_index: session.current_exercise_index(),
            exercise_name: &exercise.name,
            set: session.current_set(),
            total_sets: exercise.sets,
            rest_remaining: session.rest_remaining(),
            progress_percent: session.progress_percent(),
        }
    }
}

fn tick_label(tick: Tick) -> &'static str {
    match tick {
        Tick::Idle => "idle",
        Tick::Running => "running",
        Tick::Resting { .. } => "resting",
        Tick::RestFinished => "rest_finished",
    }
}

fn parse_plan(plan_json: &str) -> Result<Vec<ExercisePlan>, String> {
    serde_json::from_str(plan_json).map_err(|e| format!("Invalid workout plan: {}", e))
}

/// Workout player state held by the browser
#[wasm_bindgen]
pub struct WorkoutSessionHandle {
    inner: WorkoutSession,
}

impl WorkoutSessionHandle {
    fn from_json(plan_json: &str) -> Result<Self, String> {
        let plan = parse_plan(plan_json)?;
        let inner = WorkoutSession::new(plan).map_err(|e| e.to_string())?;
        Ok(Self { inner })
    }

    fn restore_json(plan_json: &str, snapshot_json: &str) -> Result<Self, String> {
        let plan = parse_plan(plan_json)?;
        let snapshot: SessionSnapshot = serde_json::from_str(snapshot_json)
            .map_err(|e| format!("Invalid snapshot: {}", e))?;
        let inner = WorkoutSession::restore(plan, snapshot).map_err(|e| e.to_string())?;
        Ok(Self { inner })
    }

    fn complete_set_json(&mut self) -> Result<String, String> {
        let outcome = self.inner.complete_set().map_err(|e| e.to_string())?;
        to_json(&OutcomeView::from(outcome))
    }
}

#[wasm_bindgen]
impl WorkoutSessionHandle {
    /// Start a session from a JSON array of exercises
    #[wasm_bindgen(constructor)]
    pub fn new(plan_json: &str) -> Result<WorkoutSessionHandle, JsValue> {
        Self::from_json(plan_json).map_err(js_err)
    }

    /// Resume a session from its plan and a persisted snapshot
    pub fn restore(plan_json: &str, snapshot_json: &str) -> Result<WorkoutSessionHandle, JsValue> {
        Self::restore_json(plan_json, snapshot_json).map_err(js_err)
    }

    /// Advance one second; returns "idle", "running", "resting" or "rest_finished"
    pub fn tick(&mut self) -> String {
        tick_label(self.inner.tick()).to_string()
    }

    pub fn complete_set(&mut self) -> Result<String, JsValue> {
        self.complete_set_json().map_err(js_err)
    }

    pub fn skip_rest(&mut self) -> Result<(), JsValue> {
        self.inner.skip_rest().map_err(js_err)
    }

    pub fn pause(&mut self) -> Result<(), JsValue> {
        self.inner.pause().map_err(js_err)
    }

    pub fn resume(&mut self) -> Result<(), JsValue> {
        self.inner.resume().map_err(js_err)
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.inner.elapsed_seconds()
    }

    pub fn rest_remaining(&self) -> Option<u32> {
        self.inner.rest_remaining()
    }

    pub fn current_exercise_index(&self) -> usize {
        self.inner.current_exercise_index()
    }

    pub fn current_set(&self) -> u32 {
        self.inner.current_set()
    }

    pub fn is_completed(&self) -> bool {
        self.inner.is_completed()
    }

    pub fn progress_percent(&self) -> f64 {
        self.inner.progress_percent()
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        to_json(self.inner.snapshot()).map_err(js_err)
    }

    pub fn summary_json(&self) -> Result<String, JsValue> {
        to_json(&self.inner.summary()).map_err(js_err)
    }

    /// Current status, exercise, set and rest as one JSON object
    pub fn state_json(&self) -> Result<String, JsValue> {
        to_json(&SessionStateView::from(&self.inner)).map_err(js_err)
    }
}

/// Pomodoro timer held by the browser
#[wasm_bindgen]
pub struct PomodoroHandle {
    inner: PomodoroTimer,
}

#[wasm_bindgen]
impl PomodoroHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(
        focus_seconds: u32,
        short_break_seconds: u32,
        long_break_seconds: u32,
        rounds_before_long_break: u32,
    ) -> Result<PomodoroHandle, JsValue> {
        let config = PomodoroConfig {
            focus_seconds,
            short_break_seconds,
            long_break_seconds,
            rounds_before_long_break,
        };
        PomodoroTimer::new(config)
            .map(|inner| PomodoroHandle { inner })
            .map_err(js_err)
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        self.inner.start().map_err(js_err)
    }

    pub fn pause(&mut self) -> Result<(), JsValue> {
        self.inner.pause().map_err(js_err)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Advance one second; returns the new phase name when the phase changed
    pub fn tick(&mut self) -> Option<String> {
        self.inner.tick().map(|change| phase_name(change.next))
    }

    pub fn skip(&mut self) -> String {
        phase_name(self.inner.skip().next)
    }

    pub fn phase(&self) -> String {
        phase_name(self.inner.phase())
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.inner.remaining_seconds()
    }

    pub fn completed_focus_rounds(&self) -> u32 {
        self.inner.completed_focus_rounds()
    }
}

fn phase_name<T: Serialize>(phase: T) -> String {
    serde_json::to_value(phase)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn plan_summary_json(schedule_json: &str, ingredients_json: &str) -> Result<String, String> {
    let schedule: WeeklySchedule =
        serde_json::from_str(schedule_json).map_err(|e| format!("Invalid schedule: {}", e))?;
    let facts: Vec<IngredientFacts> =
        serde_json::from_str(ingredients_json).map_err(|e| format!("Invalid ingredients: {}", e))?;
    let index = index_ingredients(facts);
    let summary = plan_summary(&schedule, &index).map_err(|e| e.to_string())?;
    to_json(&summary)
}

/// Compute per-meal, per-day and weekly totals for a plan builder schedule
#[wasm_bindgen]
pub fn calculate_plan_summary(schedule_json: &str, ingredients_json: &str) -> Result<String, JsValue> {
    plan_summary_json(schedule_json, ingredients_json).map_err(js_err)
}

fn ingredient_calories_inner(unit: &str, amount: f64, calories: f64) -> Result<f64, String> {
    let unit: MeasureUnit = unit.parse()?;
    let facts = IngredientFacts {
        id: Default::default(),
        name: unit.to_string(),
        unit,
        calories,
        protein_g: 0.0,
        carbs_g: 0.0,
        fat_g: 0.0,
    };
    ingredient_macros(&facts, amount)
        .map(|m| m.calories)
        .map_err(|e| e.to_string())
}

/// Calories for an amount of an ingredient declared in the given unit
#[wasm_bindgen]
pub fn ingredient_calories(unit: &str, amount: f64, calories: f64) -> Result<f64, JsValue> {
    ingredient_calories_inner(unit, amount, calories).map_err(js_err)
}

fn calorie_target_json(
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    is_male: bool,
    activity: &str,
    goal: &str,
) -> Result<String, String> {
    let activity: ActivityLevel = serde_json::from_value(serde_json::Value::String(activity.to_string()))
        .map_err(|_| format!("Unknown activity level: {}", activity))?;
    let goal: PlanGoal = goal.parse()?;
    let profile = BodyProfile {
        weight_kg,
        height_cm,
        age_years,
        is_male,
        activity,
    };
    let target = estimate_target(&profile, goal, &MacroSplit::default()).map_err(|e| e.to_string())?;
    to_json(&target)
}

/// Suggested daily calorie and macro targets
#[wasm_bindgen]
pub fn calorie_target(
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    is_male: bool,
    activity: &str,
    goal: &str,
) -> Result<String, JsValue> {
    calorie_target_json(weight_kg, height_cm, age_years, is_male, activity, goal).map_err(js_err)
}

fn breathing_position_json(pattern: &str, elapsed_seconds: u32) -> Result<String, String> {
    let pattern = match pattern {
        "box" => BreathingPattern::box_breathing(),
        "4-7-8" => BreathingPattern::relaxing_478(),
        other => return Err(format!("Unknown breathing pattern: {}", other)),
    };
    to_json(&pattern.position_at(elapsed_seconds))
}

/// Current step of a named breathing pattern ("box" or "4-7-8")
#[wasm_bindgen]
pub fn breathing_position(pattern: &str, elapsed_seconds: u32) -> Result<String, JsValue> {
    breathing_position_json(pattern, elapsed_seconds).map_err(js_err)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_handle_rejects_bad_plan() {
        assert!(WorkoutSessionHandle::new("[]").is_err());
    }

    #[wasm_bindgen_test]
    fn test_ingredient_calories_binding() {
        assert_eq!(ingredient_calories("g", 100.0, 200.0).unwrap(), 200.0);
        assert!(ingredient_calories("emmer", 1.0, 50.0).is_err());
    }
}
