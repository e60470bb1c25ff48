//! Workout session state machine
//!
//! A session walks through a plan of exercises set by set. A timer drives
//! [`WorkoutSession::tick`] once per second; user actions complete sets,
//! skip rest periods and pause or resume the session.
//!
//! All mutable progress lives in a [`SessionSnapshot`], which is what gets
//! persisted remotely and restored when a member resumes a session.

use crate::errors::WorkoutError;
use serde::{Deserialize, Serialize};

/// One exercise in a workout plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExercisePlan {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    /// Rest after each completed set, in seconds
    #[serde(default)]
    pub rest_seconds: u32,
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Running,
    Paused,
    Completed,
}

/// Result of a timer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Session is paused or completed, nothing changed
    Idle,
    /// Workout clock advanced
    Running,
    /// Rest countdown advanced, `remaining` seconds left
    Resting { remaining: u32 },
    /// Rest countdown reached zero on this tick
    RestFinished,
}

/// Result of completing a set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    /// Next set of the same exercise, rest started when `rest_seconds > 0`
    NextSet { set: u32, rest_seconds: u32 },
    /// Moved on to the next exercise
    NextExercise { exercise_index: usize, rest_seconds: u32 },
    /// Last set of the last exercise, the session is now completed
    Completed(WorkoutSummary),
}

/// Serializable session progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub elapsed_seconds: u32,
    pub current_exercise: usize,
    /// 1-based set number of the current exercise
    pub current_set: u32,
    pub rest_remaining: Option<u32>,
    pub status: SessionStatus,
    /// Completed set count per exercise
    pub completed_sets: Vec<u32>,
}

/// Per-exercise result in a summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseSummary {
    pub name: String,
    pub sets_planned: u32,
    pub sets_completed: u32,
    pub reps_completed: u32,
}

/// Summary shown when a session ends and stored with the session record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub duration_seconds: u32,
    pub exercises_completed: u32,
    pub sets_completed: u32,
    pub total_reps: u32,
    pub exercises: Vec<ExerciseSummary>,
}

/// A running workout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutSession {
    plan: Vec<ExercisePlan>,
    state: SessionSnapshot,
}

pub const MAX_EXERCISES: usize = 50;
pub const MAX_SETS: u32 = 100;
pub const MAX_REPS: u32 = 1000;
pub const MAX_REST_SECONDS: u32 = 3600;
/// Longest session a snapshot may report (24 hours)
pub const MAX_SESSION_SECONDS: u32 = 24 * 60 * 60;

fn validate_plan(plan: &[ExercisePlan]) -> Result<(), WorkoutError> {
    if plan.is_empty() {
        return Err(WorkoutError::EmptyPlan);
    }
    if plan.len() > MAX_EXERCISES {
        return Err(WorkoutError::TooManyExercises(MAX_EXERCISES));
    }
    if let Some(exercise) = plan.iter().find(|e| e.sets == 0) {
        return Err(WorkoutError::NoSets(exercise.name.clone()));
    }
    if let Some(exercise) = plan
        .iter()
        .find(|e| e.sets > MAX_SETS || e.reps > MAX_REPS || e.rest_seconds > MAX_REST_SECONDS)
    {
        return Err(WorkoutError::ExerciseTooLarge(
            exercise.name.clone(),
            MAX_SETS,
            MAX_REPS,
            MAX_REST_SECONDS,
        ));
    }
    Ok(())
}

impl WorkoutSession {
    /// Start a new running session at the first set of the first exercise
    pub fn new(plan: Vec<ExercisePlan>) -> Result<Self, WorkoutError> {
        validate_plan(&plan)?;
        let completed_sets = vec![0; plan.len()];
        Ok(Self {
            plan,
            state: SessionSnapshot {
                elapsed_seconds: 0,
                current_exercise: 0,
                current_set: 1,
                rest_remaining: None,
                status: SessionStatus::Running,
                completed_sets,
            },
        })
    }

    /// Rebuild a session from persisted progress
    pub fn restore(plan: Vec<ExercisePlan>, snapshot: SessionSnapshot) -> Result<Self, WorkoutError> {
        validate_plan(&plan)?;
        let invalid = |msg: &str| Err(WorkoutError::InvalidSnapshot(msg.to_string()));

        if snapshot.completed_sets.len() != plan.len() {
            return invalid("completed set counts do not match exercise count");
        }
        if snapshot.current_exercise >= plan.len() {
            return invalid("current exercise out of range");
        }
        if snapshot.elapsed_seconds > MAX_SESSION_SECONDS {
            return invalid("elapsed time exceeds 24 hours");
        }
        if snapshot.rest_remaining.is_some_and(|rest| rest > MAX_REST_SECONDS) {
            return invalid("rest countdown out of range");
        }
        let current = &plan[snapshot.current_exercise];
        if snapshot.current_set == 0 || snapshot.current_set > current.sets {
            return invalid("current set out of range");
        }

        for (idx, (done, exercise)) in snapshot.completed_sets.iter().zip(&plan).enumerate() {
            let expected = match snapshot.status {
                SessionStatus::Completed => exercise.sets,
                _ if idx < snapshot.current_exercise => exercise.sets,
                _ if idx == snapshot.current_exercise => snapshot.current_set - 1,
                _ => 0,
            };
            if *done != expected {
                return invalid("completed sets are inconsistent with the current position");
            }
        }

        if snapshot.status == SessionStatus::Completed {
            if snapshot.rest_remaining.is_some() {
                return invalid("completed session cannot be resting");
            }
            if snapshot.current_exercise != plan.len() - 1 || snapshot.current_set != current.sets {
                return invalid("completed session must end on the last set");
            }
        }

        Ok(Self {
            plan,
            state: snapshot,
        })
    }

    pub fn plan(&self) -> &[ExercisePlan] {
        &self.plan
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.state.elapsed_seconds
    }

    pub fn rest_remaining(&self) -> Option<u32> {
        self.state.rest_remaining
    }

    pub fn current_set(&self) -> u32 {
        self.state.current_set
    }

    pub fn current_exercise_index(&self) -> usize {
        self.state.current_exercise
    }

    pub fn current_exercise(&self) -> &ExercisePlan {
        &self.plan[self.state.current_exercise]
    }

    pub fn is_completed(&self) -> bool {
        self.state.status == SessionStatus::Completed
    }

    /// Completed sets as a percentage of all planned sets
    pub fn progress_percent(&self) -> f64 {
        let planned: u64 = self.plan.iter().map(|e| u64::from(e.sets)).sum();
        let done: u64 = self.state.completed_sets.iter().map(|&d| u64::from(d)).sum();
        done as f64 / planned as f64 * 100.0
    }

    /// Advance the clock by one second
    pub fn tick(&mut self) -> Tick {
        if self.state.status != SessionStatus::Running {
            return Tick::Idle;
        }
        self.state.elapsed_seconds = self.state.elapsed_seconds.saturating_add(1);

        match self.state.rest_remaining {
            Some(remaining) if remaining <= 1 => {
                self.state.rest_remaining = None;
                Tick::RestFinished
            }
            Some(remaining) => {
                self.state.rest_remaining = Some(remaining - 1);
                Tick::Resting {
                    remaining: remaining - 1,
                }
            }
            None => Tick::Running,
        }
    }

    /// Mark the current set as done and move to the next position
    pub fn complete_set(&mut self) -> Result<SetOutcome, WorkoutError> {
        match self.state.status {
            SessionStatus::Completed => return Err(WorkoutError::AlreadyCompleted),
            SessionStatus::Paused => return Err(WorkoutError::NotRunning),
            SessionStatus::Running => {}
        }
        if self.state.rest_remaining.is_some() {
            return Err(WorkoutError::Resting);
        }

        let idx = self.state.current_exercise;
        let exercise = &self.plan[idx];
        let rest_seconds = exercise.rest_seconds;
        self.state.completed_sets[idx] += 1;

        if self.state.current_set < exercise.sets {
            self.state.current_set += 1;
            self.start_rest(rest_seconds);
            return Ok(SetOutcome::NextSet {
                set: self.state.current_set,
                rest_seconds,
            });
        }

        if idx + 1 < self.plan.len() {
            self.state.current_exercise = idx + 1;
            self.state.current_set = 1;
            self.start_rest(rest_seconds);
            return Ok(SetOutcome::NextExercise {
                exercise_index: idx + 1,
                rest_seconds,
            });
        }

        self.state.status = SessionStatus::Completed;
        self.state.rest_remaining = None;
        Ok(SetOutcome::Completed(self.summary()))
    }

    /// End the current rest period early
    pub fn skip_rest(&mut self) -> Result<(), WorkoutError> {
        if self.is_completed() {
            return Err(WorkoutError::AlreadyCompleted);
        }
        if self.state.rest_remaining.take().is_none() {
            return Err(WorkoutError::NotResting);
        }
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), WorkoutError> {
        match self.state.status {
            SessionStatus::Completed => Err(WorkoutError::AlreadyCompleted),
            SessionStatus::Paused => Err(WorkoutError::AlreadyPaused),
            SessionStatus::Running => {
                self.state.status = SessionStatus::Paused;
                Ok(())
            }
        }
    }

    pub fn resume(&mut self) -> Result<(), WorkoutError> {
        match self.state.status {
            SessionStatus::Completed => Err(WorkoutError::AlreadyCompleted),
            SessionStatus::Running => Err(WorkoutError::NotPaused),
            SessionStatus::Paused => {
                self.state.status = SessionStatus::Running;
                Ok(())
            }
        }
    }

    /// Summary of the work done so far
    pub fn summary(&self) -> WorkoutSummary {
        let exercises: Vec<ExerciseSummary> = self
            .plan
            .iter()
            .zip(&self.state.completed_sets)
            .map(|(exercise, done)| ExerciseSummary {
                name: exercise.name.clone(),
                sets_planned: exercise.sets,
                sets_completed: *done,
                reps_completed: done.saturating_mul(exercise.reps),
            })
            .collect();

        WorkoutSummary {
            duration_seconds: self.state.elapsed_seconds,
            exercises_completed: exercises
                .iter()
                .filter(|e| e.sets_completed == e.sets_planned)
                .count() as u32,
            sets_completed: exercises
                .iter()
                .fold(0u32, |acc, e| acc.saturating_add(e.sets_completed)),
            total_reps: exercises
                .iter()
                .fold(0u32, |acc, e| acc.saturating_add(e.reps_completed)),
            exercises,
        }
    }

    fn start_rest(&mut self, seconds: u32) {
        self.state.rest_remaining = (seconds > 0).then_some(seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn exercise(name: &str, sets: u32, reps: u32, rest_seconds: u32) -> ExercisePlan {
        ExercisePlan {
            name: name.to_string(),
            sets,
            reps,
            rest_seconds,
        }
    }

    fn two_exercise_plan() -> Vec<ExercisePlan> {
        vec![exercise("Squat", 2, 5, 3), exercise("Bench", 1, 8, 0)]
    }

    #[test]
    fn test_new_rejects_empty_plan() {
        assert_eq!(WorkoutSession::new(vec![]), Err(WorkoutError::EmptyPlan));
        assert_eq!(
            WorkoutSession::new(vec![exercise("Plank", 0, 1, 0)]),
            Err(WorkoutError::NoSets("Plank".to_string()))
        );
    }

    #[test]
    fn test_new_rejects_oversized_exercises() {
        assert!(matches!(
            WorkoutSession::new(vec![exercise("Curl", 2, u32::MAX, 0)]),
            Err(WorkoutError::ExerciseTooLarge(name, ..)) if name == "Curl"
        ));
        assert!(matches!(
            WorkoutSession::new(vec![exercise("Row", MAX_SETS + 1, 10, 0)]),
            Err(WorkoutError::ExerciseTooLarge(..))
        ));
        assert!(matches!(
            WorkoutSession::new(vec![exercise("Row", 3, 10, MAX_REST_SECONDS + 1)]),
            Err(WorkoutError::ExerciseTooLarge(..))
        ));

        let long_plan: Vec<_> = (0..=MAX_EXERCISES)
            .map(|i| exercise(&format!("ex{}", i), 1, 1, 0))
            .collect();
        assert_eq!(
            WorkoutSession::new(long_plan),
            Err(WorkoutError::TooManyExercises(MAX_EXERCISES))
        );
    }

    #[test]
    fn test_largest_plan_completes_without_overflow() {
        let plan: Vec<_> = (0..MAX_EXERCISES)
            .map(|i| exercise(&format!("ex{}", i), MAX_SETS, MAX_REPS, 0))
            .collect();
        let mut session = WorkoutSession::new(plan).unwrap();
        let summary = loop {
            if let SetOutcome::Completed(summary) = session.complete_set().unwrap() {
                break summary;
            }
        };
        assert_eq!(summary.sets_completed, 5_000);
        assert_eq!(summary.total_reps, 5_000_000);
        assert_eq!(session.progress_percent(), 100.0);
    }

    #[test]
    fn test_restore_rejects_implausible_duration() {
        let snapshot = SessionSnapshot {
            elapsed_seconds: 3_000_000_000,
            current_exercise: 1,
            current_set: 1,
            rest_remaining: None,
            status: SessionStatus::Completed,
            completed_sets: vec![2, 1],
        };
        assert!(matches!(
            WorkoutSession::restore(two_exercise_plan(), snapshot),
            Err(WorkoutError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn test_full_session_flow() {
        let mut session = WorkoutSession::new(two_exercise_plan()).unwrap();
        assert_eq!(session.tick(), Tick::Running);

        assert_eq!(
            session.complete_set().unwrap(),
            SetOutcome::NextSet { set: 2, rest_seconds: 3 }
        );
        assert_eq!(session.complete_set(), Err(WorkoutError::Resting));

        assert_eq!(session.tick(), Tick::Resting { remaining: 2 });
        assert_eq!(session.tick(), Tick::Resting { remaining: 1 });
        assert_eq!(session.tick(), Tick::RestFinished);
        assert_eq!(session.rest_remaining(), None);

        assert_eq!(
            session.complete_set().unwrap(),
            SetOutcome::NextExercise { exercise_index: 1, rest_seconds: 3 }
        );
        session.skip_rest().unwrap();
        assert_eq!(session.current_exercise().name, "Bench");

        match session.complete_set().unwrap() {
            SetOutcome::Completed(summary) => {
                assert_eq!(summary.duration_seconds, 4);
                assert_eq!(summary.sets_completed, 3);
                assert_eq!(summary.exercises_completed, 2);
                assert_eq!(summary.total_reps, 18);
            }
            other => panic!("expected completion, got {:?}", other),
        }
        assert!(session.is_completed());
    }

    #[test]
    fn test_completion_happens_exactly_once() {
        let mut session = WorkoutSession::new(vec![exercise("Pull-up", 1, 10, 60)]).unwrap();
        let mut completions = 0;
        for _ in 0..3 {
            if let Ok(SetOutcome::Completed(_)) = session.complete_set() {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(session.complete_set(), Err(WorkoutError::AlreadyCompleted));
        assert_eq!(session.rest_remaining(), None);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut session = WorkoutSession::new(two_exercise_plan()).unwrap();
        session.pause().unwrap();
        assert_eq!(session.pause(), Err(WorkoutError::AlreadyPaused));
        assert_eq!(session.tick(), Tick::Idle);
        assert_eq!(session.elapsed_seconds(), 0);
        assert_eq!(session.complete_set(), Err(WorkoutError::NotRunning));

        session.resume().unwrap();
        assert_eq!(session.resume(), Err(WorkoutError::NotPaused));
        session.tick();
        assert_eq!(session.elapsed_seconds(), 1);
    }

    #[test]
    fn test_paused_rest_does_not_count_down() {
        let mut session = WorkoutSession::new(two_exercise_plan()).unwrap();
        session.complete_set().unwrap();
        session.pause().unwrap();
        session.tick();
        assert_eq!(session.rest_remaining(), Some(3));
    }

    #[test]
    fn test_skip_rest_without_rest() {
        let mut session = WorkoutSession::new(two_exercise_plan()).unwrap();
        assert_eq!(session.skip_rest(), Err(WorkoutError::NotResting));
    }

    #[test]
    fn test_completed_session_ignores_controls() {
        let mut session = WorkoutSession::new(vec![exercise("Dip", 1, 12, 0)]).unwrap();
        session.complete_set().unwrap();
        assert_eq!(session.tick(), Tick::Idle);
        assert_eq!(session.pause(), Err(WorkoutError::AlreadyCompleted));
        assert_eq!(session.resume(), Err(WorkoutError::AlreadyCompleted));
        assert_eq!(session.skip_rest(), Err(WorkoutError::AlreadyCompleted));
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut session = WorkoutSession::new(two_exercise_plan()).unwrap();
        session.complete_set().unwrap();
        session.tick();

        let json = serde_json::to_string(session.snapshot()).unwrap();
        let snapshot: SessionSnapshot = serde_json::from_str(&json).unwrap();
        let restored = WorkoutSession::restore(two_exercise_plan(), snapshot).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn test_restore_rejects_inconsistent_snapshot() {
        let snapshot = SessionSnapshot {
            elapsed_seconds: 10,
            current_exercise: 1,
            current_set: 1,
            rest_remaining: None,
            status: SessionStatus::Running,
            completed_sets: vec![1, 0],
        };
        assert!(matches!(
            WorkoutSession::restore(two_exercise_plan(), snapshot),
            Err(WorkoutError::InvalidSnapshot(_))
        ));

        let out_of_range = SessionSnapshot {
            elapsed_seconds: 0,
            current_exercise: 5,
            current_set: 1,
            rest_remaining: None,
            status: SessionStatus::Running,
            completed_sets: vec![0, 0],
        };
        assert!(WorkoutSession::restore(two_exercise_plan(), out_of_range).is_err());
    }

    #[test]
    fn test_restore_completed_snapshot() {
        let snapshot = SessionSnapshot {
            elapsed_seconds: 300,
            current_exercise: 1,
            current_set: 1,
            rest_remaining: None,
            status: SessionStatus::Completed,
            completed_sets: vec![2, 1],
        };
        let session = WorkoutSession::restore(two_exercise_plan(), snapshot).unwrap();
        assert!(session.is_completed());
        assert_eq!(session.summary().sets_completed, 3);
        assert_eq!(session.progress_percent(), 100.0);
    }

    fn plan_strategy() -> impl Strategy<Value = Vec<ExercisePlan>> {
        proptest::collection::vec((1u32..6, 1u32..20, 0u32..5), 1..6).prop_map(|items| {
            items
                .into_iter()
                .enumerate()
                .map(|(i, (sets, reps, rest))| exercise(&format!("ex{}", i), sets, reps, rest))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: driving a session to the end completes exactly once
        /// and accounts for every planned set
        #[test]
        fn prop_session_completes_once(plan in plan_strategy()) {
            let total_sets: u32 = plan.iter().map(|e| e.sets).sum();
            let mut session = WorkoutSession::new(plan.clone()).unwrap();
            let mut completions = 0;

            for _ in 0..(total_sets * 10) {
                if session.rest_remaining().is_some() {
                    session.tick();
                    continue;
                }
                match session.complete_set() {
                    Ok(SetOutcome::Completed(summary)) => {
                        completions += 1;
                        prop_assert_eq!(summary.sets_completed, total_sets);
                        prop_assert_eq!(summary.exercises_completed, plan.len() as u32);
                    }
                    Ok(_) => {}
                    Err(WorkoutError::AlreadyCompleted) => break,
                    Err(e) => prop_assert!(false, "unexpected error {:?}", e),
                }
            }

            prop_assert_eq!(completions, 1);
            prop_assert!(session.is_completed());
        }

        /// Property: every intermediate snapshot restores to an equal session
        #[test]
        fn prop_snapshots_restore(plan in plan_strategy(), steps in 0usize..20) {
            let mut session = WorkoutSession::new(plan.clone()).unwrap();
            for _ in 0..steps {
                if session.skip_rest().is_err() && session.complete_set().is_err() {
                    break;
                }
                let restored = WorkoutSession::restore(plan.clone(), session.snapshot().clone());
                prop_assert_eq!(restored.as_ref(), Ok(&session));
            }
        }
    }
}
