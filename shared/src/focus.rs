//! Mind & focus timers: Pomodoro cycles and guided breathing patterns

use crate::errors::FocusError;
use serde::{Deserialize, Serialize};

/// Pomodoro phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroPhase {
    Focus,
    ShortBreak,
    LongBreak,
}

/// Phase durations in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroConfig {
    pub focus_seconds: u32,
    pub short_break_seconds: u32,
    pub long_break_seconds: u32,
    /// Focus rounds before a long break
    pub rounds_before_long_break: u32,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            focus_seconds: 25 * 60,
            short_break_seconds: 5 * 60,
            long_break_seconds: 15 * 60,
            rounds_before_long_break: 4,
        }
    }
}

impl PomodoroConfig {
    pub fn validate(&self) -> Result<(), FocusError> {
        if self.focus_seconds == 0
            || self.short_break_seconds == 0
            || self.long_break_seconds == 0
            || self.rounds_before_long_break == 0
        {
            return Err(FocusError::ZeroDuration);
        }
        Ok(())
    }

    pub fn duration_of(&self, phase: PomodoroPhase) -> u32 {
        match phase {
            PomodoroPhase::Focus => self.focus_seconds,
            PomodoroPhase::ShortBreak => self.short_break_seconds,
            PomodoroPhase::LongBreak => self.long_break_seconds,
        }
    }
}

/// Emitted when a tick ends a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub finished: PomodoroPhase,
    pub next: PomodoroPhase,
}

/// Pomodoro timer driven by one-second ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PomodoroTimerState")]
pub struct PomodoroTimer {
    config: PomodoroConfig,
    phase: PomodoroPhase,
    remaining_seconds: u32,
    completed_focus_rounds: u32,
    running: bool,
}

/// Unchecked wire form of [`PomodoroTimer`]
#[derive(Deserialize)]
struct PomodoroTimerState {
    config: PomodoroConfig,
    phase: PomodoroPhase,
    remaining_seconds: u32,
    completed_focus_rounds: u32,
    running: bool,
}

impl TryFrom<PomodoroTimerState> for PomodoroTimer {
    type Error = FocusError;

    fn try_from(state: PomodoroTimerState) -> Result<Self, Self::Error> {
        state.config.validate()?;
        if state.remaining_seconds == 0 || state.remaining_seconds > state.config.duration_of(state.phase) {
            return Err(FocusError::InvalidState("remaining time outside the phase"));
        }
        Ok(Self {
            config: state.config,
            phase: state.phase,
            remaining_seconds: state.remaining_seconds,
            completed_focus_rounds: state.completed_focus_rounds,
            running: state.running,
        })
    }
}

impl PomodoroTimer {
    pub fn new(config: PomodoroConfig) -> Result<Self, FocusError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: PomodoroPhase::Focus,
            remaining_seconds: config.focus_seconds,
            completed_focus_rounds: 0,
            running: false,
        })
    }

    pub fn phase(&self) -> PomodoroPhase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn completed_focus_rounds(&self) -> u32 {
        self.completed_focus_rounds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) -> Result<(), FocusError> {
        if self.running {
            return Err(FocusError::AlreadyRunning);
        }
        self.running = true;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), FocusError> {
        if !self.running {
            return Err(FocusError::NotRunning);
        }
        self.running = false;
        Ok(())
    }

    /// Back to a fresh, stopped focus phase
    pub fn reset(&mut self) {
        self.phase = PomodoroPhase::Focus;
        self.remaining_seconds = self.config.focus_seconds;
        self.completed_focus_rounds = 0;
        self.running = false;
    }

    /// Advance one second; returns the phase change when the phase ends
    pub fn tick(&mut self) -> Option<PhaseChange> {
        if !self.running {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            Some(self.advance())
        } else {
            None
        }
    }

    /// End the current phase immediately
    pub fn skip(&mut self) -> PhaseChange {
        self.advance()
    }

    fn advance(&mut self) -> PhaseChange {
        let finished = self.phase;
        let next = match finished {
            PomodoroPhase::Focus => {
                self.completed_focus_rounds = self.completed_focus_rounds.saturating_add(1);
                if self.completed_focus_rounds % self.config.rounds_before_long_break == 0 {
                    PomodoroPhase::LongBreak
                } else {
                    PomodoroPhase::ShortBreak
                }
            }
            PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak => PomodoroPhase::Focus,
        };
        self.phase = next;
        self.remaining_seconds = self.config.duration_of(next);
        PhaseChange { finished, next }
    }
}

/// Breathing phase kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreathStep {
    Inhale,
    Hold,
    Exhale,
    HoldEmpty,
}

/// A step of a breathing pattern with its duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathPhase {
    pub step: BreathStep,
    pub seconds: u32,
}

/// Position inside a breathing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathPosition {
    pub cycle: u32,
    pub step: BreathStep,
    pub seconds_remaining: u32,
}

/// Repeating breathing pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BreathingPatternData")]
pub struct BreathingPattern {
    pub name: String,
    phases: Vec<BreathPhase>,
}

/// Unchecked wire form of [`BreathingPattern`]
#[derive(Deserialize)]
struct BreathingPatternData {
    name: String,
    phases: Vec<BreathPhase>,
}

impl TryFrom<BreathingPatternData> for BreathingPattern {
    type Error = FocusError;

    fn try_from(data: BreathingPatternData) -> Result<Self, Self::Error> {
        BreathingPattern::new(data.name, data.phases)
    }
}

impl BreathingPattern {
    pub fn new(name: impl Into<String>, phases: Vec<BreathPhase>) -> Result<Self, FocusError> {
        if phases.is_empty() {
            return Err(FocusError::EmptyPattern);
        }
        if phases.iter().any(|p| p.seconds == 0) {
            return Err(FocusError::ZeroDuration);
        }
        if phases.iter().try_fold(0u32, |acc, p| acc.checked_add(p.seconds)).is_none() {
            return Err(FocusError::InvalidState("cycle is too long"));
        }
        Ok(Self {
            name: name.into(),
            phases,
        })
    }

    /// Box breathing, four seconds per side
    pub fn box_breathing() -> Self {
        Self {
            name: "box".to_string(),
            phases: vec![
                BreathPhase { step: BreathStep::Inhale, seconds: 4 },
                BreathPhase { step: BreathStep::Hold, seconds: 4 },
                BreathPhase { step: BreathStep::Exhale, seconds: 4 },
                BreathPhase { step: BreathStep::HoldEmpty, seconds: 4 },
            ],
        }
    }

    /// 4-7-8 relaxation breathing
    pub fn relaxing_478() -> Self {
        Self {
            name: "4-7-8".to_string(),
            phases: vec![
                BreathPhase { step: BreathStep::Inhale, seconds: 4 },
                BreathPhase { step: BreathStep::Hold, seconds: 7 },
                BreathPhase { step: BreathStep::Exhale, seconds: 8 },
            ],
        }
    }

    pub fn phases(&self) -> &[BreathPhase] {
        &self.phases
    }

    pub fn cycle_seconds(&self) -> u32 {
        self.phases.iter().map(|p| p.seconds).sum()
    }

    /// Where in the pattern the given elapsed second falls
    pub fn position_at(&self, elapsed_seconds: u32) -> BreathPosition {
        let cycle_len = self.cycle_seconds().max(1);
        let cycle = elapsed_seconds / cycle_len;
        let mut offset = elapsed_seconds % cycle_len;

        for phase in &self.phases {
            if offset < phase.seconds {
                return BreathPosition {
                    cycle,
                    step: phase.step,
                    seconds_remaining: phase.seconds - offset,
                };
            }
            offset -= phase.seconds;
        }
        // Patterns always have phases, so the loop returns first
        BreathPosition {
            cycle,
            step: BreathStep::Inhale,
            seconds_remaining: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn short_config() -> PomodoroConfig {
        PomodoroConfig {
            focus_seconds: 3,
            short_break_seconds: 1,
            long_break_seconds: 2,
            rounds_before_long_break: 2,
        }
    }

    #[test]
    fn test_timer_stopped_by_default() {
        let mut timer = PomodoroTimer::new(PomodoroConfig::default()).unwrap();
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_seconds(), 1500);
    }

    #[test]
    fn test_pomodoro_cycle() {
        let mut timer = PomodoroTimer::new(short_config()).unwrap();
        timer.start().unwrap();

        assert_eq!(timer.tick(), None);
        assert_eq!(timer.tick(), None);
        assert_eq!(
            timer.tick(),
            Some(PhaseChange { finished: PomodoroPhase::Focus, next: PomodoroPhase::ShortBreak })
        );
        assert_eq!(
            timer.tick(),
            Some(PhaseChange { finished: PomodoroPhase::ShortBreak, next: PomodoroPhase::Focus })
        );
        let change = timer.skip();
        assert_eq!(change.next, PomodoroPhase::LongBreak);
        assert_eq!(timer.completed_focus_rounds(), 2);
        assert_eq!(timer.remaining_seconds(), 2);
    }

    #[test]
    fn test_start_pause_errors() {
        let mut timer = PomodoroTimer::new(short_config()).unwrap();
        assert_eq!(timer.pause(), Err(FocusError::NotRunning));
        timer.start().unwrap();
        assert_eq!(timer.start(), Err(FocusError::AlreadyRunning));
        timer.reset();
        assert!(!timer.is_running());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let config = PomodoroConfig { focus_seconds: 0, ..PomodoroConfig::default() };
        assert_eq!(PomodoroTimer::new(config), Err(FocusError::ZeroDuration));
    }

    #[test]
    fn test_box_breathing_positions() {
        let pattern = BreathingPattern::box_breathing();
        assert_eq!(pattern.cycle_seconds(), 16);

        let start = pattern.position_at(0);
        assert_eq!(start.step, BreathStep::Inhale);
        assert_eq!(start.seconds_remaining, 4);

        let hold = pattern.position_at(5);
        assert_eq!(hold.step, BreathStep::Hold);
        assert_eq!(hold.seconds_remaining, 3);

        let next_cycle = pattern.position_at(17);
        assert_eq!(next_cycle.cycle, 1);
        assert_eq!(next_cycle.step, BreathStep::Inhale);
    }

    #[test]
    fn test_empty_pattern_rejected() {
        assert_eq!(BreathingPattern::new("x", vec![]), Err(FocusError::EmptyPattern));
    }

    #[test]
    fn test_deserialized_pattern_is_validated() {
        assert!(serde_json::from_str::<BreathingPattern>(r#"{"name":"c","phases":[]}"#).is_err());
        assert!(serde_json::from_str::<BreathingPattern>(
            r#"{"name":"c","phases":[{"step":"inhale","seconds":0}]}"#
        )
        .is_err());

        let json = serde_json::to_string(&BreathingPattern::relaxing_478()).unwrap();
        let pattern: BreathingPattern = serde_json::from_str(&json).unwrap();
        assert_eq!(pattern.position_at(5).step, BreathStep::Hold);
    }

    #[test]
    fn test_deserialized_timer_is_validated() {
        let mut timer = PomodoroTimer::new(short_config()).unwrap();
        timer.start().unwrap();
        timer.tick();
        let mut value = serde_json::to_value(&timer).unwrap();
        let restored: PomodoroTimer = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(restored, timer);

        value["config"]["rounds_before_long_break"] = serde_json::json!(0);
        assert!(serde_json::from_value::<PomodoroTimer>(value.clone()).is_err());

        value["config"]["rounds_before_long_break"] = serde_json::json!(2);
        value["remaining_seconds"] = serde_json::json!(0);
        assert!(serde_json::from_value::<PomodoroTimer>(value).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: remaining seconds never exceed the phase duration
        #[test]
        fn prop_breath_position_in_bounds(elapsed in 0u32..100_000) {
            let pattern = BreathingPattern::relaxing_478();
            let pos = pattern.position_at(elapsed);
            let phase = pattern.phases().iter().find(|p| p.step == pos.step).unwrap();
            prop_assert!(pos.seconds_remaining >= 1 && pos.seconds_remaining <= phase.seconds);
            prop_assert_eq!(pos.cycle, elapsed / 19);
        }
    }
}
