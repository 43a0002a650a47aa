//! The countdown timer state machine.
//!
//! `TimerEngine` is a plain owned value with explicit transition methods. It
//! knows nothing about scheduling: the controller calls [`TimerEngine::tick`]
//! once per cadence and reacts to the returned [`TickOutcome`], which is how
//! the completion side effect is guaranteed to fire exactly once.

use crate::error::TimerError;
use tracing::{debug, trace};

pub const MAX_HOURS: u32 = 23;
pub const MAX_MINUTES: u32 = 59;
pub const MAX_SECONDS: u32 = 59;

/// The user-entered duration, each component clamped to its range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerConfiguration {
    hours: u32,
    minutes: u32,
    seconds: u32,
}

impl TimerConfiguration {
    /// Builds a configuration, clamping each component independently.
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours: hours.min(MAX_HOURS),
            minutes: minutes.min(MAX_MINUTES),
            seconds: seconds.min(MAX_SECONDS),
        }
    }

    /// Builds a configuration from raw text fields.
    ///
    /// Each field is coerced with [`coerce_field`]; malformed input becomes 0.
    pub fn from_inputs(hours: &str, minutes: &str, seconds: &str) -> Self {
        Self {
            hours: coerce_field(hours, MAX_HOURS),
            minutes: coerce_field(minutes, MAX_MINUTES),
            seconds: coerce_field(seconds, MAX_SECONDS),
        }
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

/// Parses the leading integer of `input` and clamps it to `0..=max`.
///
/// Surrounding whitespace and a sign are accepted; trailing garbage after the
/// digits is ignored (`"12abc"` is 12). Anything without a leading digit is 0,
/// as are negative values.
pub fn coerce_field(input: &str, max: u32) -> u32 {
    let trimmed = input.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() || negative {
        return 0;
    }
    // Anything too long for a u64 is certainly above the range.
    digits
        .parse::<u64>()
        .map(|value| value.min(u64::from(max)) as u32)
        .unwrap_or(max)
}

/// The observable phase of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    /// No countdown exists; the configuration form is shown.
    Idle,
    Running,
    Paused,
    /// The countdown reached zero and has not been reset yet.
    Completed,
}

impl std::fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Completed => "completed",
        };
        f.write_str(label)
    }
}

/// Raw countdown counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerState {
    pub duration_seconds: u64,
    pub remaining_seconds: u64,
    pub is_running: bool,
}

impl TimerState {
    /// Elapsed share of the countdown in `[0, 100]`; 0 when nothing was started.
    pub fn progress_percent(&self) -> f64 {
        if self.duration_seconds == 0 {
            return 0.0;
        }
        let elapsed = self.duration_seconds - self.remaining_seconds;
        elapsed as f64 / self.duration_seconds as f64 * 100.0
    }
}

/// What a call to [`TimerEngine::start`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new countdown began from the configuration.
    Started,
    /// A paused countdown continued from its frozen value.
    Resumed,
    /// The countdown was already running; nothing changed.
    AlreadyRunning,
}

/// What a call to [`TimerEngine::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer was not running.
    Ignored,
    /// One second elapsed and time remains.
    Decremented,
    /// This tick reached zero. Returned at most once per countdown.
    Completed,
}

/// A point-in-time copy of the timer handed to observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub state: TimerState,
    pub configuration: TimerConfiguration,
    pub progress_percent: f64,
}

/// Owns a single countdown and its configuration.
#[derive(Debug, Clone, Default)]
pub struct TimerEngine {
    state: TimerState,
    configuration: TimerConfiguration,
    completed: bool,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TimerPhase {
        if self.state.is_running {
            TimerPhase::Running
        } else if self.state.remaining_seconds > 0 {
            TimerPhase::Paused
        } else if self.completed {
            TimerPhase::Completed
        } else {
            TimerPhase::Idle
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn configuration(&self) -> TimerConfiguration {
        self.configuration
    }

    /// True while no countdown is active and the configuration may be edited.
    pub fn accepts_configuration(&self) -> bool {
        matches!(self.phase(), TimerPhase::Idle | TimerPhase::Completed)
    }

    /// Replaces the configuration. Ignored once a countdown has started.
    ///
    /// Returns `true` if the configuration was accepted.
    pub fn configure(&mut self, configuration: TimerConfiguration) -> bool {
        if !self.accepts_configuration() {
            debug!(phase = %self.phase(), "Configuration ignored while a countdown is active.");
            return false;
        }
        self.configuration = configuration;
        true
    }

    /// Starts a fresh countdown from the stored configuration, or resumes a paused one.
    ///
    /// A fresh start with a zero total is rejected without touching any state.
    pub fn start(&mut self) -> Result<StartOutcome, TimerError> {
        match self.phase() {
            TimerPhase::Running => Ok(StartOutcome::AlreadyRunning),
            TimerPhase::Paused => {
                self.state.is_running = true;
                debug!(remaining = self.state.remaining_seconds, "Countdown resumed.");
                Ok(StartOutcome::Resumed)
            }
            TimerPhase::Idle | TimerPhase::Completed => {
                let total = self.configuration.total_seconds();
                if total == 0 {
                    return Err(TimerError::InvalidDuration);
                }
                self.state = TimerState {
                    duration_seconds: total,
                    remaining_seconds: total,
                    is_running: true,
                };
                self.completed = false;
                debug!(duration = total, "Countdown started.");
                Ok(StartOutcome::Started)
            }
        }
    }

    /// Freezes a running countdown. Returns `false` if it was not running.
    pub fn pause(&mut self) -> bool {
        if self.phase() != TimerPhase::Running {
            return false;
        }
        self.state.is_running = false;
        debug!(remaining = self.state.remaining_seconds, "Countdown paused.");
        true
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running {
            return TickOutcome::Ignored;
        }
        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        trace!(remaining = self.state.remaining_seconds, "Countdown tick.");
        if self.state.remaining_seconds == 0 {
            self.state.is_running = false;
            self.completed = true;
            TickOutcome::Completed
        } else {
            TickOutcome::Decremented
        }
    }

    /// Returns to `Idle` and zeroes the configuration. Always succeeds.
    pub fn reset(&mut self) {
        self.state = TimerState::default();
        self.configuration = TimerConfiguration::default();
        self.completed = false;
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase(),
            state: self.state,
            configuration: self.configuration,
            progress_percent: self.state.progress_percent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(h: u32, m: u32, s: u32) -> TimerEngine {
        let mut engine = TimerEngine::new();
        assert!(engine.configure(TimerConfiguration::new(h, m, s)));
        assert_eq!(engine.start(), Ok(StartOutcome::Started));
        engine
    }

    fn tick_n(engine: &mut TimerEngine, n: usize) -> Vec<TickOutcome> {
        (0..n).map(|_| engine.tick()).collect()
    }

    #[test]
    fn start_sets_duration_and_remaining_for_every_hour_boundary() {
        for (h, m, s) in [(0, 0, 1), (0, 1, 0), (1, 0, 0), (23, 59, 59), (2, 30, 15)] {
            let engine = started(h, m, s);
            let expected = u64::from(h) * 3600 + u64::from(m) * 60 + u64::from(s);
            let state = engine.state();
            assert_eq!(engine.phase(), TimerPhase::Running);
            assert_eq!(state.duration_seconds, expected);
            assert_eq!(state.remaining_seconds, expected);
            assert!(state.is_running);
        }
    }

    #[test]
    fn zero_duration_is_rejected_without_state_change() {
        let mut engine = TimerEngine::new();
        assert_eq!(engine.start(), Err(TimerError::InvalidDuration));
        assert_eq!(engine.phase(), TimerPhase::Idle);
        assert_eq!(engine.state(), TimerState::default());
    }

    #[test]
    fn five_second_countdown_reports_progress_and_completes_once() {
        let mut engine = started(0, 0, 5);
        assert_eq!(engine.snapshot().progress_percent, 0.0);

        tick_n(&mut engine, 3);
        assert_eq!(engine.state().remaining_seconds, 2);
        assert!((engine.snapshot().progress_percent - 60.0).abs() < f64::EPSILON);

        let outcomes = tick_n(&mut engine, 2);
        assert_eq!(outcomes, vec![TickOutcome::Decremented, TickOutcome::Completed]);
        assert_eq!(engine.state().remaining_seconds, 0);
        assert!(!engine.state().is_running);
        assert_eq!(engine.phase(), TimerPhase::Completed);
        assert_eq!(engine.snapshot().progress_percent, 100.0);
    }

    #[test]
    fn ticks_after_completion_are_no_ops() {
        let mut engine = started(0, 0, 2);
        let outcomes = tick_n(&mut engine, 6);
        let completions = outcomes
            .iter()
            .filter(|o| **o == TickOutcome::Completed)
            .count();
        assert_eq!(completions, 1);
        assert_eq!(&outcomes[2..], &[TickOutcome::Ignored; 4]);
        assert_eq!(engine.state().remaining_seconds, 0);
    }

    #[test]
    fn pause_freezes_and_resume_continues_from_the_frozen_value() {
        let mut engine = started(0, 0, 10);
        tick_n(&mut engine, 4);
        assert!(engine.pause());
        assert_eq!(engine.phase(), TimerPhase::Paused);

        assert_eq!(tick_n(&mut engine, 3), vec![TickOutcome::Ignored; 3]);
        assert_eq!(engine.state().remaining_seconds, 6);

        assert_eq!(engine.start(), Ok(StartOutcome::Resumed));
        let outcomes = tick_n(&mut engine, 6);
        assert_eq!(outcomes.last(), Some(&TickOutcome::Completed));
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| **o == TickOutcome::Completed)
                .count(),
            1
        );
        // Duration stays fixed across the pause.
        assert_eq!(engine.state().duration_seconds, 10);
    }

    #[test]
    fn pause_is_a_no_op_outside_running() {
        let mut engine = TimerEngine::new();
        assert!(!engine.pause());

        let mut engine = started(0, 0, 3);
        assert!(engine.pause());
        assert!(!engine.pause());
        assert_eq!(engine.state().remaining_seconds, 3);
    }

    #[test]
    fn start_while_running_does_not_restart() {
        let mut engine = started(0, 0, 5);
        engine.tick();
        assert_eq!(engine.start(), Ok(StartOutcome::AlreadyRunning));
        assert_eq!(engine.state().remaining_seconds, 4);
    }

    #[test]
    fn reset_returns_to_idle_from_every_phase() {
        let mut running = started(0, 1, 0);
        let mut paused = started(0, 1, 0);
        paused.pause();
        let mut completed = started(0, 0, 1);
        completed.tick();
        let mut idle = TimerEngine::new();
        idle.configure(TimerConfiguration::new(1, 2, 3));

        for engine in [&mut running, &mut paused, &mut completed, &mut idle] {
            engine.reset();
            assert_eq!(engine.phase(), TimerPhase::Idle);
            assert_eq!(engine.state(), TimerState::default());
            assert_eq!(engine.configuration(), TimerConfiguration::default());
        }
    }

    #[test]
    fn configuration_is_locked_while_a_countdown_exists() {
        let mut engine = started(0, 0, 30);
        assert!(!engine.configure(TimerConfiguration::new(1, 0, 0)));
        engine.pause();
        assert!(!engine.configure(TimerConfiguration::new(1, 0, 0)));
        assert_eq!(engine.configuration(), TimerConfiguration::new(0, 0, 30));
    }

    #[test]
    fn completed_timer_restarts_from_configuration() {
        let mut engine = started(0, 0, 1);
        assert_eq!(engine.tick(), TickOutcome::Completed);
        assert!(engine.accepts_configuration());
        assert_eq!(engine.start(), Ok(StartOutcome::Started));
        assert_eq!(engine.state().remaining_seconds, 1);
        assert_eq!(engine.phase(), TimerPhase::Running);
    }

    #[test]
    fn configuration_components_are_clamped() {
        let config = TimerConfiguration::new(99, 75, 60);
        assert_eq!((config.hours(), config.minutes(), config.seconds()), (23, 59, 59));
    }

    #[test]
    fn text_fields_are_coerced_leniently() {
        assert_eq!(coerce_field("12", MAX_MINUTES), 12);
        assert_eq!(coerce_field("  7 ", MAX_MINUTES), 7);
        assert_eq!(coerce_field("12abc", MAX_MINUTES), 12);
        assert_eq!(coerce_field("+5", MAX_MINUTES), 5);
        assert_eq!(coerce_field("-3", MAX_MINUTES), 0);
        assert_eq!(coerce_field("abc", MAX_MINUTES), 0);
        assert_eq!(coerce_field("", MAX_MINUTES), 0);
        assert_eq!(coerce_field("1.9", MAX_MINUTES), 1);
        assert_eq!(coerce_field("300", MAX_HOURS), 23);
        assert_eq!(coerce_field("99999999999999999999999", MAX_SECONDS), 59);

        let config = TimerConfiguration::from_inputs("x", "2", "30s");
        assert_eq!(config.total_seconds(), 150);
    }
}
