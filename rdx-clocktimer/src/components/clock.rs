//! The wall clock ticker.

use chrono::{DateTime, Local, SubsecRound};

/// The most recently published wall-clock reading, at whole-second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockState {
    pub current_time: DateTime<Local>,
}

impl ClockState {
    pub fn at(time: DateTime<Local>) -> Self {
        Self {
            current_time: time.trunc_subsecs(0),
        }
    }

    pub fn now() -> Self {
        Self::at(Local::now())
    }
}

/// Keeps a continuously refreshed read of the system clock.
///
/// The time source is injectable so tests can pin the clock.
pub struct ClockTicker {
    state: ClockState,
    source: Box<dyn Fn() -> DateTime<Local> + Send + Sync>,
}

impl ClockTicker {
    /// A ticker reading the local system clock.
    pub fn new() -> Self {
        Self::with_source(Local::now)
    }

    pub fn with_source(source: impl Fn() -> DateTime<Local> + Send + Sync + 'static) -> Self {
        let state = ClockState::at(source());
        Self {
            state,
            source: Box::new(source),
        }
    }

    /// Replaces the published time with the current reading.
    pub fn tick(&mut self) -> ClockState {
        self.state = ClockState::at((self.source)());
        self.state
    }

    /// User-requested refresh; identical to a tick.
    pub fn manual_refresh(&mut self) -> ClockState {
        self.tick()
    }

    pub fn state(&self) -> ClockState {
        self.state
    }
}

impl Default for ClockTicker {
    fn default() -> Self {
        Self::new()
    }
}
