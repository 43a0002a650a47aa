//! Defines all public event types broadcast by the clocktimer engine.
//!
//! The presentation layer subscribes to these strongly-typed streams to
//! receive clock and timer snapshots without polling.

use crate::common::{TickerId, TickerKind};
use crate::components::clock::ClockState;
use crate::components::timer::TimerSnapshot;
use tokio::time::Instant;

/// Events related to the lifecycle of the engine and its tickers.
#[derive(Debug, Clone)]
pub enum SystemEvent {
    /// Fired once when the engine's `run` loop begins.
    EngineStarted { timestamp: Instant },
    /// Fired once after teardown cancelled every ticker.
    EngineShutdown,
    /// Fired when a repeating ticker is scheduled.
    TickerScheduled { id: TickerId, kind: TickerKind },
    /// Fired when a repeating ticker is cancelled or finishes.
    TickerCancelled { id: TickerId, kind: TickerKind },
}

/// Wall-clock updates.
#[derive(Debug, Clone, Copy)]
pub enum ClockEvent {
    /// Published by the clock ticker once per cadence.
    Tick(ClockState),
    /// Published after a user-requested refresh.
    Refreshed(ClockState),
}

impl ClockEvent {
    pub fn state(&self) -> ClockState {
        match self {
            ClockEvent::Tick(state) | ClockEvent::Refreshed(state) => *state,
        }
    }
}

/// Countdown transitions, each carrying the snapshot taken right after it.
#[derive(Debug, Clone)]
pub enum TimerEvent {
    Started(TimerSnapshot),
    Resumed(TimerSnapshot),
    Paused(TimerSnapshot),
    Tick(TimerSnapshot),
    /// Fired exactly once per countdown, on the tick that reached zero.
    Completed(TimerSnapshot),
    Reset(TimerSnapshot),
    /// A start was refused; carries the user-facing warning.
    Rejected(RejectionNotice),
    /// The completion notice raised by the notifier.
    Notice(CompletionNotice),
}

/// The "timer complete" message handed to the notification sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionNotice {
    pub title: String,
    pub message: String,
}

/// The warning shown when a start is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionNotice {
    pub title: String,
    pub message: String,
}
