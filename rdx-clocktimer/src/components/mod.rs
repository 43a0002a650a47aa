//! Contains the building blocks the engine composes.
//!
//! The clock ticker and the countdown state machine are plain owned values
//! with explicit transition methods; the alert module holds the completion
//! side effects. The `ClockTimerEngine` wraps each in a lock and drives them
//! from repeating tickers.

pub mod alert;
pub mod clock;
pub mod timer;
