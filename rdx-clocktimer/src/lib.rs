//! # Clocktimer
//!
//! A wall clock and a single countdown timer, both driven by a one-second
//! cadence on the tokio runtime.
//!
//! ## Core Concepts
//!
//! - **Clock Ticker**: re-reads the system time once per cadence and publishes
//!   it. A manual refresh does the same on demand.
//! - **Timer Engine**: a small state machine (`Idle`, `Running`, `Paused`,
//!   `Completed`) that decrements a countdown once per cadence while running
//!   and fires a completion alert exactly once when it reaches zero.
//! - **Tickers**: every periodic callback is owned by a cancellable handle.
//!   The engine keeps at most one decrement stream alive and cancels it on
//!   pause, reset, completion and shutdown.
//! - **Event-Driven**: snapshots are broadcast on strongly-typed streams
//!   (`ClockEvent`, `TimerEvent`, `SystemEvent`) for the presentation layer.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use clocktimer::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = ClockTimerEngine::new(ClockTimerConfig::default());
//!
//!     let mut timer_events = engine.subscribe_timer_events();
//!     tokio::spawn(async move {
//!         while let Ok(event) = timer_events.recv().await {
//!             println!("Received Timer Event: {:?}", event);
//!         }
//!     });
//!
//!     engine.start_with(TimerConfiguration::new(0, 0, 5)).await?;
//!
//!     // Runs the clock until Ctrl+C.
//!     engine.run().await?;
//!     Ok(())
//! }
//! ```

pub const ENGINE_NAME: &str = "Clocktimer";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod common;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod format;
pub mod time;

/// A prelude module for easy importing of the most common clocktimer types.
pub mod prelude {
    pub use crate::common::{TickerId, TickerKind};
    pub use crate::components::clock::ClockState;
    pub use crate::components::timer::{
        StartOutcome, TimerConfiguration, TimerPhase, TimerSnapshot, TimerState,
    };
    pub use crate::config::ClockTimerConfig;
    pub use crate::engine::ClockTimerEngine;
    pub use crate::error::TimerError;
    pub use crate::events::{ClockEvent, CompletionNotice, SystemEvent, TimerEvent};
}
