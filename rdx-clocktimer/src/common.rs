//! Contains common, primitive types shared across the crate.
//!
//! Repeating callbacks owned by the engine are tracked in a `SlotMap`, so the
//! identifiers handed out for them are slotmap keys rather than plain integers.

use slotmap::new_key_type;

new_key_type! {
    /// Uniquely and safely identifies a repeating ticker scheduled by the engine.
    ///
    /// Keys are never reused, so a stale id held by a subscriber can never
    /// cancel a newer ticker by accident.
    pub struct TickerId;
}

/// Names the two periodic processes the engine can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickerKind {
    /// Republishes the wall clock.
    Clock,
    /// Decrements the active countdown.
    Timer,
}

impl std::fmt::Display for TickerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TickerKind::Clock => write!(f, "clock"),
            TickerKind::Timer => write!(f, "timer"),
        }
    }
}
