//! Pacing for the room lane.
//!
//! The waits are part of the protocol UX: they run as cooperative sleeps on
//! the room's lane, so queued client messages are not applied until the
//! pause ends. Tests use [`Pacing::zero`] to run the same flow with no wall
//! time.

use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    /// Delay fronting each AI decision.
    pub ai_think: Duration,
    /// Hold after a trick completes, before the winner is announced.
    pub trick_display: Duration,
    /// Gap between the winner announcement and the next trick.
    pub trick_gap: Duration,
}

impl Pacing {
    pub fn standard() -> Self {
        Self {
            ai_think: Duration::from_millis(700),
            trick_display: Duration::from_secs(2),
            trick_gap: Duration::from_secs(1),
        }
    }

    pub fn zero() -> Self {
        Self {
            ai_think: Duration::ZERO,
            trick_display: Duration::ZERO,
            trick_gap: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::standard()
    }
}
