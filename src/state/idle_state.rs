//! Pointer inactivity tracking

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Pointer has to stay still this long before the user counts as idle
pub const IDLE_THRESHOLD: Duration = Duration::from_secs(30);

/// Screen coordinate of the pointer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Outcome of a single poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleTransition {
    Unchanged,
    BecameIdle,
    BecameActive,
}

/// Idle bookkeeping for the pointer poller
#[derive(Debug, Clone)]
pub struct IdleState {
    last_position: PointerPosition,
    last_activity: Instant,
    idle: bool,
}

impl IdleState {
    pub fn new(position: PointerPosition, now: Instant) -> Self {
        Self {
            last_position: position,
            last_activity: now,
            idle: false,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.idle
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    /// Feed one pointer sample taken at `now`
    pub fn poll(&mut self, position: PointerPosition, now: Instant) -> IdleTransition {
        if position != self.last_position {
            self.last_position = position;
            self.last_activity = now;

            if self.idle {
                self.idle = false;
                return IdleTransition::BecameActive;
            }
            return IdleTransition::Unchanged;
        }

        let inactive_for = now.saturating_duration_since(self.last_activity);
        if inactive_for >= IDLE_THRESHOLD && !self.idle {
            self.idle = true;
            return IdleTransition::BecameIdle;
        }
        IdleTransition::Unchanged
    }

    /// Forget any idleness, as if the pointer just moved to `position`.
    ///
    /// Used when monitoring is switched on or off; a pending idle pause must be released.
    pub fn reset(&mut self, position: PointerPosition, now: Instant) -> IdleTransition {
        self.last_position = position;
        self.last_activity = now;

        if self.idle {
            self.idle = false;
            IdleTransition::BecameActive
        } else {
            IdleTransition::Unchanged
        }
    }
}
