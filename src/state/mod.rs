//! State management module
//!
//! This module contains the timer, idle, break and preference state along with
//! the application state that owns them.

pub mod app_state;
pub mod break_state;
pub mod idle_state;
pub mod preferences;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use break_state::BreakSession;
pub use idle_state::{IdleState, IdleTransition, PointerPosition, IDLE_THRESHOLD};
pub use preferences::Preferences;
pub use timer_state::{CountdownTimer, TimerEvent, TimerPhase, TimerSnapshot};
