//! Background tasks module
//!
//! This module contains the periodic tasks driving the countdown, the idle
//! poller and breaks, plus the task reacting to finished work sessions.

pub mod break_timer;
pub mod countdown;
pub mod finish_handler;
pub mod idle_monitor;
pub mod periodic;

// Re-export main functions
pub use break_timer::spawn_break_ticker;
pub use countdown::spawn_countdown_ticker;
pub use finish_handler::finish_handler_task;
pub use idle_monitor::spawn_idle_poller;
pub use periodic::PeriodicTask;
