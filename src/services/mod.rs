//! External collaborators module
//!
//! This module contains the status bar renderer, pointer sources, and the
//! notification and launch-at-login integrations.

pub mod autostart;
pub mod notifications;
pub mod pointer;
pub mod status_bar;

// Re-export main types
pub use notifications::{alert_session_finished, AlertCommands};
pub use pointer::{PointerSource, ReportedPointer};
pub use status_bar::{DisplayMode, StatusLine, WidthMetrics};
