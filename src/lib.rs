//! pomobar - a headless work/break timer daemon
//!
//! This library provides the countdown state machine, pointer idle detection,
//! adaptive status bar rendering and the HTTP API that exposes them to status
//! bar widgets.

pub mod api;
pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
