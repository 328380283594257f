//! Pointer idle poller

use std::{
    ops::ControlFlow,
    sync::{Arc, Weak},
    time::Duration,
};

use tracing::debug;

use super::PeriodicTask;
use crate::state::AppState;

pub const POLL_PERIOD: Duration = Duration::from_secs(1);

/// Sample the pointer once per second while idle monitoring stays enabled
pub fn spawn_idle_poller(state: &Arc<AppState>) -> PeriodicTask {
    debug!("Spawning idle poller");
    let state: Weak<AppState> = Arc::downgrade(state);

    PeriodicTask::spawn("idle", POLL_PERIOD, move || match state.upgrade() {
        Some(state) => state.poll_idle(),
        None => ControlFlow::Break(()),
    })
}
