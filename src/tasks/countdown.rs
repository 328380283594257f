//! Work session tick task

use std::{
    ops::ControlFlow,
    sync::{Arc, Weak},
    time::Duration,
};

use tracing::debug;

use super::PeriodicTask;
use crate::state::AppState;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Tick the countdown once per second for run `run_id` until it stops running
pub fn spawn_countdown_ticker(state: &Arc<AppState>, run_id: u64) -> PeriodicTask {
    debug!("Spawning countdown ticker for run {}", run_id);
    let state: Weak<AppState> = Arc::downgrade(state);

    PeriodicTask::spawn("countdown", TICK_PERIOD, move || match state.upgrade() {
        Some(state) => state.tick_countdown(run_id),
        None => ControlFlow::Break(()),
    })
}
