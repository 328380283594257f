//! Break countdown task

use std::{
    ops::ControlFlow,
    sync::{Arc, Weak},
    time::Duration,
};

use super::PeriodicTask;
use crate::state::AppState;

const BREAK_TICK: Duration = Duration::from_secs(1);

pub fn spawn_break_ticker(state: &Arc<AppState>, break_id: u64) -> PeriodicTask {
    let state: Weak<AppState> = Arc::downgrade(state);

    PeriodicTask::spawn("break", BREAK_TICK, move || match state.upgrade() {
        Some(state) => state.tick_break(break_id),
        None => ControlFlow::Break(()),
    })
}
