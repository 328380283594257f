//! Work session completion handling

use std::sync::Arc;

use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::{error, info, warn};

use crate::{
    services::alert_session_finished,
    state::{AppState, TimerEvent},
};

/// Background task that reacts to finished work sessions: starts the break and alerts the user
pub async fn finish_handler_task(state: Arc<AppState>, mut events: Receiver<TimerEvent>) {
    info!("Starting finish handler task");

    loop {
        match events.recv().await {
            Ok(TimerEvent::Finished) => {
                if let Err(e) = state.begin_break() {
                    error!("Failed to start break: {}", e);
                }

                let play_sound = match state.get_preferences() {
                    Ok(prefs) => prefs.play_sound_at_end,
                    Err(e) => {
                        warn!("Failed to read preferences: {}", e);
                        false
                    }
                };
                alert_session_finished(&state.alerts, play_sound).await;
            }
            Ok(TimerEvent::Updated { .. }) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!("Finish handler lagged behind by {} timer events", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Timer event channel closed, stopping finish handler");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{services::AlertCommands, state::Preferences};

    #[tokio::test(start_paused = true)]
    async fn finished_session_starts_a_break() {
        let prefs = Preferences {
            work_time_mins: 1,
            break_time_seconds: 10,
            ..Preferences::default()
        };
        let state = Arc::new(
            AppState::new(0, "127.0.0.1".to_string(), prefs).with_alert_commands(AlertCommands {
                notify: "pomobar-no-such-notifier".to_string(),
                sound: "pomobar-no-such-player".to_string(),
            }),
        );
        let handler = tokio::spawn(finish_handler_task(Arc::clone(&state), state.subscribe_events()));

        state.start_timer().unwrap();
        tokio::time::sleep(Duration::from_millis(59_500)).await;
        assert!(state.get_break_session().unwrap().is_none());

        tokio::time::sleep(Duration::from_secs(1)).await;
        let session = state.get_break_session().unwrap().expect("break should be active");
        assert_eq!(session.message, "Take a Break.!");

        handler.abort();
    }
}
