//! pomobar - a headless work/break timer daemon
//!
//! This is the main entry point for the pomobar daemon.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use pomobar::{
    api::create_router,
    config::Config,
    services::autostart,
    state::{AppState, Preferences},
    tasks::finish_handler_task,
    utils::{init_logging, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(config.log_level());

    info!("Starting pomobar v{}", env!("CARGO_PKG_VERSION"));

    let preferences_path = config.preferences_path();
    let preferences = match &preferences_path {
        Some(path) => Preferences::load(path)?,
        None => {
            warn!("No config directory found, preferences will not be persisted");
            Preferences::default()
        }
    };
    info!(
        "Configuration: host={}, port={}, work={}min, break={}s, idle pause={}",
        config.host,
        config.port,
        preferences.work_time_mins,
        preferences.break_time_seconds,
        preferences.pause_at_mouse_idle
    );

    let pause_at_mouse_idle = preferences.pause_at_mouse_idle;
    let state = Arc::new(
        AppState::new(config.port, config.host.clone(), preferences)
            .with_preferences_path(preferences_path)
            .with_autostart_path(autostart::default_entry_path())
            .with_screen_width(config.screen_width)
            .with_alert_commands(config.alert_commands()),
    );

    // Start handling finished sessions before the first tick can happen
    let events = state.subscribe_events();
    tokio::spawn(finish_handler_task(Arc::clone(&state), events));

    if pause_at_mouse_idle {
        state.set_idle_monitoring(true).map_err(anyhow::Error::msg)?;
    }

    if !config.no_start {
        state.start_timer().map_err(anyhow::Error::msg)?;
    }

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/{{start,stop,pause,resume,reset,next}}");
    info!("  POST /break/{{start,skip}}");
    info!("  POST /pointer        - Report pointer position for idle detection");
    info!("  GET  /status         - Timer, break and status line");
    info!("  GET  /status-line    - Rendered status item (?screen_width=)");
    info!("  GET|PUT /preferences - Read or update preferences");
    info!("  GET  /health         - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
