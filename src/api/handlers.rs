//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use super::responses::{
    ApiResponse, BreakResponse, ErrorResponse, HealthResponse, PreferencesResponse,
    StatusResponse,
};
use crate::{
    services::StatusLine,
    state::{AppState, PointerPosition, Preferences, TimerSnapshot},
};

fn timer_response(
    result: Result<TimerSnapshot, String>,
    message: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(snapshot) => {
            info!("{} ({:?})", message, snapshot.phase);
            Ok(Json(ApiResponse::ok(message.to_string(), snapshot)))
        }
        Err(e) => {
            error!("{} failed: {}", message, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timer/start
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    timer_response(state.start_timer(), "Timer started")
}

/// Handle POST /timer/stop
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    timer_response(state.stop_timer(), "Timer stopped")
}

/// Handle POST /timer/pause - toggles between paused and running
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    timer_response(state.toggle_pause(), "Timer pause toggled")
}

/// Handle POST /timer/resume
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    timer_response(state.resume_timer(), "Timer resumed")
}

/// Handle POST /timer/reset
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    timer_response(state.reset_timer(), "Timer reset")
}

/// Handle POST /timer/next - break now, then a fresh work session
pub async fn next_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    timer_response(state.next_session(), "Next session started")
}

/// Handle POST /break/start
pub async fn break_start_handler(State(state): State<Arc<AppState>>) -> Result<Json<BreakResponse>, StatusCode> {
    match state.begin_break() {
        Ok(session) => Ok(Json(BreakResponse::new("Break started".to_string(), Some(session)))),
        Err(e) => {
            error!("Failed to start break: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /break/skip
pub async fn break_skip_handler(State(state): State<Arc<AppState>>) -> Result<Json<BreakResponse>, StatusCode> {
    match state.skip_break() {
        Ok(true) => Ok(Json(BreakResponse::new("Break skipped".to_string(), None))),
        Ok(false) => Ok(Json(BreakResponse::new("No active break".to_string(), None))),
        Err(e) => {
            error!("Failed to skip break: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /pointer - record the current pointer position
pub async fn pointer_handler(
    State(state): State<Arc<AppState>>,
    Json(position): Json<PointerPosition>,
) -> StatusCode {
    debug!("Pointer reported at ({}, {})", position.x, position.y);
    state.reported_pointer.report(position);
    StatusCode::NO_CONTENT
}

#[derive(Debug, Deserialize)]
pub struct StatusLineQuery {
    pub screen_width: Option<f64>,
}

/// Handle GET /status-line
pub async fn status_line_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusLineQuery>,
) -> Result<Json<StatusLine>, StatusCode> {
    state.status_line(query.screen_width)
        .map(Json)
        .map_err(|e| {
            error!("Failed to render status line: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Handle GET /status - Return current daemon status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_timer_snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let status_line = match state.status_line(None) {
        Ok(line) => line,
        Err(e) => {
            error!("Failed to render status line: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let break_session = match state.get_break_session() {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to get break state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        progress: timer.progress(),
        timer,
        status_line,
        break_session,
        idle: state.is_idle(),
        idle_monitoring: state.idle_monitoring_enabled(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /preferences
pub async fn get_preferences_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PreferencesResponse>, StatusCode> {
    match state.get_preferences() {
        Ok(preferences) => Ok(Json(PreferencesResponse {
            status: "ok".to_string(),
            message: None,
            preferences,
        })),
        Err(e) => {
            error!("Failed to read preferences: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle PUT /preferences - validate, apply and persist
pub async fn put_preferences_handler(
    State(state): State<Arc<AppState>>,
    Json(preferences): Json<Preferences>,
) -> Result<Json<PreferencesResponse>, (StatusCode, Json<ErrorResponse>)> {
    if let Err(e) = preferences.validate() {
        warn!("Rejected preferences: {}", e);
        return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))));
    }

    match state.update_preferences(preferences).await {
        Ok(preferences) => {
            info!("Preferences updated");
            Ok(Json(PreferencesResponse {
                status: "ok".to_string(),
                message: Some("Preferences updated".to_string()),
                preferences,
            }))
        }
        Err(e) => {
            error!("Failed to update preferences: {:#}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(format!("{:#}", e))),
            ))
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
