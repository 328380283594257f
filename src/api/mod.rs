//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timer/start", post(start_handler))
        .route("/timer/stop", post(stop_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/resume", post(resume_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/timer/next", post(next_handler))
        .route("/break/start", post(break_start_handler))
        .route("/break/skip", post(break_skip_handler))
        .route("/pointer", post(pointer_handler))
        .route("/preferences", get(get_preferences_handler).put(put_preferences_handler))
        .route("/status", get(status_handler))
        .route("/status-line", get(status_line_handler))
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::state::Preferences;

    fn app() -> (Arc<AppState>, Router) {
        let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), Preferences::default()));
        (Arc::clone(&state), create_router(state))
    }

    async fn call(router: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = router.oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (_, router) = app();
        let (status, body) = call(router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn timer_control_flow() {
        let (state, router) = app();

        let (status, body) = call(router.clone(), Method::POST, "/timer/start", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["phase"], "running");

        let (_, body) = call(router.clone(), Method::POST, "/timer/pause", None).await;
        assert_eq!(body["timer"]["phase"], "paused_manually");

        let (_, body) = call(router.clone(), Method::POST, "/timer/pause", None).await;
        assert_eq!(body["timer"]["phase"], "running");

        let (_, body) = call(router.clone(), Method::POST, "/timer/stop", None).await;
        assert_eq!(body["timer"]["phase"], "stopped");
        assert_eq!(body["timer"]["remaining_seconds"], 1200);

        let (_, body) = call(router, Method::GET, "/status", None).await;
        assert_eq!(body["status_line"]["title"], "20:00");
        assert_eq!(body["last_action"], "stop");
        state.shutdown();
    }

    #[tokio::test]
    async fn status_line_honours_screen_width() {
        let (_, router) = app();
        let (status, body) = call(router, Method::GET, "/status-line?screen_width=420", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "short");
        assert_eq!(body["title"], "20:00");
    }

    #[tokio::test]
    async fn pointer_reports_are_accepted() {
        let (state, router) = app();
        let (status, _) = call(
            router,
            Method::POST,
            "/pointer",
            Some(serde_json::json!({ "x": 12.5, "y": 40.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        use crate::services::PointerSource;
        assert_eq!(state.reported_pointer.position().x, 12.5);
    }

    #[tokio::test]
    async fn invalid_preferences_are_rejected() {
        let (state, router) = app();
        let (status, body) = call(
            router.clone(),
            Method::PUT,
            "/preferences",
            Some(serde_json::json!({ "work_time_mins": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");

        let (status, body) = call(
            router,
            Method::PUT,
            "/preferences",
            Some(serde_json::json!({ "work_time_mins": 25, "break_message": "Stretch" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["preferences"]["work_time_mins"], 25);
        assert_eq!(state.get_timer_snapshot().unwrap().remaining_seconds, 25 * 60);
    }

    #[tokio::test]
    async fn break_start_and_skip() {
        let (state, router) = app();
        let (_, body) = call(router.clone(), Method::POST, "/break/start", None).await;
        assert_eq!(body["break_session"]["message"], "Take a Break.!");
        assert_eq!(body["break_session"]["remaining_seconds"], 20);

        let (_, body) = call(router.clone(), Method::POST, "/break/skip", None).await;
        assert_eq!(body["message"], "Break skipped");

        let (_, body) = call(router, Method::POST, "/break/skip", None).await;
        assert_eq!(body["message"], "No active break");
        assert!(state.get_break_session().unwrap().is_none());
    }
}
