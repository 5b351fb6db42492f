use super::state::AppState;
use crate::error::ChatError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Text to send (replaces the current draft)
    pub text: Option<String>,

    /// Path of an image file to attach
    pub image_path: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct RecordingResponse {
    pub recording: bool,
}

#[derive(Debug, Serialize)]
pub struct StopRecordingResponse {
    pub stopped: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(err: ChatError) -> Response {
    let status = match err {
        ChatError::SessionClosed => StatusCode::SERVICE_UNAVAILABLE,
        ChatError::Permission(_) => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /messages
/// Message log in display order
pub async fn list_messages(State(state): State<AppState>) -> Response {
    match state.chat.snapshot().await {
        Ok(messages) => (StatusCode::OK, Json(messages)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /messages
/// Send text and/or an image
pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Response {
    match state.chat.submit(req.text, req.image_path).await {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(e) => {
            error!("Failed to submit message: {}", e);
            error_response(e)
        }
    }
}

/// POST /recording/start
pub async fn start_recording(State(state): State<AppState>) -> Response {
    info!("Recording start requested");

    match state.chat.start_recording().await {
        Ok(()) => (StatusCode::OK, Json(RecordingResponse { recording: true })).into_response(),
        Err(e) => {
            error!("Failed to start recording: {}", e);
            error_response(e)
        }
    }
}

/// POST /recording/stop
pub async fn stop_recording(State(state): State<AppState>) -> Response {
    info!("Recording stop requested");

    match state.chat.stop_recording().await {
        Ok(stopped) => (StatusCode::OK, Json(StopRecordingResponse { stopped })).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /status
pub async fn get_status(State(state): State<AppState>) -> Response {
    match state.chat.status().await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
