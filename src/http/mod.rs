//! HTTP API for an external chat UI
//!
//! - GET /messages - Message log in display order
//! - POST /messages - Send text and/or an image
//! - POST /recording/start - Start an audio recording
//! - POST /recording/stop - Stop and send the recording
//! - GET /status - Session status
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
