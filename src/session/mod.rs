//! Chat session management
//!
//! This module provides the `ChatSession` abstraction that owns:
//! - The broker transport and its subscription
//! - The message log and echo fingerprint
//! - The composer (draft text and image attachment)
//! - The audio recording state machine
//!
//! `ChatHandle` is the cloneable front door used by the HTTP API and the
//! terminal UI.

mod config;
mod handle;
mod session;
mod stats;

pub use config::SessionConfig;
pub use handle::ChatHandle;
pub use session::ChatSession;
pub use stats::{SessionStatus, SubmitReceipt};
