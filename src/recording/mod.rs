//! Audio recording state machine
//!
//! `idle → recording` acquires a capture handle and starts accumulating
//! frames; `recording → idle` releases it and hands back a `PendingClip`
//! whose encoding runs independently of the state change.

mod session;

pub use session::{BackendOpener, PendingClip, RecordingSession, RecordingState};
