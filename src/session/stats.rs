use serde::{Deserialize, Serialize};

/// Snapshot of a chat session's state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Our own sender id
    pub client_id: String,

    /// Whether the broker connection is up
    pub connected: bool,

    /// Whether an audio recording is in progress
    pub recording: bool,

    /// Number of records in the message log
    pub messages: usize,

    /// Publishes confirmed by the broker
    pub acknowledged: usize,

    /// Inbound messages dropped as echoes of our own publishes
    pub echoes_suppressed: usize,
}

/// Result of a send request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    /// The draft text was published and appended
    pub text_published: bool,

    /// An attached image is being encoded for publishing
    pub image_queued: bool,
}
