use chrono::Local;
use serde::Serialize;

use super::classify::{classify, MessageKind};

/// A single reconciled chat message.
///
/// Fields are read-only once built: `kind` always matches the prefix of
/// `payload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRecord {
    /// Sender id (subject segment for inbound, own client id for outbound)
    sender: String,

    /// Payload encoding, fixed at creation
    kind: MessageKind,

    /// Raw text, or a base64 data URI for image/audio
    payload: String,

    /// Local capture time, e.g. "03:07 PM"
    timestamp: String,

    /// Whether this client published the message
    outgoing: bool,
}

impl MessageRecord {
    /// Record a message received from a peer
    pub fn incoming(sender: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::new(sender.into(), payload.into(), false)
    }

    /// Record a message this client published
    pub fn outgoing(sender: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::new(sender.into(), payload.into(), true)
    }

    fn new(sender: String, payload: String, outgoing: bool) -> Self {
        Self {
            sender,
            kind: classify(&payload),
            payload,
            timestamp: Local::now().format("%I:%M %p").to_string(),
            outgoing,
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn outgoing(&self) -> bool {
        self.outgoing
    }
}
