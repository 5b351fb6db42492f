use thiserror::Error;

/// Failures surfaced by the chat core.
///
/// None of these terminate a session: each is reported where it happens
/// and the session stays usable for the next operation.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Broker unreachable or handshake failed. Not retried by the core.
    #[error("failed to connect to broker at {url}: {reason}")]
    Connection { url: String, reason: String },

    /// Subscription rejected; the client carries on unsubscribed.
    #[error("failed to subscribe to {pattern}: {reason}")]
    Subscription { pattern: String, reason: String },

    /// Publish rejected; nothing is appended to the log.
    #[error("failed to publish to {topic}: {reason}")]
    Publish { topic: String, reason: String },

    /// Capture device denied or unavailable.
    #[error("audio capture unavailable: {0}")]
    Permission(String),

    /// Binary to data URI conversion failed; the item is dropped.
    #[error("failed to encode media: {0}")]
    Encode(String),

    /// The session loop has exited and no longer accepts commands.
    #[error("chat session is closed")]
    SessionClosed,
}

impl ChatError {
    pub fn connection(url: &str, reason: impl ToString) -> Self {
        ChatError::Connection {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn subscription(pattern: &str, reason: impl ToString) -> Self {
        ChatError::Subscription {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn publish(topic: &str, reason: impl ToString) -> Self {
        ChatError::Publish {
            topic: topic.to_string(),
            reason: reason.to_string(),
        }
    }
}
