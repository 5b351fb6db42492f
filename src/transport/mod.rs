//! Broker transports
//!
//! `NatsTransport` talks to a real NATS server; `MemoryBroker` is an
//! in-process broker with the same subject semantics, used for tests and
//! offline demos.

pub mod memory;
pub mod nats;
pub mod subject;

pub use memory::{MemoryBroker, MemoryTransport};
pub use nats::NatsTransport;
pub use subject::{sender_from_subject, subject_matches};

use crate::error::ChatError;

/// Pub/sub transport used by a chat session.
///
/// Connecting is implementation specific (each transport has its own
/// `connect` taking the session's event sender). Inbound messages and
/// connection changes are delivered as [`crate::Event`]s on that sender.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Subscribe to a subject pattern; matching messages arrive as
    /// `Event::MessageReceived`
    async fn subscribe(&self, pattern: &str) -> Result<(), ChatError>;

    /// Publish a payload and wait for the broker to take it
    async fn publish(&self, topic: &str, payload: String) -> Result<(), ChatError>;

    /// Release the connection and stop delivering events
    async fn close(&self) -> Result<(), ChatError>;

    /// Transport name for logging
    fn name(&self) -> &str;
}
