/// Payload of the most recent local publish.
///
/// A broad subscription receives our own publishes back from the broker.
/// There is no message id on the wire, so the payload itself is the dedup
/// key: a peer sending exactly the same content as our last message is
/// indistinguishable from an echo and gets dropped too.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EchoFingerprint {
    last_sent: Option<String>,
}

impl EchoFingerprint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the fingerprint, returning the previous one
    pub fn set(&mut self, payload: impl Into<String>) -> Option<String> {
        self.last_sent.replace(payload.into())
    }

    /// Put back a fingerprint saved by [`EchoFingerprint::set`]
    pub fn restore(&mut self, previous: Option<String>) {
        self.last_sent = previous;
    }

    pub fn get(&self) -> Option<&str> {
        self.last_sent.as_deref()
    }

    pub fn matches(&self, payload: &str) -> bool {
        should_suppress(payload, self)
    }
}

/// True iff `payload` is exactly the last published payload
pub fn should_suppress(payload: &str, fingerprint: &EchoFingerprint) -> bool {
    fingerprint.get() == Some(payload)
}
