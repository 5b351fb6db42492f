use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::subject::subject_matches;
use super::Transport;
use crate::error::ChatError;
use crate::event::{Event, EventSender};

/// In-process broker with NATS subject semantics.
///
/// Every publish is delivered to all matching subscriptions, including the
/// publisher's own, so echo behaviour matches a real broadcast broker.
/// Faults can be injected to exercise the error paths.
#[derive(Clone, Default)]
pub struct MemoryBroker {
    inner: Arc<BrokerInner>,
}

#[derive(Default)]
struct BrokerInner {
    subscriptions: Mutex<Vec<Subscription>>,
    published: Mutex<Vec<(String, String)>>,
    next_client: AtomicU64,
    offline: AtomicBool,
    reject_publishes: AtomicBool,
    reject_subscriptions: AtomicBool,
}

struct Subscription {
    client: u64,
    pattern: String,
    events: EventSender,
}

impl MemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a client connection; fails while the broker is offline
    pub fn connect(&self, events: EventSender) -> Result<MemoryTransport, ChatError> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(ChatError::connection("memory://", "broker is offline"));
        }

        let client = self.inner.next_client.fetch_add(1, Ordering::SeqCst);
        let _ = events.send(Event::Connected);

        info!("Memory broker client {} connected", client);

        Ok(MemoryTransport {
            broker: self.clone(),
            client,
            events,
        })
    }

    /// Deliver a payload as if a peer had published it
    ///
    /// Returns the number of subscriptions that received it.
    pub fn inject(&self, topic: &str, payload: &str) -> usize {
        self.deliver(topic, payload)
    }

    /// Take the broker down (or bring it back).
    ///
    /// Connected clients get `Event::Disconnected` / `Event::Connected`.
    pub fn set_offline(&self, offline: bool) {
        let was_offline = self.inner.offline.swap(offline, Ordering::SeqCst);
        if was_offline == offline {
            return;
        }

        let event = || {
            if offline {
                Event::Disconnected
            } else {
                Event::Connected
            }
        };

        if let Ok(subscriptions) = self.inner.subscriptions.lock() {
            let mut notified = Vec::new();
            for sub in subscriptions.iter() {
                if !notified.contains(&sub.client) {
                    notified.push(sub.client);
                    let _ = sub.events.send(event());
                }
            }
        }
    }

    /// Reject every publish with a `PublishError`
    pub fn reject_publishes(&self, reject: bool) {
        self.inner.reject_publishes.store(reject, Ordering::SeqCst);
    }

    /// Reject every subscribe with a `SubscriptionError`
    pub fn reject_subscriptions(&self, reject: bool) {
        self.inner.reject_subscriptions.store(reject, Ordering::SeqCst);
    }

    /// Every accepted publish as `(topic, payload)`, in order
    pub fn published(&self) -> Vec<(String, String)> {
        self.inner
            .published
            .lock()
            .map(|published| published.clone())
            .unwrap_or_default()
    }

    /// Number of live subscriptions across all clients
    pub fn subscription_count(&self) -> usize {
        self.inner
            .subscriptions
            .lock()
            .map(|subs| subs.len())
            .unwrap_or_default()
    }

    fn deliver(&self, topic: &str, payload: &str) -> usize {
        let Ok(mut subscriptions) = self.inner.subscriptions.lock() else {
            return 0;
        };

        // Drop subscriptions whose session has gone away
        subscriptions.retain(|sub| !sub.events.is_closed());

        let mut delivered = 0;
        for sub in subscriptions.iter() {
            if !subject_matches(&sub.pattern, topic) {
                continue;
            }
            let event = Event::MessageReceived {
                topic: topic.to_string(),
                payload: payload.to_string(),
            };
            if sub.events.send(event).is_ok() {
                delivered += 1;
            }
        }

        debug!("Delivered {} to {} subscription(s)", topic, delivered);

        delivered
    }
}

/// A client connection to a [`MemoryBroker`]
pub struct MemoryTransport {
    broker: MemoryBroker,
    client: u64,
    events: EventSender,
}

impl MemoryTransport {
    pub fn broker(&self) -> &MemoryBroker {
        &self.broker
    }

    fn remove_subscriptions(&self) {
        if let Ok(mut subscriptions) = self.broker.inner.subscriptions.lock() {
            subscriptions.retain(|sub| sub.client != self.client);
        }
    }
}

#[async_trait::async_trait]
impl Transport for MemoryTransport {
    async fn subscribe(&self, pattern: &str) -> Result<(), ChatError> {
        let inner = &self.broker.inner;

        if inner.offline.load(Ordering::SeqCst) {
            return Err(ChatError::subscription(pattern, "broker is offline"));
        }
        if inner.reject_subscriptions.load(Ordering::SeqCst) {
            return Err(ChatError::subscription(pattern, "subscription rejected"));
        }

        let mut subscriptions = inner
            .subscriptions
            .lock()
            .map_err(|_| ChatError::subscription(pattern, "broker state poisoned"))?;
        subscriptions.push(Subscription {
            client: self.client,
            pattern: pattern.to_string(),
            events: self.events.clone(),
        });

        info!("Memory broker client {} subscribed to {}", self.client, pattern);

        Ok(())
    }

    async fn publish(&self, topic: &str, payload: String) -> Result<(), ChatError> {
        let inner = &self.broker.inner;

        if inner.offline.load(Ordering::SeqCst) {
            return Err(ChatError::publish(topic, "broker is offline"));
        }
        if inner.reject_publishes.load(Ordering::SeqCst) {
            return Err(ChatError::publish(topic, "publish rejected"));
        }

        if let Ok(mut published) = inner.published.lock() {
            published.push((topic.to_string(), payload.clone()));
        }

        self.broker.deliver(topic, &payload);

        let _ = self.events.send(Event::PublishAck {
            topic: topic.to_string(),
        });

        Ok(())
    }

    async fn close(&self) -> Result<(), ChatError> {
        info!("Memory broker client {} closing", self.client);
        self.remove_subscriptions();
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl Drop for MemoryTransport {
    fn drop(&mut self) {
        self.remove_subscriptions();
    }
}
