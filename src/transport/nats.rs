use async_nats::{Client, ConnectOptions};
use futures::stream::StreamExt;
use std::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::Transport;
use crate::error::ChatError;
use crate::event::{Event, EventSender};

/// NATS-backed transport
pub struct NatsTransport {
    client: Client,
    url: String,
    events: EventSender,
    forwarders: Mutex<Vec<JoinHandle<()>>>,
}

impl NatsTransport {
    /// Connect to NATS server
    ///
    /// Connection state changes are forwarded to `events` as
    /// `Event::Connected` / `Event::Disconnected`.
    pub async fn connect(url: &str, events: EventSender) -> Result<Self, ChatError> {
        info!("Connecting to NATS at {}", url);

        let callback_events = events.clone();
        let client = ConnectOptions::new()
            .event_callback(move |event| {
                let events = callback_events.clone();
                async move {
                    match event {
                        async_nats::Event::Connected => {
                            let _ = events.send(Event::Connected);
                        }
                        async_nats::Event::Disconnected => {
                            let _ = events.send(Event::Disconnected);
                        }
                        other => warn!("NATS event: {:?}", other),
                    }
                }
            })
            .connect(url)
            .await
            .map_err(|e| ChatError::connection(url, e))?;

        info!("Connected to NATS successfully");

        // The initial connect is not guaranteed to go through the callback
        let _ = events.send(Event::Connected);

        Ok(Self {
            client,
            url: url.to_string(),
            events,
            forwarders: Mutex::new(Vec::new()),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn abort_forwarders(&self) {
        if let Ok(mut forwarders) = self.forwarders.lock() {
            for task in forwarders.drain(..) {
                task.abort();
            }
        }
    }
}

#[async_trait::async_trait]
impl Transport for NatsTransport {
    async fn subscribe(&self, pattern: &str) -> Result<(), ChatError> {
        info!("Subscribing to {}", pattern);

        let mut subscriber = self
            .client
            .subscribe(pattern.to_string())
            .await
            .map_err(|e| ChatError::subscription(pattern, e))?;

        let events = self.events.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(msg) = subscriber.next().await {
                let event = Event::MessageReceived {
                    topic: msg.subject.to_string(),
                    payload: String::from_utf8_lossy(&msg.payload).into_owned(),
                };
                if events.send(event).is_err() {
                    break;
                }
            }
        });

        if let Ok(mut forwarders) = self.forwarders.lock() {
            forwarders.push(forwarder);
        }

        info!("Subscribed to {}", pattern);

        Ok(())
    }

    async fn publish(&self, topic: &str, payload: String) -> Result<(), ChatError> {
        let bytes = payload.len();

        self.client
            .publish(topic.to_string(), payload.into_bytes().into())
            .await
            .map_err(|e| ChatError::publish(topic, e))?;

        // Flush so a dead connection surfaces here instead of silently
        // buffering the message
        self.client
            .flush()
            .await
            .map_err(|e| ChatError::publish(topic, e))?;

        info!("Published to {} ({} bytes)", topic, bytes);

        let _ = self.events.send(Event::PublishAck {
            topic: topic.to_string(),
        });

        Ok(())
    }

    async fn close(&self) -> Result<(), ChatError> {
        info!("Closing NATS connection");
        self.abort_forwarders();
        // async-nats tears the connection down when the client is dropped
        Ok(())
    }

    fn name(&self) -> &str {
        "nats"
    }
}

impl Drop for NatsTransport {
    fn drop(&mut self) {
        self.abort_forwarders();
    }
}
