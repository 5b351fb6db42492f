use serde::{Deserialize, Serialize};

use crate::audio::AudioBackendConfig;
use crate::config::Config;

/// Configuration for a chat session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Our own sender id (e.g., "mugil")
    pub client_id: String,

    /// NATS server URL
    pub broker_url: String,

    /// Wildcard subject we listen on
    pub sub_topic: String,

    /// Subject we publish to
    pub pub_topic: String,

    /// Sample rate of recorded clips
    pub sample_rate: u32,

    /// Number of audio channels in recorded clips (1 = mono, 2 = stereo)
    pub channels: u16,

    /// Capture frame size in milliseconds
    pub buffer_duration_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let client_id = format!("guest-{}", uuid::Uuid::new_v4().simple());
        Self {
            pub_topic: format!("chatroom.{}", client_id),
            client_id,
            broker_url: "nats://localhost:4222".to_string(),
            sub_topic: "chatroom.>".to_string(),
            sample_rate: 16000, // 16kHz voice
            channels: 1,        // Mono
            buffer_duration_ms: 100,
        }
    }
}

impl SessionConfig {
    /// Session config for `client_id` publishing on `chatroom.<client_id>`
    pub fn for_client(client_id: impl Into<String>) -> Self {
        Self::default().with_client_id(client_id)
    }

    /// Switch to another client id, keeping the configured subject prefix
    ///
    /// `chatroom.mugil` becomes `chatroom.<client_id>`. A publish subject
    /// without a prefix is replaced by the bare id.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        let client_id = client_id.into();
        self.pub_topic = match self.pub_topic.rsplit_once('.') {
            Some((prefix, _)) => format!("{}.{}", prefix, client_id),
            None => client_id.clone(),
        };
        self.client_id = client_id;
        self
    }

    pub fn backend_config(&self) -> AudioBackendConfig {
        AudioBackendConfig {
            target_sample_rate: self.sample_rate,
            target_channels: self.channels,
            buffer_duration_ms: self.buffer_duration_ms,
        }
    }
}

impl From<&Config> for SessionConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            client_id: cfg.broker.client_id.clone(),
            broker_url: cfg.broker.url.clone(),
            sub_topic: cfg.broker.sub_topic.clone(),
            pub_topic: cfg.broker.pub_topic.clone(),
            sample_rate: cfg.audio.sample_rate,
            channels: cfg.audio.channels,
            buffer_duration_ms: cfg.audio.buffer_duration_ms,
        }
    }
}
