use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::audio::AudioSource;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub broker: BrokerConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct BrokerConfig {
    pub url: String,
    pub client_id: String,
    pub sub_topic: String,
    pub pub_topic: String,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    /// `microphone` or `file:<path.wav>`
    pub source: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub buffer_duration_ms: u64,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .with_context(|| format!("Failed to read config {}", path))?;

        let cfg: Self = settings
            .try_deserialize()
            .with_context(|| format!("Invalid config {}", path))?;

        cfg.audio_source()
            .with_context(|| format!("Invalid config {}", path))?;

        Ok(cfg)
    }

    /// Capture source named by `audio.source`
    pub fn audio_source(&self) -> Result<AudioSource> {
        AudioSource::parse(&self.audio.source).ok_or_else(|| {
            anyhow!(
                "unknown audio.source {:?} (expected \"microphone\" or \"file:<path.wav>\")",
                self.audio.source
            )
        })
    }
}
