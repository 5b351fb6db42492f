use std::path::PathBuf;
use tokio::sync::mpsc;

use super::file::FileBackend;
use crate::error::ChatError;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since recording started
    pub timestamp_ms: u64,
}

/// Configuration for audio backend
#[derive(Debug, Clone)]
pub struct AudioBackendConfig {
    /// Sample rate of recorded clips (captured audio is downsampled to it)
    pub target_sample_rate: u32,
    /// Channel count of recorded clips (1 = mono, 2 = stereo)
    pub target_channels: u16,
    /// Duration of each delivered frame in milliseconds
    pub buffer_duration_ms: u64,
}

impl Default for AudioBackendConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 16000, // 16kHz voice
            target_channels: 1,        // Mono
            buffer_duration_ms: 100,   // 100ms buffers
        }
    }
}

/// Audio capture backend trait
///
/// A backend is the capture handle of a recording: it is created when a
/// recording starts and dropped when it stops.
#[async_trait::async_trait]
pub trait AudioBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames. Fails with
    /// `ChatError::Permission` if the device is denied or missing.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, ChatError>;

    /// Stop capturing audio
    async fn stop(&mut self) -> Result<(), ChatError>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Audio backend factory
pub struct AudioBackendFactory;

impl AudioBackendFactory {
    /// Create audio backend for the configured source
    pub fn create(
        source: &AudioSource,
        config: AudioBackendConfig,
    ) -> Result<Box<dyn AudioBackend>, ChatError> {
        match source {
            AudioSource::Microphone => Err(ChatError::Permission(
                "no microphone capture backend on this platform".to_string(),
            )),

            AudioSource::File(path) => Ok(Box::new(FileBackend::new(path.clone(), config))),
        }
    }
}

/// Audio source type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// Microphone input
    Microphone,
    /// Replay a WAV file as if it were captured live
    File(PathBuf),
}

impl AudioSource {
    /// Parse a configured source: `microphone` or `file:<path>`
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("microphone") {
            return Some(AudioSource::Microphone);
        }
        value
            .strip_prefix("file:")
            .filter(|path| !path.is_empty())
            .map(|path| AudioSource::File(PathBuf::from(path)))
    }
}
