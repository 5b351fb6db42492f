use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::audio::{
    AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioClip, AudioFrame, AudioSource,
};
use crate::encode;
use crate::error::ChatError;

/// Opens a fresh capture handle for each recording
pub type BackendOpener = Box<dyn FnMut() -> Result<Box<dyn AudioBackend>, ChatError> + Send>;

/// Recording state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Recording,
}

/// Capture handle plus the task accumulating its frames
struct ActiveCapture {
    backend: Box<dyn AudioBackend>,
    cancel: oneshot::Sender<()>,
    collector: JoinHandle<Vec<AudioFrame>>,
}

/// Two-state audio recorder: idle ⇄ recording.
///
/// Only one capture handle is ever open. `start` while recording and
/// `stop` while idle are no-ops.
pub struct RecordingSession {
    opener: BackendOpener,
    config: AudioBackendConfig,
    active: Option<ActiveCapture>,
}

impl RecordingSession {
    pub fn new(config: AudioBackendConfig, opener: BackendOpener) -> Self {
        Self {
            opener,
            config,
            active: None,
        }
    }

    /// Recorder opening backends through [`AudioBackendFactory`]
    pub fn from_source(source: AudioSource, config: AudioBackendConfig) -> Self {
        let factory_config = config.clone();
        let opener: BackendOpener =
            Box::new(move || AudioBackendFactory::create(&source, factory_config.clone()));
        Self::new(config, opener)
    }

    pub fn state(&self) -> RecordingState {
        if self.active.is_some() {
            RecordingState::Recording
        } else {
            RecordingState::Idle
        }
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Start recording
    ///
    /// On failure the recorder stays idle and no capture handle is kept.
    pub async fn start(&mut self) -> Result<(), ChatError> {
        if self.active.is_some() {
            warn!("Recording already started");
            return Ok(());
        }

        let mut backend = (self.opener)()?;

        info!("Starting recording on {} backend", backend.name());

        let audio_rx = match backend.start().await {
            Ok(rx) => rx,
            Err(e) => {
                warn!("Failed to start audio capture: {}", e);
                if let Err(stop_err) = backend.stop().await {
                    error!("Failed to release audio backend: {}", stop_err);
                }
                return Err(e);
            }
        };

        let (cancel, cancelled) = oneshot::channel();
        let collector = tokio::spawn(collect_frames(audio_rx, cancelled));

        self.active = Some(ActiveCapture {
            backend,
            cancel,
            collector,
        });

        info!("Recording started");

        Ok(())
    }

    /// Stop recording
    ///
    /// Returns to idle immediately and releases the capture handle. The
    /// returned clip still has to be finished (and encoded) by the caller;
    /// `None` means there was no recording to stop.
    pub async fn stop(&mut self) -> Option<PendingClip> {
        let Some(mut capture) = self.active.take() else {
            warn!("Recording not active");
            return None;
        };

        info!("Stopping recording on {} backend", capture.backend.name());

        let _ = capture.cancel.send(());

        if let Err(e) = capture.backend.stop().await {
            error!("Failed to stop audio backend: {}", e);
        }

        Some(PendingClip {
            collector: capture.collector,
            sample_rate: self.config.target_sample_rate,
            channels: self.config.target_channels,
        })
    }
}

/// Frames of a stopped recording that are still being gathered
pub struct PendingClip {
    collector: JoinHandle<Vec<AudioFrame>>,
    sample_rate: u32,
    channels: u16,
}

impl PendingClip {
    /// Wait for the accumulated frames and join them into a clip
    pub async fn finish(self) -> Result<AudioClip, ChatError> {
        let frames = self
            .collector
            .await
            .map_err(|e| ChatError::Encode(format!("frame collector failed: {}", e)))?;

        info!("Recording finished with {} frames", frames.len());

        Ok(AudioClip::from_frames(frames, self.sample_rate, self.channels))
    }

    /// Finish the clip and encode it as a WAV data URI
    pub async fn encode(self) -> Result<String, ChatError> {
        let clip = self.finish().await?;
        encode::encode_clip(&clip)
    }
}

async fn collect_frames(
    mut audio_rx: mpsc::Receiver<AudioFrame>,
    mut cancelled: oneshot::Receiver<()>,
) -> Vec<AudioFrame> {
    let mut frames = Vec::new();

    loop {
        tokio::select! {
            _ = &mut cancelled => break,
            frame = audio_rx.recv() => match frame {
                Some(frame) => frames.push(frame),
                None => return frames,
            },
        }
    }

    // Keep whatever the backend delivered before the stop request
    while let Ok(frame) = audio_rx.try_recv() {
        frames.push(frame);
    }

    frames
}
