// Shared fixtures for the integration tests
//
// A scripted backend stands in for the capture device: it hands out a
// fixed set of frames on start and counts how often it was opened.
// `Harness` drives a `ChatSession` over the in-process broker one event at
// a time.

#![allow(dead_code)]

use loqa_chat::audio::{AudioBackend, AudioBackendConfig, AudioFrame, AudioSource};
use loqa_chat::event::{self, Event, EventReceiver};
use loqa_chat::recording::{BackendOpener, RecordingSession};
use loqa_chat::{ChatError, ChatSession, MemoryBroker, SessionConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub struct ScriptedBackend {
    frames: Vec<AudioFrame>,
    deny: bool,
    capturing: bool,
    // Keeps the channel open like a live device would
    tx: Option<mpsc::Sender<AudioFrame>>,
}

#[async_trait::async_trait]
impl AudioBackend for ScriptedBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>, ChatError> {
        if self.deny {
            return Err(ChatError::Permission("microphone access denied".to_string()));
        }
        let (tx, rx) = mpsc::channel(self.frames.len().max(1));
        for frame in self.frames.drain(..) {
            tx.try_send(frame).expect("channel sized for all frames");
        }
        self.tx = Some(tx);
        self.capturing = true;
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), ChatError> {
        self.tx = None;
        self.capturing = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn frame(samples: Vec<i16>, sample_rate: u32, channels: u16, timestamp_ms: u64) -> AudioFrame {
    AudioFrame {
        samples,
        sample_rate,
        channels,
        timestamp_ms,
    }
}

pub fn scripted(frames: Vec<AudioFrame>, deny: bool) -> (BackendOpener, Arc<AtomicUsize>) {
    let opened = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&opened);
    let opener: BackendOpener = Box::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedBackend {
            frames: frames.clone(),
            deny,
            capturing: false,
            tx: None,
        }) as Box<dyn AudioBackend>)
    });
    (opener, opened)
}

pub fn mono_frames(count: usize) -> Vec<AudioFrame> {
    (0..count)
        .map(|i| frame(vec![i as i16; 1600], 16000, 1, i as u64 * 100))
        .collect()
}

pub fn microphone() -> RecordingSession {
    RecordingSession::from_source(AudioSource::Microphone, AudioBackendConfig::default())
}

pub fn scripted_recorder(frames: Vec<AudioFrame>) -> RecordingSession {
    let (opener, _) = scripted(frames, false);
    RecordingSession::new(AudioBackendConfig::default(), opener)
}

pub struct Harness {
    pub broker: MemoryBroker,
    pub session: ChatSession,
    pub rx: EventReceiver,
}

impl Harness {
    /// Session for `client_id`, connected and subscribed to `chatroom.>`
    pub async fn new(client_id: &str, recorder: RecordingSession) -> Self {
        Self::with_config(SessionConfig::for_client(client_id), recorder).await
    }

    pub async fn with_config(config: SessionConfig, recorder: RecordingSession) -> Self {
        let broker = MemoryBroker::new();
        let (tx, rx) = event::channel();
        let transport = broker.connect(tx.clone()).expect("broker online");
        let mut session = ChatSession::new(config, Box::new(transport), recorder, tx);
        session.subscribe().await;

        let mut harness = Self { broker, session, rx };
        harness.pump().await;
        harness
    }

    /// Handle every event already queued
    pub async fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.session.handle_event(event).await;
            handled += 1;
        }
        handled
    }

    /// Wait for the next `MediaEncoded` event and handle it, along with
    /// anything queued before it
    pub async fn wait_for_media(&mut self) -> bool {
        loop {
            match tokio::time::timeout(Duration::from_secs(5), self.rx.recv()).await {
                Ok(Some(event)) => {
                    let is_media = matches!(event, Event::MediaEncoded(_));
                    self.session.handle_event(event).await;
                    if is_media {
                        return true;
                    }
                }
                _ => return false,
            }
        }
    }

    /// True if no event shows up within `ms`
    pub async fn stays_quiet(&mut self, ms: u64) -> bool {
        tokio::time::timeout(Duration::from_millis(ms), self.rx.recv())
            .await
            .is_err()
    }

    pub fn payloads(&self) -> Vec<String> {
        self.session
            .messages()
            .iter()
            .map(|record| record.payload().to_string())
            .collect()
    }
}
