use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::config::SessionConfig;
use super::handle::ChatHandle;
use super::stats::{SessionStatus, SubmitReceipt};
use crate::encode;
use crate::error::ChatError;
use crate::event::{Command, EncodedMedia, Event, EventReceiver, EventSender};
use crate::message::{
    should_suppress, EchoFingerprint, MessageKind, MessageLog, MessageRecord,
};
use crate::publish::{self, Outbox};
use crate::recording::{RecordingSession, RecordingState};
use crate::transport::{sender_from_subject, Transport};

/// Pending user input: the draft text and at most one attached image
#[derive(Debug, Default)]
struct Composer {
    draft: String,
    attachment: Option<PathBuf>,
}

/// A chat session: transport, message log, echo fingerprint and recorder.
///
/// All state is owned here and only mutated from [`ChatSession::run`],
/// which drains the session's event queue one event at a time.
pub struct ChatSession {
    /// Session configuration
    config: SessionConfig,

    /// Broker connection
    transport: Box<dyn Transport>,

    /// Sender side of our own event queue, for encode tasks and handles
    events: EventSender,

    /// Reconciled messages in append order
    log: MessageLog,

    /// Last payload we published
    fingerprint: EchoFingerprint,

    composer: Composer,

    recorder: RecordingSession,

    /// Whether the broker connection is currently up
    connected: bool,

    /// Publishes confirmed by the broker
    acknowledged: usize,

    /// Inbound messages dropped as our own echoes
    echoes_suppressed: usize,
}

impl ChatSession {
    /// Create a session over an already connected transport.
    ///
    /// `events` must be the sender of the queue later passed to
    /// [`ChatSession::run`] (and the one the transport was connected with).
    pub fn new(
        config: SessionConfig,
        transport: Box<dyn Transport>,
        recorder: RecordingSession,
        events: EventSender,
    ) -> Self {
        info!(
            "Creating chat session: {} (sub={}, pub={}, transport={})",
            config.client_id,
            config.sub_topic,
            config.pub_topic,
            transport.name()
        );

        Self {
            config,
            transport,
            events,
            log: MessageLog::new(),
            fingerprint: EchoFingerprint::new(),
            composer: Composer::default(),
            recorder,
            connected: false,
            acknowledged: 0,
            echoes_suppressed: 0,
        }
    }

    /// Handle for sending commands to the running session
    pub fn handle(&self) -> ChatHandle {
        ChatHandle::new(self.events.clone())
    }

    /// Subscribe and drain events until a shutdown command arrives.
    ///
    /// The transport is closed and any recording released on the way out.
    /// Returns the final message log.
    pub async fn run(mut self, mut events: EventReceiver) -> MessageLog {
        info!("Chat session {} running", self.config.client_id);

        self.subscribe().await;

        while let Some(event) = events.recv().await {
            if !self.handle_event(event).await {
                break;
            }
        }

        self.shutdown().await;

        info!(
            "Chat session {} stopped ({} messages)",
            self.config.client_id,
            self.log.len()
        );

        self.log
    }

    /// Subscribe to the configured pattern.
    ///
    /// A rejected subscription is logged and the session carries on
    /// unsubscribed.
    pub async fn subscribe(&mut self) -> bool {
        match self.transport.subscribe(&self.config.sub_topic).await {
            Ok(()) => true,
            Err(e) => {
                warn!("{} (continuing unsubscribed)", e);
                false
            }
        }
    }

    /// Process one event. Returns `false` once the session should stop.
    pub async fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Connected => {
                if !self.connected {
                    info!("Connected to broker");
                }
                self.connected = true;
            }
            Event::Disconnected => {
                warn!("Disconnected from broker");
                self.connected = false;
            }
            Event::MessageReceived { topic, payload } => {
                self.reconcile(&topic, payload);
            }
            Event::PublishAck { topic } => {
                self.acknowledged += 1;
                debug!("Broker confirmed publish to {}", topic);
            }
            Event::MediaEncoded(media) => {
                if let Err(e) = self.publish_media(media).await {
                    debug!("Media publish failed: {}", e);
                }
            }
            Event::Command(command) => return self.handle_command(command).await,
        }

        true
    }

    async fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Submit { text, image, reply } => {
                let receipt = self.submit(text, image).await;
                let _ = reply.send(receipt);
            }
            Command::StartRecording { reply } => {
                let result = self.start_recording().await;
                let _ = reply.send(result);
            }
            Command::StopRecording { reply } => {
                let stopped = self.stop_recording().await;
                let _ = reply.send(stopped);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.log.snapshot().to_vec());
            }
            Command::Status { reply } => {
                let _ = reply.send(self.status());
            }
            Command::Shutdown => {
                info!("Shutdown requested");
                return false;
            }
        }

        true
    }

    /// Merge an inbound payload into the log unless it echoes our last
    /// publish. Returns whether a record was appended.
    pub fn reconcile(&mut self, topic: &str, payload: String) -> bool {
        if should_suppress(&payload, &self.fingerprint) {
            self.echoes_suppressed += 1;
            debug!("Suppressed echo on {}", topic);
            return false;
        }

        let record = self
            .log
            .append(MessageRecord::incoming(sender_from_subject(topic), payload));

        info!("Received {} from {}", record.kind(), record.sender());

        true
    }

    /// Publish the draft text and the attached image, independently.
    ///
    /// `text` replaces the draft and `image` replaces the attachment. A
    /// draft that fails to send is kept for the next attempt.
    pub async fn submit(&mut self, text: Option<String>, image: Option<PathBuf>) -> SubmitReceipt {
        if let Some(text) = text {
            self.composer.draft = text;
        }
        if let Some(path) = image {
            self.attach(path);
        }

        let mut receipt = SubmitReceipt::default();

        if !self.composer.draft.is_empty() {
            receipt.text_published = self.send_draft().await;
        }

        if let Some(path) = self.composer.attachment.take() {
            self.spawn_image_encode(path);
            receipt.image_queued = true;
        }

        receipt
    }

    /// Attach an image for the next send. Only existence is checked here.
    pub fn attach(&mut self, path: PathBuf) -> bool {
        if !path.exists() {
            warn!("Ignoring attachment {}: file not found", path.display());
            return false;
        }

        debug!("Attached {}", path.display());
        self.composer.attachment = Some(path);
        true
    }

    async fn send_draft(&mut self) -> bool {
        let text = self.composer.draft.clone();
        let outbox = Outbox {
            client_id: &self.config.client_id,
            log: &mut self.log,
            fingerprint: &mut self.fingerprint,
        };

        match publish::publish_text(&*self.transport, outbox, &self.config.pub_topic, &text).await
        {
            Ok(true) => {
                self.composer.draft.clear();
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!("Failed to send message: {}", e);
                false
            }
        }
    }

    /// Publish an encoded image or audio item
    pub async fn publish_media(&mut self, media: EncodedMedia) -> Result<bool, ChatError> {
        let outbox = Outbox {
            client_id: &self.config.client_id,
            log: &mut self.log,
            fingerprint: &mut self.fingerprint,
        };

        publish::publish_media(&*self.transport, outbox, media).await
    }

    fn spawn_image_encode(&self, path: PathBuf) {
        let events = self.events.clone();
        let topic = self.config.pub_topic.clone();

        tokio::spawn(async move {
            match encode::encode_image_file(&path).await {
                Ok(data_uri) => {
                    let _ = events.send(Event::MediaEncoded(EncodedMedia {
                        topic,
                        kind: MessageKind::Image,
                        data_uri,
                    }));
                }
                Err(e) => warn!("Dropping image {}: {}", path.display(), e),
            }
        });
    }

    /// Start an audio recording (no-op if one is already running)
    pub async fn start_recording(&mut self) -> Result<(), ChatError> {
        self.recorder.start().await
    }

    /// Stop the current recording and publish it once encoded.
    ///
    /// Returns `false` if nothing was recording. The recorder is idle again
    /// when this returns; encoding continues in the background.
    pub async fn stop_recording(&mut self) -> bool {
        let Some(pending) = self.recorder.stop().await else {
            return false;
        };

        let events = self.events.clone();
        let topic = self.config.pub_topic.clone();

        tokio::spawn(async move {
            match pending.encode().await {
                Ok(data_uri) => {
                    let _ = events.send(Event::MediaEncoded(EncodedMedia {
                        topic,
                        kind: MessageKind::Audio,
                        data_uri,
                    }));
                }
                Err(e) => warn!("Dropping recording: {}", e),
            }
        });

        true
    }

    /// Release the recorder and the transport
    pub async fn shutdown(&mut self) {
        if self.recorder.is_recording() {
            // The clip is discarded; nothing will publish it
            let _ = self.recorder.stop().await;
        }

        if let Err(e) = self.transport.close().await {
            error!("Failed to close {} transport: {}", self.transport.name(), e);
        }

        self.connected = false;
    }

    pub fn messages(&self) -> &[MessageRecord] {
        self.log.snapshot()
    }

    pub fn last_sent(&self) -> Option<&str> {
        self.fingerprint.get()
    }

    pub fn draft(&self) -> &str {
        &self.composer.draft
    }

    pub fn attachment(&self) -> Option<&Path> {
        self.composer.attachment.as_deref()
    }

    pub fn recording_state(&self) -> RecordingState {
        self.recorder.state()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            client_id: self.config.client_id.clone(),
            connected: self.connected,
            recording: self.recorder.is_recording(),
            messages: self.log.len(),
            acknowledged: self.acknowledged,
            echoes_suppressed: self.echoes_suppressed,
        }
    }
}
