//! Typed events drained by the session loop.
//!
//! Transport callbacks, finished encode tasks and user commands all land on
//! one unbounded queue. A single consumer drains it, so everything that
//! touches session state happens in queue order.

use std::path::PathBuf;

use tokio::sync::{mpsc, oneshot};

use crate::error::ChatError;
use crate::message::{MessageKind, MessageRecord};
use crate::session::{SessionStatus, SubmitReceipt};

pub type EventSender = mpsc::UnboundedSender<Event>;
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

/// Create the session event queue
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

#[derive(Debug)]
pub enum Event {
    /// Broker connection established (or re-established)
    Connected,
    /// Broker connection lost
    Disconnected,
    /// A payload arrived on a subscribed subject
    MessageReceived { topic: String, payload: String },
    /// The broker confirmed a publish
    PublishAck { topic: String },
    /// An image or audio item finished encoding and is ready to publish
    MediaEncoded(EncodedMedia),
    /// A request from the UI or control API
    Command(Command),
}

/// Media converted to a data URI, together with the topic it was sent to.
#[derive(Debug, Clone)]
pub struct EncodedMedia {
    pub topic: String,
    pub kind: MessageKind,
    pub data_uri: String,
}

#[derive(Debug)]
pub enum Command {
    /// Publish the draft text and/or the attached image.
    ///
    /// `text` replaces the draft and `image` replaces the attachment when
    /// present.
    Submit {
        text: Option<String>,
        image: Option<PathBuf>,
        reply: oneshot::Sender<SubmitReceipt>,
    },
    StartRecording {
        reply: oneshot::Sender<Result<(), ChatError>>,
    },
    StopRecording {
        reply: oneshot::Sender<bool>,
    },
    Snapshot {
        reply: oneshot::Sender<Vec<MessageRecord>>,
    },
    Status {
        reply: oneshot::Sender<SessionStatus>,
    },
    Shutdown,
}
