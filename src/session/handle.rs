use std::path::PathBuf;
use tokio::sync::oneshot;

use super::stats::{SessionStatus, SubmitReceipt};
use crate::error::ChatError;
use crate::event::{Command, Event, EventSender};
use crate::message::MessageRecord;

/// Cloneable handle to a running [`super::ChatSession`].
///
/// Every call is queued behind the events already waiting, so requests
/// observe the session in queue order.
#[derive(Clone)]
pub struct ChatHandle {
    events: EventSender,
}

impl ChatHandle {
    pub(crate) fn new(events: EventSender) -> Self {
        Self { events }
    }

    /// Send text and/or an image file
    pub async fn submit(
        &self,
        text: Option<String>,
        image: Option<PathBuf>,
    ) -> Result<SubmitReceipt, ChatError> {
        self.request(|reply| Command::Submit { text, image, reply })
            .await
    }

    /// Send a text message
    pub async fn send_text(&self, text: impl Into<String>) -> Result<bool, ChatError> {
        let receipt = self.submit(Some(text.into()), None).await?;
        Ok(receipt.text_published)
    }

    pub async fn start_recording(&self) -> Result<(), ChatError> {
        self.request(|reply| Command::StartRecording { reply })
            .await?
    }

    /// Stop recording; `false` if nothing was recording
    pub async fn stop_recording(&self) -> Result<bool, ChatError> {
        self.request(|reply| Command::StopRecording { reply }).await
    }

    /// Current message log, in order
    pub async fn snapshot(&self) -> Result<Vec<MessageRecord>, ChatError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn status(&self) -> Result<SessionStatus, ChatError> {
        self.request(|reply| Command::Status { reply }).await
    }

    /// Ask the session loop to stop
    pub fn shutdown(&self) -> Result<(), ChatError> {
        self.events
            .send(Event::Command(Command::Shutdown))
            .map_err(|_| ChatError::SessionClosed)
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, ChatError> {
        let (reply, response) = oneshot::channel();

        self.events
            .send(Event::Command(command(reply)))
            .map_err(|_| ChatError::SessionClosed)?;

        response.await.map_err(|_| ChatError::SessionClosed)
    }
}
