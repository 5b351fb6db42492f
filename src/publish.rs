//! Publish pipeline
//!
//! Sends an outgoing item, appends the local copy to the log and updates
//! the echo fingerprint. A rejected publish leaves both untouched.

use tracing::{info, warn};

use crate::error::ChatError;
use crate::event::EncodedMedia;
use crate::message::{EchoFingerprint, MessageLog, MessageRecord};
use crate::transport::Transport;

/// State the pipeline writes to
pub struct Outbox<'a> {
    pub client_id: &'a str,
    pub log: &'a mut MessageLog,
    pub fingerprint: &'a mut EchoFingerprint,
}

/// Publish a text message.
///
/// Returns `Ok(false)` without touching anything when topic or text is
/// empty. The fingerprint is only set once the transport accepted the
/// publish.
pub async fn publish_text(
    transport: &dyn Transport,
    outbox: Outbox<'_>,
    topic: &str,
    text: &str,
) -> Result<bool, ChatError> {
    if topic.is_empty() || text.is_empty() {
        return Ok(false);
    }

    transport.publish(topic, text.to_string()).await?;

    outbox
        .log
        .append(MessageRecord::outgoing(outbox.client_id, text));
    outbox.fingerprint.set(text);

    info!("Sent text to {} ({} chars)", topic, text.chars().count());

    Ok(true)
}

/// Publish an encoded image or audio item.
///
/// The fingerprint is set before the publish is issued so an echo racing
/// the confirmation is still recognised; it is rolled back if the publish
/// fails.
pub async fn publish_media(
    transport: &dyn Transport,
    outbox: Outbox<'_>,
    media: EncodedMedia,
) -> Result<bool, ChatError> {
    if media.topic.is_empty() || media.data_uri.is_empty() {
        return Ok(false);
    }

    let previous = outbox.fingerprint.set(media.data_uri.clone());

    if let Err(e) = transport.publish(&media.topic, media.data_uri.clone()).await {
        warn!("Dropping {} message: {}", media.kind, e);
        outbox.fingerprint.restore(previous);
        return Err(e);
    }

    let record = outbox
        .log
        .append(MessageRecord::outgoing(outbox.client_id, media.data_uri));

    info!(
        "Sent {} to {} ({} bytes)",
        record.kind(),
        media.topic,
        record.payload().len()
    );

    Ok(true)
}
