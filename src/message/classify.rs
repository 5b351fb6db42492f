use serde::{Deserialize, Serialize};

/// Prefix carried by audio data URIs (`data:audio/wav;base64,...`)
pub const AUDIO_MARKER: &str = "data:audio";

/// Prefix carried by image data URIs (`data:image/png;base64,...`)
pub const IMAGE_MARKER: &str = "data:image";

/// Payload encoding of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Audio,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
            MessageKind::Audio => "audio",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a raw payload by its prefix.
///
/// Audio is checked before image; anything without a media marker is text.
pub fn classify(payload: &str) -> MessageKind {
    if payload.starts_with(AUDIO_MARKER) {
        MessageKind::Audio
    } else if payload.starts_with(IMAGE_MARKER) {
        MessageKind::Image
    } else {
        MessageKind::Text
    }
}
