//! Binary to data URI encoding for images and recorded audio

use base64::Engine;
use std::path::Path;
use tracing::info;

use crate::audio::AudioClip;
use crate::error::ChatError;

/// MIME type of recorded clips
pub const AUDIO_MIME: &str = "audio/wav";

/// Build a `data:<mime>;base64,<payload>` URI
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime, encoded)
}

/// Guess an image MIME type from the file extension
pub fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())?;

    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Read an image file and encode it as a data URI
pub async fn encode_image_file(path: &Path) -> Result<String, ChatError> {
    let mime = image_mime(path).ok_or_else(|| {
        ChatError::Encode(format!("unsupported image type: {}", path.display()))
    })?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ChatError::Encode(format!("failed to read {}: {}", path.display(), e)))?;

    info!("Encoded image {} ({} bytes)", path.display(), bytes.len());

    Ok(data_uri(mime, &bytes))
}

/// Encode a recorded clip as a WAV data URI
pub fn encode_clip(clip: &AudioClip) -> Result<String, ChatError> {
    let wav = clip.to_wav()?;
    Ok(data_uri(AUDIO_MIME, &wav))
}
