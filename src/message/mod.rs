//! Message reconciliation
//!
//! - Payload classification (text, image, audio)
//! - Echo suppression against the last locally published payload
//! - The append-only message log rendered by the UI

mod classify;
mod echo;
mod log;
mod record;

pub use classify::{classify, MessageKind, AUDIO_MARKER, IMAGE_MARKER};
pub use echo::{should_suppress, EchoFingerprint};
pub use log::MessageLog;
pub use record::MessageRecord;
