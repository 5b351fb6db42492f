pub mod audio;
pub mod config;
pub mod encode;
pub mod error;
pub mod event;
pub mod http;
pub mod message;
pub mod publish;
pub mod recording;
pub mod session;
pub mod transport;

pub use audio::{
    AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioClip, AudioFile, AudioFrame,
    AudioSource, FileBackend,
};
pub use config::Config;
pub use error::ChatError;
pub use event::{Command, EncodedMedia, Event};
pub use http::{create_router, AppState};
pub use message::{classify, should_suppress, EchoFingerprint, MessageKind, MessageLog, MessageRecord};
pub use recording::{RecordingSession, RecordingState};
pub use session::{ChatHandle, ChatSession, SessionConfig, SessionStatus, SubmitReceipt};
pub use transport::{MemoryBroker, MemoryTransport, NatsTransport, Transport};
