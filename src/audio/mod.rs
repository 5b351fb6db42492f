pub mod backend;
pub mod clip;
pub mod file;

pub use backend::{AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFrame, AudioSource};
pub use clip::AudioClip;
pub use file::{AudioFile, FileBackend};
