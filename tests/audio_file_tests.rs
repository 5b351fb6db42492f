// Integration tests for WAV file capture
//
// A generated WAV file is replayed through the file backend the same way a
// microphone would deliver frames.

use anyhow::Result;
use loqa_chat::audio::{
    AudioBackendConfig, AudioBackendFactory, AudioFile, AudioSource, FileBackend,
};
use loqa_chat::recording::RecordingSession;
use loqa_chat::{AudioBackend, ChatError};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// Write `seconds` of a mono 16kHz ramp
fn write_wav(path: &Path, seconds: f64) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for i in 0..(16000.0 * seconds) as usize {
        writer.write_sample((i % 1000) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

fn fixture(dir: &TempDir, seconds: f64) -> Result<PathBuf> {
    let path = dir.path().join("voice.wav");
    write_wav(&path, seconds)?;
    Ok(path)
}

#[test]
fn test_audio_file_open() -> Result<()> {
    let dir = TempDir::new()?;
    let path = fixture(&dir, 0.5)?;

    let audio = AudioFile::open(&path)?;

    assert_eq!(audio.sample_rate, 16000);
    assert_eq!(audio.channels, 1);
    assert_eq!(audio.samples.len(), 8000);
    assert!((audio.duration_seconds - 0.5).abs() < 1e-9);
    assert!(audio.path.contains("voice.wav"));
    Ok(())
}

#[test]
fn test_audio_file_nonexistent() {
    let result = AudioFile::open("/nonexistent/path/to/audio.wav");

    assert!(matches!(result, Err(ChatError::Permission(_))));
}

#[test]
fn test_audio_file_frames() -> Result<()> {
    let dir = TempDir::new()?;
    let audio = AudioFile::open(fixture(&dir, 0.25)?)?;

    let frames = audio.frames(100);

    // 100ms, 100ms, then the 50ms remainder
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].samples.len(), 1600);
    assert_eq!(frames[2].samples.len(), 800);
    assert_eq!(frames[1].timestamp_ms, 100);
    assert_eq!(frames[2].timestamp_ms, 200);
    Ok(())
}

#[test]
fn test_audio_source_parse() {
    assert_eq!(AudioSource::parse("microphone"), Some(AudioSource::Microphone));
    assert_eq!(AudioSource::parse(" Microphone "), Some(AudioSource::Microphone));
    assert_eq!(
        AudioSource::parse("file:./voice.wav"),
        Some(AudioSource::File(PathBuf::from("./voice.wav")))
    );
    assert_eq!(AudioSource::parse("file:"), None);
    assert_eq!(AudioSource::parse("line-in"), None);
}

#[test]
fn test_factory() -> Result<()> {
    let config = AudioBackendConfig::default();

    let source = AudioSource::File(PathBuf::from("voice.wav"));
    let backend = AudioBackendFactory::create(&source, config.clone())?;
    assert_eq!(backend.name(), "file");
    assert!(!backend.is_capturing());

    let microphone = AudioBackendFactory::create(&AudioSource::Microphone, config);
    assert!(matches!(microphone, Err(ChatError::Permission(_))));
    Ok(())
}

#[tokio::test]
async fn test_file_backend_replays_frames() -> Result<()> {
    let dir = TempDir::new()?;
    let mut backend = FileBackend::new(fixture(&dir, 0.3)?, AudioBackendConfig::default());

    let mut rx = backend.start().await?;
    assert!(backend.is_capturing());

    let mut samples = 0;
    while let Some(frame) = rx.recv().await {
        assert_eq!(frame.sample_rate, 16000);
        samples += frame.samples.len();
    }

    assert_eq!(samples, 4800);
    backend.stop().await?;
    assert!(!backend.is_capturing());
    Ok(())
}

#[tokio::test]
async fn test_file_backend_missing_file() {
    let mut backend = FileBackend::new(
        PathBuf::from("/nonexistent/voice.wav"),
        AudioBackendConfig::default(),
    );

    let result = backend.start().await;

    assert!(matches!(result, Err(ChatError::Permission(_))));
    assert!(!backend.is_capturing());
}

#[tokio::test]
async fn test_record_from_file_source() -> Result<()> {
    let dir = TempDir::new()?;
    let source = AudioSource::File(fixture(&dir, 0.2)?);
    let mut recorder = RecordingSession::from_source(source, AudioBackendConfig::default());

    recorder.start().await?;
    // Two 100ms frames, the first delivered immediately
    tokio::time::sleep(Duration::from_millis(400)).await;
    let clip = recorder.stop().await.expect("recording").finish().await?;

    assert_eq!(clip.samples.len(), 3200);
    assert_eq!(clip.duration_ms(), 200);
    Ok(())
}
