// Integration tests for the recording state machine

mod common;

use anyhow::Result;
use base64::Engine;
use common::{frame, mono_frames, scripted};
use loqa_chat::audio::{AudioBackendConfig, AudioClip, AudioSource};
use loqa_chat::recording::{RecordingSession, RecordingState};
use loqa_chat::ChatError;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_starts_idle() {
    let (opener, opened) = scripted(mono_frames(1), false);
    let recorder = RecordingSession::new(AudioBackendConfig::default(), opener);

    assert_eq!(recorder.state(), RecordingState::Idle);
    assert!(!recorder.is_recording());
    assert_eq!(opened.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_stop_while_idle_is_noop() {
    let (opener, opened) = scripted(mono_frames(1), false);
    let mut recorder = RecordingSession::new(AudioBackendConfig::default(), opener);

    assert!(recorder.stop().await.is_none());
    assert_eq!(recorder.state(), RecordingState::Idle);
    assert_eq!(opened.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_start_while_recording_is_noop() -> Result<()> {
    let (opener, opened) = scripted(mono_frames(1), false);
    let mut recorder = RecordingSession::new(AudioBackendConfig::default(), opener);

    recorder.start().await?;
    recorder.start().await?;

    assert_eq!(recorder.state(), RecordingState::Recording);
    assert_eq!(opened.load(Ordering::SeqCst), 1, "only one capture handle");
    Ok(())
}

#[tokio::test]
async fn test_permission_denied_stays_idle() {
    let (opener, _) = scripted(mono_frames(1), true);
    let mut recorder = RecordingSession::new(AudioBackendConfig::default(), opener);

    let result = recorder.start().await;

    assert!(matches!(result, Err(ChatError::Permission(_))));
    assert_eq!(recorder.state(), RecordingState::Idle);
    assert!(recorder.stop().await.is_none());
}

#[tokio::test]
async fn test_microphone_source_unavailable() {
    let mut recorder =
        RecordingSession::from_source(AudioSource::Microphone, AudioBackendConfig::default());

    let result = recorder.start().await;

    assert!(matches!(result, Err(ChatError::Permission(_))));
    assert_eq!(recorder.state(), RecordingState::Idle);
}

#[tokio::test]
async fn test_stop_returns_to_idle_and_keeps_frames() -> Result<()> {
    let (opener, _) = scripted(mono_frames(5), false);
    let mut recorder = RecordingSession::new(AudioBackendConfig::default(), opener);

    recorder.start().await?;
    let pending = recorder.stop().await.expect("a recording was running");

    // Idle before the clip is finished
    assert_eq!(recorder.state(), RecordingState::Idle);

    let clip = pending.finish().await?;
    assert_eq!(clip.samples.len(), 5 * 1600);
    assert_eq!(clip.sample_rate, 16000);
    assert_eq!(clip.channels, 1);
    assert_eq!(clip.duration_ms(), 500);
    Ok(())
}

#[tokio::test]
async fn test_recording_cycles() -> Result<()> {
    let (opener, opened) = scripted(mono_frames(2), false);
    let mut recorder = RecordingSession::new(AudioBackendConfig::default(), opener);

    for _ in 0..3 {
        recorder.start().await?;
        let pending = recorder.stop().await.expect("recording");
        assert_eq!(pending.finish().await?.samples.len(), 2 * 1600);
    }

    assert_eq!(opened.load(Ordering::SeqCst), 3);
    assert_eq!(recorder.state(), RecordingState::Idle);
    Ok(())
}

#[tokio::test]
async fn test_pending_clip_encodes_wav_data_uri() -> Result<()> {
    let (opener, _) = scripted(mono_frames(3), false);
    let mut recorder = RecordingSession::new(AudioBackendConfig::default(), opener);

    recorder.start().await?;
    let data_uri = recorder.stop().await.expect("recording").encode().await?;

    let encoded = data_uri
        .strip_prefix("data:audio/wav;base64,")
        .expect("wav data uri");
    let wav = base64::engine::general_purpose::STANDARD.decode(encoded)?;
    let reader = hound::WavReader::new(std::io::Cursor::new(wav))?;
    assert_eq!(reader.spec().sample_rate, 16000);
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.len() as usize, 3 * 1600);
    Ok(())
}

#[tokio::test]
async fn test_empty_recording_fails_to_encode() -> Result<()> {
    let (opener, _) = scripted(Vec::new(), false);
    let mut recorder = RecordingSession::new(AudioBackendConfig::default(), opener);

    recorder.start().await?;
    let result = recorder.stop().await.expect("recording").encode().await;

    assert!(matches!(result, Err(ChatError::Encode(_))));
    Ok(())
}

#[test]
fn test_clip_downsamples_and_mixes_to_mono() {
    // 48kHz stereo, 8 sample frames (L, R interleaved)
    let samples = vec![100, 200, 1, 1, 2, 2, 3, 3, 300, 400, 4, 4, 5, 5, 6, 6];
    let clip = AudioClip::from_frames(vec![frame(samples, 48000, 2, 0)], 16000, 1);

    assert_eq!(clip.sample_rate, 16000);
    assert_eq!(clip.channels, 1);
    // L + R per frame, then every third frame kept
    assert_eq!(clip.samples, vec![300, 6, 10]);
}

#[test]
fn test_clip_mono_mix_clamps() {
    let clip = AudioClip::from_frames(vec![frame(vec![i16::MAX, i16::MAX], 16000, 2, 0)], 16000, 1);

    assert_eq!(clip.samples, vec![i16::MAX]);
}

#[test]
fn test_clip_resamples_fractional_ratio() {
    // One second at 44.1kHz
    let clip = AudioClip::from_frames(vec![frame(vec![0; 44100], 44100, 1, 0)], 16000, 1);

    assert_eq!(clip.sample_rate, 16000);
    assert_eq!(clip.samples.len(), 16000);
    assert_eq!(clip.duration_ms(), 1000);
}

#[test]
fn test_clip_upsamples_by_interpolation() {
    let clip = AudioClip::from_frames(vec![frame(vec![0, 100], 8000, 1, 0)], 16000, 1);

    assert_eq!(clip.sample_rate, 16000);
    assert_eq!(clip.samples, vec![0, 50, 100, 100]);
}

#[test]
fn test_clip_normalises_mixed_frames() {
    let frames = vec![
        frame(vec![1; 1600], 16000, 1, 0),
        // 100ms of 48kHz stereo
        frame(vec![2; 9600], 48000, 2, 100),
        // 100ms of 44.1kHz mono
        frame(vec![3; 4410], 44100, 1, 200),
    ];

    let clip = AudioClip::from_frames(frames, 16000, 1);

    assert_eq!(clip.sample_rate, 16000);
    assert_eq!(clip.channels, 1);
    assert_eq!(clip.samples.len(), 3 * 1600);
    assert_eq!(clip.duration_ms(), 300);
    assert_eq!(clip.samples[0], 1);
    assert_eq!(clip.samples[1600], 4);
    assert_eq!(clip.samples[3200], 3);
}

#[test]
fn test_clip_duplicates_mono_into_stereo() {
    let clip = AudioClip::from_frames(vec![frame(vec![7, 9], 16000, 1, 0)], 16000, 2);

    assert_eq!(clip.channels, 2);
    assert_eq!(clip.samples, vec![7, 7, 9, 9]);
}
