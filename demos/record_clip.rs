// Example: Record a voice clip from a WAV file and send it
//
// The file backend replays the WAV in real time as if it were captured
// from a microphone. After `--duration` seconds the recording is stopped,
// encoded as a data URI and published through the in-process broker.
//
// Usage: cargo run --example record_clip -- --input ./voice.wav --duration 2

use anyhow::Result;
use clap::Parser;
use loqa_chat::audio::AudioSource;
use loqa_chat::{event, ChatSession, MemoryBroker, MessageKind, RecordingSession, SessionConfig};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "record_clip")]
#[command(about = "Record a clip from a WAV file and publish it")]
struct Args {
    /// WAV file to replay as capture input
    #[arg(short, long)]
    input: PathBuf,

    /// Seconds to record
    #[arg(short, long, default_value = "2")]
    duration: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let args = Args::parse();
    let broker = MemoryBroker::new();
    let config = SessionConfig::for_client("recorder");

    let (events_tx, events_rx) = event::channel();
    let transport = broker.connect(events_tx.clone())?;
    let recorder = RecordingSession::from_source(AudioSource::File(args.input), config.backend_config());
    let session = ChatSession::new(config, Box::new(transport), recorder, events_tx);
    let chat = session.handle();
    let task = tokio::spawn(session.run(events_rx));

    chat.start_recording().await?;
    info!("Recording for {}s", args.duration);
    sleep(Duration::from_secs(args.duration)).await;
    chat.stop_recording().await?;

    // Wait for the clip to be encoded and published
    for _ in 0..50 {
        let messages = chat.snapshot().await?;
        if messages.iter().any(|m| m.kind() == MessageKind::Audio) {
            break;
        }
        sleep(Duration::from_millis(100)).await;
    }

    chat.shutdown()?;
    let log = task.await?;
    for record in log.iter() {
        info!(
            "{} sent {} ({} bytes)",
            record.sender(),
            record.kind(),
            record.payload().len()
        );
    }

    Ok(())
}
