// Example: Chat against the in-process broker, no server needed
//
// Publishes text, injects a peer message and an echo of our own message,
// then sends an image if one is given.
//
// Usage: cargo run --example offline_chat -- --image ./photo.png

use anyhow::Result;
use clap::Parser;
use loqa_chat::audio::{AudioBackendConfig, AudioSource};
use loqa_chat::{event, ChatSession, MemoryBroker, RecordingSession, SessionConfig};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "offline_chat")]
#[command(about = "Chat session over the in-process broker")]
struct Args {
    /// Image file to send
    #[arg(short, long)]
    image: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let args = Args::parse();
    let broker = MemoryBroker::new();

    let (events_tx, events_rx) = event::channel();
    let transport = broker.connect(events_tx.clone())?;
    let recorder = RecordingSession::from_source(AudioSource::Microphone, AudioBackendConfig::default());
    let session = ChatSession::new(SessionConfig::for_client("mugil"), Box::new(transport), recorder, events_tx);
    let chat = session.handle();
    let task = tokio::spawn(session.run(events_rx));

    chat.send_text("hello").await?;
    broker.inject("chatroom.mugil", "hello"); // looks like our own echo
    broker.inject("chatroom.peer", "hello!");

    if let Some(image) = args.image {
        chat.submit(None, Some(image)).await?;
        sleep(Duration::from_millis(200)).await;
    }

    // Recording without a microphone backend is refused
    if let Err(e) = chat.start_recording().await {
        info!("Recording refused: {}", e);
    }

    let status = chat.status().await?;
    info!("Status: {}", serde_json::to_string(&status)?);

    chat.shutdown()?;
    let log = task.await?;
    for record in log.iter() {
        info!(
            "[{}] {} ({}): {} bytes",
            record.timestamp(),
            record.sender(),
            record.kind(),
            record.payload().len()
        );
    }

    Ok(())
}
