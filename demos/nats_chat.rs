// Example: Two chat sessions talking over a real NATS server
//
// Connects "alice" and "bob" to the same broker, exchanges a few messages
// and prints both logs. Each side sees the other's messages once and never
// its own echo.
//
// Requirements: nats-server running on localhost:4222
//
// Usage: cargo run --example nats_chat -- --url nats://localhost:4222

use anyhow::Result;
use clap::Parser;
use loqa_chat::{
    event, ChatHandle, ChatSession, MessageLog, NatsTransport, RecordingSession, SessionConfig,
};
use loqa_chat::audio::{AudioBackendConfig, AudioSource};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "nats_chat")]
#[command(about = "Exchange messages between two sessions over NATS")]
struct Args {
    /// NATS server URL
    #[arg(short, long, default_value = "nats://localhost:4222")]
    url: String,
}

async fn start(client_id: &str, url: &str) -> Result<(ChatHandle, JoinHandle<MessageLog>)> {
    let mut config = SessionConfig::for_client(client_id);
    config.broker_url = url.to_string();

    let (events_tx, events_rx) = event::channel();
    let transport = NatsTransport::connect(url, events_tx.clone()).await?;
    let recorder = RecordingSession::from_source(AudioSource::Microphone, AudioBackendConfig::default());

    let session = ChatSession::new(config, Box::new(transport), recorder, events_tx);
    let handle = session.handle();
    Ok((handle, tokio::spawn(session.run(events_rx))))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let args = Args::parse();

    let (alice, alice_task) = start("alice", &args.url).await?;
    let (bob, bob_task) = start("bob", &args.url).await?;

    // Let both subscriptions reach the server
    sleep(Duration::from_millis(200)).await;

    alice.send_text("hi bob").await?;
    bob.send_text("hey alice").await?;
    alice.send_text("how are you?").await?;

    sleep(Duration::from_millis(500)).await;

    alice.shutdown()?;
    bob.shutdown()?;

    for (name, task) in [("alice", alice_task), ("bob", bob_task)] {
        let log = task.await?;
        info!("{}'s log ({} messages):", name, log.len());
        for record in log.iter() {
            info!("  [{}] {}: {}", record.timestamp(), record.sender(), record.payload());
        }
    }

    Ok(())
}
