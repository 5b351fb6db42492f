use anyhow::{Context, Result};
use clap::Parser;
use loqa_chat::{
    create_router, event, AppState, ChatHandle, ChatSession, Config, MessageKind, MessageRecord,
    NatsTransport, RecordingSession, SessionConfig,
};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "loqa-chat", about = "Pub/sub chat client")]
struct Args {
    /// Config file (without extension)
    #[arg(long, default_value = "config/loqa-chat")]
    config: String,

    /// Override the configured client id (also sets the publish subject)
    #[arg(long)]
    client_id: Option<String>,

    /// Don't start the HTTP API
    #[arg(long)]
    no_http: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("Loqa Chat v0.1.0");
    info!("Loaded config: {}", cfg.service.name);

    let mut session_config = SessionConfig::from(&cfg);
    if let Some(client_id) = args.client_id {
        session_config = session_config.with_client_id(client_id);
    }

    let (events_tx, events_rx) = event::channel();

    let transport = match NatsTransport::connect(&session_config.broker_url, events_tx.clone()).await
    {
        Ok(transport) => transport,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    let recorder =
        RecordingSession::from_source(cfg.audio_source()?, session_config.backend_config());
    let session = ChatSession::new(session_config, Box::new(transport), recorder, events_tx);
    let chat = session.handle();
    let session_task = tokio::spawn(session.run(events_rx));

    if !args.no_http {
        let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind HTTP API on {}", addr))?;
        info!("HTTP API listening on {}", addr);

        let app = create_router(AppState::new(chat.clone()));
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("HTTP server failed: {}", e);
            }
        });
    }

    run_terminal(&chat).await?;

    let _ = chat.shutdown();
    let log = session_task.await.context("Chat session panicked")?;
    info!("Session ended with {} messages", log.len());

    Ok(())
}

/// Line-oriented front end on stdin.
///
/// Plain lines are sent as text. Commands: `/image <path>`, `/rec`,
/// `/stop`, `/log`, `/status`, `/quit`.
async fn run_terminal(chat: &ChatHandle) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();

        match line.split_once(' ').unwrap_or((line, "")) {
            ("/quit", _) => break,
            ("/image", path) if !path.is_empty() => {
                let receipt = chat.submit(None, Some(PathBuf::from(path))).await?;
                if !receipt.image_queued {
                    warn!("Image not sent: {}", path);
                }
            }
            ("/rec", _) => {
                if let Err(e) = chat.start_recording().await {
                    warn!("{}", e);
                }
            }
            ("/stop", _) => {
                chat.stop_recording().await?;
            }
            ("/status", _) => {
                let status = chat.status().await?;
                println!("{}", serde_json::to_string_pretty(&status)?);
            }
            ("/log", _) => shown = 0,
            ("", _) => {}
            _ => {
                chat.send_text(line).await?;
            }
        }

        let messages = chat.snapshot().await?;
        for record in messages.iter().skip(shown) {
            println!("{}", render(record));
        }
        shown = messages.len();
    }

    Ok(())
}

fn render(record: &MessageRecord) -> String {
    let body = match record.kind() {
        MessageKind::Text => record.payload().to_string(),
        kind => format!("[{} {} bytes]", kind, record.payload().len()),
    };
    let marker = if record.outgoing() { ">" } else { "<" };
    format!("{} {} {}: {}", record.timestamp(), marker, record.sender(), body)
}
