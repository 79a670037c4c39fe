use anyhow::{Context, Result};
use clap::Parser;
use sign_assist_api::config::Config;
use sign_assist_api::state::AppState;
use sign_assist_core::{
    CommandSpeaker, LogSpeaker, RandomRecognizer, SessionStore, Speaker, SpeechNotifier,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[derive(Parser)]
#[command(version, about = "Sign-Assist demo API server")]
struct Cli {
    /// Overrides BIND_ADDRESS
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Load Configuration ---
    let args = Cli::parse();
    let config = Config::from_env().context("Failed to load application configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    // --- 3. Speech and Recognition ---
    let speaker: Arc<dyn Speaker> = match config
        .tts_command
        .as_deref()
        .and_then(CommandSpeaker::from_command_line)
    {
        Some(speaker) => {
            info!("Speaking through '{}'", speaker.program());
            Arc::new(speaker)
        }
        None => {
            info!("No TTS_COMMAND set, speech will only be logged");
            Arc::new(LogSpeaker)
        }
    };
    let notifier = SpeechNotifier::spawn(speaker, config.speech_workers);
    let recognizer = Arc::new(RandomRecognizer::new());

    let sessions = SessionStore::with_limits(config.session_ttl, config.max_sessions);

    let state = AppState::new(recognizer, notifier)
        .with_sessions(sessions)
        .with_speak_detections(config.speak_detections);
    let app = sign_assist_api::app(state);

    // --- 4. Serve ---
    let addr = args.bind.unwrap_or(config.bind_address);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
