mod api;
mod config;
mod logging;
mod scheduler;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use playerwatch_chatlog::ChatLog;
use playerwatch_sessions::SessionTracker;

use crate::config::{Config, CONFIG_FILE_NAME};
use crate::logging::LogFormat;
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(
    name = "playerwatch",
    about = "Live session and stats backend for game-server player records",
    version
)]
struct Cli {
    /// Path to the config file
    #[arg(short, long, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Directory of per-player record files (overrides config)
    #[arg(short = 'd', long)]
    data_dir: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing("info", cli.log_format);

    let mut config = Config::load(&cli.config)?.unwrap_or_default();
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(listen) = cli.listen {
        config.listen_addr = listen;
    }

    let tracker = SessionTracker::open(
        &config.data_dir,
        &config.session_log_path,
        config.max_session_rows,
    )?;
    tracing::info!(
        rows = tracker.row_count(),
        open = tracker.player_count(),
        "Loaded session log"
    );

    let chat = ChatLog::open(&config.chat_log_path, config.max_chat_messages)
        .with_context(|| "Failed to open chat log")?;

    let listen_addr = config.listen_addr;
    let state = AppState::new(config, tracker, chat);

    scheduler::spawn(&state);

    let router = api::create_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", listen_addr))?;
    tracing::info!("Listening on http://{}", listen_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down");
}
