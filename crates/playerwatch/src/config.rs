//! Configuration file support.
//!
//! Loads configuration from `playerwatch.toml`; CLI flags override the
//! file, the file overrides built-in defaults.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// The config file name
pub const CONFIG_FILE_NAME: &str = "playerwatch.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// Directory of per-player record files written by the game server.
    pub data_dir: PathBuf,
    /// Backing file for the session log.
    pub session_log_path: PathBuf,
    /// Backing file for the chat log.
    pub chat_log_path: PathBuf,
    /// Address the API listens on.
    pub listen_addr: SocketAddr,
    /// Reconciliation cadence (humantime string, e.g. "10s").
    #[serde(with = "humantime_serde")]
    pub session_interval: Duration,
    /// Stats recomputation cadence. Slower than the session interval.
    #[serde(with = "humantime_serde")]
    pub stats_interval: Duration,
    /// Session log cap; oldest rows are evicted past it.
    pub max_session_rows: usize,
    /// Chat log cap.
    pub max_chat_messages: usize,
}

impl Default for Config {
    fn default() -> Self {
        let state_dir = default_state_dir();
        Self {
            data_dir: PathBuf::from("data"),
            session_log_path: state_dir.join("session_log.json"),
            chat_log_path: state_dir.join("chat_log.json"),
            listen_addr: "0.0.0.0:3000".parse().expect("valid default address"),
            session_interval: Duration::from_secs(10),
            stats_interval: Duration::from_secs(60),
            max_session_rows: 1000,
            max_chat_messages: 500,
        }
    }
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if the file exists and parses
    /// - `Ok(None)` if the file does not exist
    /// - `Err(...)` if the file exists but fails to parse (hard error)
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(Some(config))
    }
}

fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("playerwatch"))
        .unwrap_or_else(|| PathBuf::from(".playerwatch"))
}
