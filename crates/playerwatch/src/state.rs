use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::{Mutex, RwLock};

use playerwatch_chatlog::ChatLog;
use playerwatch_sessions::{PlayerOverview, SessionTracker};
use playerwatch_snapshots::SnapshotReader;

use crate::config::Config;

/// Process-wide health slot, updated at tick boundaries.
#[derive(Debug, Default)]
pub struct Health {
    pub last_session_refresh: Option<DateTime<Local>>,
    pub last_stats_refresh: Option<DateTime<Local>>,
    pub last_error: Option<String>,
}

/// Shared application state.
///
/// The tracker mutex is the session log's single-writer guard: the
/// scheduler's session loop and the synchronous refresh/reset handlers are
/// the only holders. The stats reader has its own mutex and its own mtime
/// cache, independent of the tracker's. The stats table is replaced whole
/// under the write lock, so readers see either the old or the new table.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tracker: Arc<Mutex<SessionTracker>>,
    pub stats_reader: Arc<Mutex<SnapshotReader>>,
    pub stats_table: Arc<RwLock<Vec<PlayerOverview>>>,
    pub chat: Arc<Mutex<ChatLog>>,
    pub health: Arc<Mutex<Health>>,
}

impl AppState {
    pub fn new(config: Config, tracker: SessionTracker, chat: ChatLog) -> Self {
        let stats_reader = SnapshotReader::new(&config.data_dir);
        Self {
            config: Arc::new(config),
            tracker: Arc::new(Mutex::new(tracker)),
            stats_reader: Arc::new(Mutex::new(stats_reader)),
            stats_table: Arc::new(RwLock::new(Vec::new())),
            chat: Arc::new(Mutex::new(chat)),
            health: Arc::new(Mutex::new(Health::default())),
        }
    }
}
