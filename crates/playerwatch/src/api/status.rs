use axum::extract::State;
use axum::response::Json;
use serde::Serialize;

use playerwatch_sessions::format_timestamp;

use crate::scheduler;
use crate::state::AppState;

#[derive(Serialize)]
pub struct StatusResponse {
    pub data_dir: String,
    pub session_interval_secs: u64,
    pub stats_interval_secs: u64,
    pub last_session_refresh: Option<String>,
    pub last_stats_refresh: Option<String>,
    pub last_error: Option<String>,
    pub session_rows: usize,
    pub tracked_players: usize,
    pub chat_messages: usize,
}

pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    // Lock order: the refresh path takes tracker before health, so the
    // health guard must be released before tracker is locked here.
    let (last_session_refresh, last_stats_refresh, last_error) = {
        let health = state.health.lock().await;
        (
            health.last_session_refresh.as_ref().map(format_timestamp),
            health.last_stats_refresh.as_ref().map(format_timestamp),
            health.last_error.clone(),
        )
    };

    let (session_rows, tracked_players) = {
        let tracker = state.tracker.lock().await;
        (tracker.row_count(), tracker.player_count())
    };

    let chat_messages = state.chat.lock().await.len();

    Json(StatusResponse {
        data_dir: state.config.data_dir.display().to_string(),
        session_interval_secs: state.config.session_interval.as_secs(),
        stats_interval_secs: state.config.stats_interval.as_secs(),
        last_session_refresh,
        last_stats_refresh,
        last_error,
        session_rows,
        tracked_players,
        chat_messages,
    })
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub session_rows: usize,
    pub stats_rows: usize,
    pub last_error: Option<String>,
}

/// Run one reconciler tick and one aggregator tick synchronously.
///
/// Waits for any in-flight scheduled tick instead of skipping, so the
/// response always reflects a refresh that ran after the request arrived.
pub async fn refresh_now(State(state): State<AppState>) -> Json<RefreshResponse> {
    let session_rows = {
        let mut tracker = state.tracker.lock().await;
        scheduler::refresh_sessions(&mut tracker, &state.health).await;
        tracker.row_count()
    };

    {
        let mut reader = state.stats_reader.lock().await;
        scheduler::refresh_stats(&mut reader, &state.stats_table, &state.health).await;
    }

    let stats_rows = state.stats_table.read().await.len();
    let last_error = state.health.lock().await.last_error.clone();

    Json(RefreshResponse {
        session_rows,
        stats_rows,
        last_error,
    })
}
