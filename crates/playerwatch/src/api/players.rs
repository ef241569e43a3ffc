use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;

use playerwatch_snapshots::SnapshotDoc;

use crate::state::AppState;

pub async fn list_players(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, (StatusCode, String)> {
    let tracker = state.tracker.lock().await;
    let keys = tracker
        .reader()
        .player_keys()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)))?;

    Ok(Json(keys))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SnapshotDoc>, (StatusCode, String)> {
    let tracker = state.tracker.lock().await;
    let doc = tracker
        .reader()
        .read_one(&key)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)))?;

    match doc {
        Some(doc) => Ok(Json(doc)),
        None => Err((StatusCode::NOT_FOUND, "Player not found".to_string())),
    }
}
