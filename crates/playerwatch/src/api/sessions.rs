use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

use playerwatch_sessions::SessionRow;

use crate::state::AppState;

/// The full session log, newest first.
pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<SessionRow>> {
    let tracker = state.tracker.lock().await;
    Json(tracker.rows().to_vec())
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub ok: bool,
}

pub async fn reset_sessions(
    State(state): State<AppState>,
) -> Result<Json<ResetResponse>, (StatusCode, String)> {
    let mut tracker = state.tracker.lock().await;
    tracker
        .reset()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)))?;

    Ok(Json(ResetResponse { ok: true }))
}
