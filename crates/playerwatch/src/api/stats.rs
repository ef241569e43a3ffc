use axum::extract::State;
use axum::response::Json;

use playerwatch_sessions::PlayerOverview;

use crate::state::AppState;

/// The current statistics table, as last published by the aggregator.
pub async fn player_overview(State(state): State<AppState>) -> Json<Vec<PlayerOverview>> {
    Json(state.stats_table.read().await.clone())
}
