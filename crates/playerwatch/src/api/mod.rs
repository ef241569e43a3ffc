mod chatlog;
mod players;
mod sessions;
mod stats;
mod status;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/sessions", get(sessions::list_sessions))
        .route("/api/sessions/reset", post(sessions::reset_sessions))
        .route("/api/player-overview", get(stats::player_overview))
        .route("/api/players", get(players::list_players))
        .route("/api/player/{key}", get(players::get_player))
        .route(
            "/api/chatlogs",
            get(chatlog::list_chatlogs).post(chatlog::append_chatlog),
        )
        .route("/api/chatlogs/live", get(chatlog::chat_events))
        .route("/api/refresh", post(status::refresh_now))
        .route("/api/status", get(status::get_status))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
