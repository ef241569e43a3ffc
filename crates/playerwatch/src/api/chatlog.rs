use std::convert::Infallible;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::response::Json;
use chrono::Local;
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use playerwatch_chatlog::ChatMessage;
use playerwatch_sessions::format_timestamp;

use crate::state::AppState;

const DEFAULT_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

pub async fn list_chatlogs(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<ChatMessage>> {
    let chat = state.chat.lock().await;
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    Json(chat.recent(limit).to_vec())
}

pub async fn append_chatlog(
    State(state): State<AppState>,
    Json(mut msg): Json<ChatMessage>,
) -> Result<(StatusCode, Json<ChatMessage>), (StatusCode, String)> {
    if msg.date.is_empty() {
        msg.date = format_timestamp(&Local::now());
    }

    let mut chat = state.chat.lock().await;
    chat.append(msg.clone())
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)))?;

    Ok((StatusCode::CREATED, Json(msg)))
}

pub async fn chat_events(
    State(state): State<AppState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let rx = state.chat.lock().await.subscribe();

    let stream = BroadcastStream::new(rx).map(|result| {
        let event = match result {
            Ok(msg) => Event::default()
                .event("chat_message")
                .data(serde_json::to_string(&msg).unwrap_or_default()),
            Err(_) => Event::default().comment("missed message"),
        };
        Ok(event)
    });

    Sse::new(stream)
}
