use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RoomSummary {
    pub room: String,
    pub players: usize,
    pub tiles_remaining: usize,
}

/// List the currently active rooms
pub async fn list_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummary>> {
    let mut summaries: Vec<RoomSummary> = state
        .sessions
        .room_summaries()
        .into_iter()
        .map(|(room, players, tiles_remaining)| RoomSummary {
            room,
            players,
            tiles_remaining,
        })
        .collect();
    summaries.sort_by(|a, b| a.room.cmp(&b.room));
    Json(summaries)
}
