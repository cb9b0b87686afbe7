use crate::{
    session::{deliver, Outbox},
    websocket::messages::{ClientMessage, ServerMessage},
    AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// WebSocket upgrade handler. Each socket gets a fresh connection handle;
/// there is no identity beyond it.
pub async fn handle_websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let conn_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(100);

    tracing::info!("WebSocket connection established: {}", conn_id);

    // Spawn a task to send messages to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                }
            }
        }
    });

    // Handle incoming messages from the client
    let state_for_recv = state.clone();
    let tx_for_recv = tx.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        let outbox = handle_client_message(
                            client_msg,
                            &state_for_recv,
                            &tx_for_recv,
                            conn_id,
                        );
                        deliver(outbox).await;
                    }
                    Err(e) => {
                        tracing::debug!("Failed to parse message from {}: {}", conn_id, e);
                        let error_msg = ServerMessage::Error {
                            message: format!("Invalid message format: {}", e),
                        };
                        let _ = tx_for_recv.send(error_msg).await;
                    }
                },
                Message::Close(_) => {
                    tracing::info!("Client disconnected: {}", conn_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
        }
    }

    // Drop the player from whatever room the connection sat in
    let outbox = state.sessions.leave(conn_id);
    deliver(outbox).await;

    tracing::info!("WebSocket connection closed: {}", conn_id);
}

/// Route one parsed client message into the session manager
fn handle_client_message(
    msg: ClientMessage,
    state: &AppState,
    tx: &mpsc::Sender<ServerMessage>,
    conn_id: Uuid,
) -> Outbox {
    match msg {
        ClientMessage::JoinRoom { room, name } => {
            tracing::info!("{} joining room '{}' as '{}'", conn_id, room, name);
            state.sessions.join_room(conn_id, name, room, tx.clone())
        }
        ClientMessage::JoinPractice { name } => {
            tracing::info!("{} opening a practice room as '{}'", conn_id, name);
            state.sessions.join_practice(conn_id, name, tx.clone())
        }
        ClientMessage::AddBot => {
            tracing::info!("{} adding a bot", conn_id);
            state.sessions.add_bot(conn_id)
        }
        ClientMessage::PlaceTiles { tiles } => {
            tracing::debug!("{} placing {} tiles", conn_id, tiles.len());
            state.sessions.place_tiles(conn_id, tiles)
        }
        ClientMessage::SwapTiles { letters } => {
            tracing::debug!("{} swapping {} tiles", conn_id, letters.len());
            state.sessions.swap_tiles(conn_id, letters)
        }
        ClientMessage::PassTurn => {
            tracing::debug!("{} passing", conn_id);
            state.sessions.pass_turn(conn_id)
        }
    }
}
