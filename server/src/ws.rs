//! WebSocket endpoint streaming server events to connected clients

use crate::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use tracing::{debug, error, info};

/// WebSocket handler for real-time updates
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut listener = state.registry().register().await;
    let id = listener.id();
    info!("🔌 A user connected ({})", id);

    loop {
        tokio::select! {
            event = listener.recv() => {
                let Some(event) = event else { break };

                let json = match event.to_json() {
                    Ok(json) => json,
                    Err(e) => {
                        error!("Failed to encode {} event: {}", event.name(), e);
                        continue;
                    }
                };

                if socket.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    // Clients have nothing to say beyond connect/disconnect.
                    Some(Ok(frame)) => debug!("Ignoring client frame from {}: {:?}", id, frame),
                }
            }
        }
    }

    state.registry().unregister(id).await;
    info!("🔌 User disconnected ({})", id);
}
