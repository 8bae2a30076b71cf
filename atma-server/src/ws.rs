//! WebSocket endpoint for status viewers.

use crate::state::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error};

/// `GET /ws`: upgrades to a viewer connection that receives a copy of
/// every status event broadcast while it is open.
pub async fn viewer_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_viewer(socket, state))
}

async fn handle_viewer(socket: WebSocket, state: AppState) {
    debug!("viewer connected");
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.channel.subscribe();

    // Forward every broadcast event to this viewer as a JSON text frame.
    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => {
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        error!(error = %err, "failed to serialize status event");
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "viewer lagged behind the broadcast");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Viewers are passive; we only watch for the close frame.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            if matches!(message, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
    debug!("viewer disconnected");
}
