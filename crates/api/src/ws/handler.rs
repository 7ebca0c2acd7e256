//! WebSocket upgrade handler for notification delivery.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use uuid::Uuid;

use crate::AppState;
use crate::ws::Dispatcher;

/// HTTP handler that upgrades the connection to WebSocket.
///
/// The session is keyed by the `user_id` path segment; a second connection
/// for the same user replaces the first.
pub async fn notifications_ws(
    ws: WebSocketUpgrade,
    Path(user_id): Path<Uuid>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, user_id, state.dispatcher))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the session with the dispatcher.
///   2. Spawns a sender task that forwards dispatched messages to the sink.
///   3. Drains inbound messages on the current task until close.
///   4. Cleans up on disconnect without evicting a newer session.
async fn handle_socket(socket: WebSocket, user_id: Uuid, dispatcher: Arc<Dispatcher>) {
    tracing::info!(user_id = %user_id, "WebSocket connected");

    let (sender, mut rx) = dispatcher.register(user_id).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward dispatched messages to the WebSocket sink.
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(user_id = %user_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: clients only listen, so inbound traffic is drained.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(user_id = %user_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    dispatcher.unregister(user_id, &sender).await;
    send_task.abort();
    tracing::info!(user_id = %user_id, "WebSocket disconnected");
}
