//! WebSocket transport for the playground page.

use std::sync::Arc;

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use luapad_core::{Executor, StoreEvent};
use luapad_session::RunManager;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::protocol::{ClientMessage, EntryView, ServerMessage};

/// WebSocket handler state.
#[derive(Clone)]
pub struct WsState {
    /// Executor shared by all connections; each connection gets its own
    /// run session and store.
    pub executor: Arc<dyn Executor>,
}

impl WsState {
    /// Create new WebSocket state.
    #[must_use]
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }
}

/// WebSocket upgrade handler.
///
/// Use this as an Axum route handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<WsState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: WsState) {
    let (mut sender, mut receiver) = socket.split();
    let conn_id = Uuid::new_v4();

    let manager = Arc::new(RunManager::new(Arc::clone(&state.executor)));
    let store = manager.store();

    // Channel for messages headed to the page.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Spawn task to forward messages to the WebSocket.
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(j) => j,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {e}");
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // Replay store history, then forward live events.
    let event_tx = tx.clone();
    let mut events = store.history_plus_stream();
    let forward_task = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            let msg = match event {
                StoreEvent::Appended(entry) => ServerMessage::Entry {
                    entry: EntryView::from(&entry),
                },
                StoreEvent::Reset => ServerMessage::Reset,
            };
            if event_tx.send(msg).is_err() {
                break;
            }
        }
    });

    tracing::info!("playground client {conn_id} connected");

    // Handle incoming messages.
    while let Some(msg) = receiver.next().await {
        let text = match msg {
            Ok(Message::Text(t)) => t,
            Ok(Message::Binary(data)) => match String::from_utf8(data.to_vec()) {
                Ok(s) => s.into(),
                Err(_) => continue,
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::error!("WebSocket error: {e}");
                break;
            }
        };

        let client_msg: ClientMessage = match serde_json::from_str(&text) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Ignoring invalid client message: {e}");
                continue;
            }
        };

        match client_msg {
            ClientMessage::Run { code } => {
                if let Err(e) = manager.submit(code).await {
                    tracing::error!("Failed to dispatch run: {e}");
                }
            }
            ClientMessage::ClearConsole => manager.clear_console(),
            ClientMessage::Ping => {
                let _ = tx.send(ServerMessage::Pong);
            }
        }
    }

    forward_task.abort();
    send_task.abort();
    tracing::info!("playground client {conn_id} disconnected");
}

/// Create a router exposing the WebSocket at `/ws`.
///
/// # Example
/// ```ignore
/// let app = Router::new()
///     .merge(create_ws_router(executor));
/// ```
#[must_use]
pub fn create_ws_router(executor: Arc<dyn Executor>) -> axum::Router {
    axum::Router::new()
        .route("/ws", axum::routing::get(ws_handler))
        .with_state(WsState::new(executor))
}

#[cfg(test)]
mod tests {
    use luapad_sandbox::LuaSandbox;

    use super::*;

    #[tokio::test]
    async fn test_router_builds() {
        let _router = create_ws_router(Arc::new(LuaSandbox::new()));
    }
}
