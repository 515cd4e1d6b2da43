// WebSocket host: each socket is a client, each text frame a chat line

mod connection;
mod dispatcher;
pub mod protocol;

pub use connection::ClientConnection;
pub use dispatcher::{handle_event, run_dispatcher};
pub use protocol::{ClientMessage, ServerMessage};

use crate::host::{ClientHub, HostEvent};
use axum::{
    extract::{
        ws::{WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Shared application state for the WebSocket handler
#[derive(Clone)]
pub struct WsAppState {
    pub hub: Arc<ClientHub>,
    pub events: mpsc::Sender<HostEvent>,
}

/// GET /ws - WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<WsAppState>>) -> Response {
    info!("WebSocket upgrade request received");
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// GET /health
async fn health() -> &'static str {
    "ok"
}

/// Create the host router
pub fn create_router(state: Arc<WsAppState>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .with_state(state)
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<WsAppState>) {
    let connection = ClientConnection::new(Arc::clone(&state.hub), state.events.clone());
    connection.handle(socket).await;
}
