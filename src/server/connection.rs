use crate::host::{ClientHub, ClientId, HostEvent};
use crate::server::protocol::{ClientMessage, ServerMessage};
use axum::extract::ws::{Message, WebSocket};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// What one `WebSocket::recv` result means for the connection loop
#[derive(Debug)]
enum Inbound {
    Text(String),
    Ping(Vec<u8>),
    /// Binary and pong frames
    Ignored,
    /// Close frame, or the stream ended without one
    Closed,
    Failed(axum::Error),
}

fn classify(msg: Option<Result<Message, axum::Error>>) -> Inbound {
    match msg {
        Some(Ok(Message::Text(text))) => Inbound::Text(text),
        Some(Ok(Message::Ping(data))) => Inbound::Ping(data),
        Some(Ok(Message::Close(_))) | None => Inbound::Closed,
        Some(Ok(_)) => Inbound::Ignored,
        Some(Err(e)) => Inbound::Failed(e),
    }
}

/// Drives a single WebSocket client: inbound chat becomes host events,
/// queued outbound lines become frames.
pub struct ClientConnection {
    client: ClientId,
    hub: Arc<ClientHub>,
    events: mpsc::Sender<HostEvent>,
}

impl ClientConnection {
    pub fn new(hub: Arc<ClientHub>, events: mpsc::Sender<HostEvent>) -> Self {
        Self {
            client: ClientId::new(),
            hub,
            events,
        }
    }

    /// Handle WebSocket connection lifecycle
    pub async fn handle(self, mut socket: WebSocket) {
        // Register before announcing the join so the sync lines have a queue
        let mut outbound = self.hub.register(self.client);
        info!(client = %self.client, "WebSocket connection established");

        if self.events.send(HostEvent::ClientJoined(self.client)).await.is_err() {
            error!("Dispatcher stopped, closing connection");
            self.hub.remove(&self.client);
            return;
        }

        loop {
            tokio::select! {
                // Handle incoming client messages
                msg = socket.recv() => {
                    match classify(msg) {
                        Inbound::Text(text) => {
                            if let Err(e) = self.handle_client_message(&text).await {
                                warn!(client = %self.client, error = %e, "Error handling client message");
                            }
                        }
                        Inbound::Ping(data) => {
                            if let Err(e) = socket.send(Message::Pong(data)).await {
                                error!(error = %e, "Failed to send pong");
                                break;
                            }
                        }
                        Inbound::Ignored => {}
                        Inbound::Closed => {
                            info!(client = %self.client, "WebSocket client disconnected");
                            break;
                        }
                        Inbound::Failed(e) => {
                            warn!(client = %self.client, error = %e, "WebSocket error");
                            break;
                        }
                    }
                }

                // Lines queued for this client by the dispatcher
                line = outbound.recv() => {
                    match line {
                        Some(text) => {
                            if let Err(e) = self.send_line(&mut socket, text).await {
                                error!(client = %self.client, error = %e, "Failed to send message");
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
        }

        self.hub.remove(&self.client);
        let _ = self.events.send(HostEvent::ClientLeft(self.client)).await;
        info!(client = %self.client, "WebSocket connection closed");
    }

    async fn handle_client_message(&self, text: &str) -> anyhow::Result<()> {
        let msg: ClientMessage = serde_json::from_str(text)?;

        match msg {
            ClientMessage::Chat { text } => {
                self.events
                    .send(HostEvent::Chat {
                        client: self.client,
                        text,
                    })
                    .await?;
            }
        }

        Ok(())
    }

    async fn send_line(&self, socket: &mut WebSocket, text: String) -> anyhow::Result<()> {
        let json = serde_json::to_string(&ServerMessage::new(text))?;
        socket.send(Message::Text(json)).await?;
        Ok(())
    }
}
