use super::{ClientId, Host};
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

/// Connected-client membership with one outbound queue per client.
///
/// Registration and removal happen from connection tasks while the
/// dispatcher delivers, so every broadcast works on a copy of the
/// membership taken when it starts.
#[derive(Default)]
pub struct ClientHub {
    clients: DashMap<ClientId, mpsc::UnboundedSender<String>>,
}

impl ClientHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a client and return the queue its connection task drains
    pub fn register(&self, client: ClientId) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.clients.insert(client, tx);
        rx
    }

    /// Drop a client; its queue closes once pending lines are drained
    pub fn remove(&self, client: &ClientId) -> bool {
        self.clients.remove(client).is_some()
    }

    pub fn contains(&self, client: &ClientId) -> bool {
        self.clients.contains_key(client)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    fn deliver(client: &ClientId, tx: &mpsc::UnboundedSender<String>, text: &str) {
        if tx.send(text.to_string()).is_err() {
            debug!(client = %client, "Client queue closed, dropping message");
        }
    }
}

impl Host for ClientHub {
    fn send_to_one(&self, client: &ClientId, text: &str) {
        // Clone the sender so no map guard is held while sending
        let tx = self.clients.get(client).map(|entry| entry.value().clone());
        match tx {
            Some(tx) => Self::deliver(client, &tx, text),
            None => debug!(client = %client, "Unknown client, dropping message"),
        }
    }

    fn send_to_all(&self, text: &str) {
        let members: Vec<(ClientId, mpsc::UnboundedSender<String>)> = self
            .clients
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        for (client, tx) in &members {
            Self::deliver(client, tx, text);
        }
    }
}
