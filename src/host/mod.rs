// Host collaborator interface: client identity, outbound delivery, inbound events

mod hub;

pub use hub::ClientHub;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[cfg(test)]
mod tests;

/// Opaque identity of one connected client
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough to tell clients apart in chat and logs
        let id = self.0.simple().to_string();
        f.write_str(&id[..8])
    }
}

/// Text delivery provided by the host.
///
/// Implementations decide transport, framing and encoding; callers only
/// hand over a line of text.
pub trait Host {
    /// Deliver `text` to one client. Unknown clients are ignored.
    fn send_to_one(&self, client: &ClientId, text: &str);

    /// Deliver `text` to every client connected when the call starts
    fn send_to_all(&self, text: &str);
}

impl<H: Host + ?Sized> Host for std::sync::Arc<H> {
    fn send_to_one(&self, client: &ClientId, text: &str) {
        (**self).send_to_one(client, text)
    }

    fn send_to_all(&self, text: &str) {
        (**self).send_to_all(text)
    }
}

/// Events the host feeds into the dispatcher
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    ClientJoined(ClientId),
    ClientLeft(ClientId),
    Chat { client: ClientId, text: String },
    Tick { elapsed_seconds: f32 },
}
