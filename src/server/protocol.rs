use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client → Server message types
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// A chat line; commands are chat lines starting with `/`
    #[serde(rename = "chat")]
    Chat { text: String },
}

/// Server → Client: one line of text from the world
#[derive(Debug, Clone, Serialize)]
pub struct ServerMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ServerMessage {
    pub fn new(text: String) -> Self {
        Self {
            msg_type: "message".to_string(),
            text,
            timestamp: Utc::now(),
        }
    }
}
