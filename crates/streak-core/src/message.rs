use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An incoming text message from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub id: Uuid,
    /// Channel name (e.g. "telegram").
    pub channel: String,
    /// Platform chat identifier. Doubles as the user key in the store.
    pub chat_id: i64,
    /// Human-readable sender name.
    pub sender_name: Option<String>,
    /// Message text content.
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl IncomingMessage {
    /// Build a message arriving on `channel` from `chat_id` right now.
    pub fn new(channel: &str, chat_id: i64, text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel: channel.to_string(),
            chat_id,
            sender_name: None,
            text: text.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// An outgoing text message to send back through a channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    /// Platform chat identifier to deliver to.
    pub chat_id: i64,
}
