use crate::{
    error::StreakError,
    message::{IncomingMessage, OutgoingMessage},
};
use async_trait::async_trait;

/// Messaging Channel trait.
///
/// Every messaging platform implements this trait to receive and send
/// plain text messages.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, StreakError>;

    /// Send a message through this channel.
    async fn send(&self, message: OutgoingMessage) -> Result<(), StreakError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), StreakError>;
}

/// Notification sink used by the reminder scheduler.
///
/// The scheduler only ever needs "deliver this text to user X".
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, user_id: i64, text: &str) -> Result<(), StreakError>;
}
