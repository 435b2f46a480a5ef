use thiserror::Error;

/// Top-level error type for StreakBuddy.
///
/// Expected user-facing outcomes (unknown habit, duplicate habit, malformed
/// reminder time) are not errors; they are variants of the operation results.
#[derive(Debug, Error)]
pub enum StreakError {
    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Durable store error (read or write failed).
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
