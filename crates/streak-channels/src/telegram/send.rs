//! Message sending and command registration.

use super::types::{SendMessage, COMMAND_MENU};
use super::TelegramChannel;
use crate::utils::split_message;
use streak_core::error::StreakError;
use tracing::{info, warn};

/// Telegram's per-message text limit.
const MAX_MESSAGE_LEN: usize = 4096;

impl TelegramChannel {
    /// Send a text message to a specific chat.
    ///
    /// Tries Markdown first and falls back to plain text when Telegram
    /// rejects the entities (habit names may contain `_` or `*`).
    pub(crate) async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), StreakError> {
        for chunk in split_message(text, MAX_MESSAGE_LEN) {
            let url = format!("{}/sendMessage", self.base_url);
            let body = SendMessage {
                chat_id,
                text: chunk,
                parse_mode: Some("Markdown"),
            };

            let resp = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| StreakError::Channel(format!("telegram send failed: {e}")))?;

            let status = resp.status();
            if status.is_success() {
                continue;
            }

            let error_text = resp.text().await.unwrap_or_default();
            if !error_text.contains("can't parse entities") {
                return Err(StreakError::Channel(format!(
                    "telegram send failed ({status}): {error_text}"
                )));
            }

            warn!("Markdown parse failed, retrying as plain text: {error_text}");
            let plain_body = SendMessage {
                chat_id,
                text: chunk,
                parse_mode: None,
            };
            let plain_resp = self
                .client
                .post(&url)
                .json(&plain_body)
                .send()
                .await
                .map_err(|e| StreakError::Channel(format!("telegram send (plain) failed: {e}")))?;
            if !plain_resp.status().is_success() {
                let plain_err = plain_resp.text().await.unwrap_or_default();
                return Err(StreakError::Channel(format!(
                    "telegram send (plain fallback) failed: {plain_err}"
                )));
            }
        }

        Ok(())
    }

    /// Register bot commands with Telegram so users see an autocomplete menu.
    /// Best-effort: logs failures but does not propagate errors.
    pub(crate) async fn register_commands(&self) {
        let commands = serde_json::json!({ "commands": COMMAND_MENU });

        let url = format!("{}/setMyCommands", self.base_url);
        match self.client.post(&url).json(&commands).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("registered Telegram bot commands");
            }
            Ok(resp) => {
                let body = resp.text().await.unwrap_or_default();
                warn!("failed to register Telegram bot commands: {body}");
            }
            Err(e) => {
                warn!("failed to register Telegram bot commands: {e}");
            }
        }
    }
}
