mod channels;
mod defaults;


pub use channels::*;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::StreakError;
use defaults::*;

/// Environment variable that fills an empty `channel.telegram.bot_token`.
pub const TELEGRAM_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Top-level StreakBuddy configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Also write a daily-rolling log file under `{data_dir}/logs`.
    #[serde(default)]
    pub log_to_file: bool,
    /// Reply language ("English" or "Russian").
    #[serde(default = "default_language")]
    pub language: String,
    /// IANA timezone for "today" and reminder wall-clock times. Same for all users.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            log_to_file: false,
            language: default_language(),
            timezone: default_timezone(),
        }
    }
}

impl BotConfig {
    /// Parse the configured timezone.
    pub fn tz(&self) -> Result<Tz, StreakError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| StreakError::Config(format!("invalid timezone '{}': {e}", self.timezone)))
    }
}

/// Durable store config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// "json" (single document file) or "sqlite".
    #[serde(default = "default_store_backend")]
    pub backend: String,
    /// Explicit path. Empty = `{data_dir}/data.json` or `{data_dir}/data.db`.
    #[serde(default)]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            path: String::new(),
        }
    }
}

impl StoreConfig {
    /// Resolve the backing file path, expanding `~/`.
    pub fn resolved_path(&self, data_dir: &str) -> String {
        if !self.path.is_empty() {
            return shellexpand(&self.path);
        }
        let file = if self.backend == "sqlite" {
            "data.db"
        } else {
            "data.json"
        };
        format!("{}/{file}", shellexpand(data_dir).trim_end_matches('/'))
    }
}

/// Expand `~/` to the home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. An empty Telegram token
/// is filled from `TELEGRAM_BOT_TOKEN` when that variable is set.
pub fn load(path: &str) -> Result<Config, StreakError> {
    let path = Path::new(path);
    let mut config = if !path.exists() {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    } else {
        let content = std::fs::read_to_string(path)
            .map_err(|e| StreakError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| StreakError::Config(format!("failed to parse config: {}", e)))?
    };

    apply_env_token(&mut config, std::env::var(TELEGRAM_TOKEN_ENV).ok());

    // Fail fast on a bad timezone instead of at the first reminder.
    config.bot.tz()?;

    Ok(config)
}

/// Fill an empty Telegram token from the environment, enabling the channel.
fn apply_env_token(config: &mut Config, token: Option<String>) {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return;
    };
    let tg = config.channel.telegram.get_or_insert_with(|| TelegramConfig {
        enabled: true,
        ..Default::default()
    });
    if tg.bot_token.is_empty() {
        tg.bot_token = token;
    }
}
