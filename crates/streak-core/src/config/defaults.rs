//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "StreakBuddy".to_string()
}

pub fn default_data_dir() -> String {
    "~/.streakbuddy".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_language() -> String {
    "English".to_string()
}

pub fn default_timezone() -> String {
    "Europe/Moscow".to_string()
}

pub fn default_store_backend() -> String {
    "json".to_string()
}
