//! # streak-channels
//!
//! Messaging platform integrations for StreakBuddy.

pub mod telegram;
pub mod utils;
