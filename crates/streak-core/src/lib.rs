//! # streak-core
//!
//! Core types, traits, configuration, and error handling for StreakBuddy.

pub mod config;
pub mod error;
pub mod habit;
pub mod message;
pub mod traits;
