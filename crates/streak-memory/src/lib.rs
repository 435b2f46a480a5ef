//! # streak-memory
//!
//! Durable store (JSON document or SQLite) and the habit ledger on top of it.

pub mod document;
pub mod ledger;
pub mod store;

pub use document::{HabitBook, HabitRecord, StoreState, UserRecord};
pub use ledger::Ledger;
pub use store::{Mutation, StateBackend, Store};
