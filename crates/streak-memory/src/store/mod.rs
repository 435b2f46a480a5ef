//! Durable store: every user's habits and reminders.
//!
//! Split into backends:
//! - `json`: one JSON document, replaced atomically on every write
//! - `sqlite`: one row per user, each write touching only its own row
//!
//! Callers never hold state between calls: every mutation is a fresh
//! load-mutate-save cycle of one user's record through [`Store::update`].

mod json;
mod sqlite;


pub use json::JsonFileBackend;
pub use sqlite::SqliteBackend;

use crate::document::{StoreState, UserRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use streak_core::{config::StoreConfig, error::StreakError, habit::ReminderTime};
use tokio::sync::Mutex;
use tracing::info;

/// Where user records live.
///
/// Reads treat a missing or unparsable resource as empty and have no side
/// effects; only genuine I/O failures are returned as errors. `save_user`
/// must be atomic and must leave other users' records untouched.
#[async_trait]
pub trait StateBackend: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Every user.
    async fn load(&self) -> Result<StoreState, StreakError>;

    /// One user. Unknown users read as an empty record.
    async fn load_user(&self, user_id: i64) -> Result<UserRecord, StreakError> {
        let mut state = self.load().await?;
        Ok(state.users.remove(&user_id).unwrap_or_default())
    }

    async fn save_user(&self, user_id: i64, user: &UserRecord) -> Result<(), StreakError>;
}

/// Result of a mutation closure passed to [`Store::update`].
pub enum Mutation<R> {
    /// The record changed and must be saved.
    Changed(R),
    /// Nothing changed; skip the write.
    Unchanged(R),
}

/// Shared handle to the durable store.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn StateBackend>,
    /// One lock per user, held for that user's load-mutate-save cycle.
    /// Reads do not take it.
    user_locks: Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl Store {
    /// Open the backend selected in config.
    pub async fn open(config: &StoreConfig, data_dir: &str) -> Result<Self, StreakError> {
        let path = config.resolved_path(data_dir);
        let backend: Arc<dyn StateBackend> = match config.backend.as_str() {
            "json" => Arc::new(JsonFileBackend::new(&path)?),
            "sqlite" => Arc::new(SqliteBackend::new(&path).await?),
            other => {
                return Err(StreakError::Config(format!(
                    "unsupported store backend: {other}"
                )))
            }
        };
        info!("Store initialized ({}) at {path}", backend.name());
        Ok(Self::with_backend(backend))
    }

    /// Wrap an already constructed backend.
    pub fn with_backend(backend: Arc<dyn StateBackend>) -> Self {
        Self {
            backend,
            user_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Full snapshot of the store.
    pub async fn load(&self) -> Result<StoreState, StreakError> {
        self.backend.load().await
    }

    /// Snapshot of one user. Unknown users read as an empty record.
    pub async fn user(&self, user_id: i64) -> Result<UserRecord, StreakError> {
        self.backend.load_user(user_id).await
    }

    /// Load the user's latest record (created lazily), apply `f` and save if
    /// `f` reports a change. Cycles for the same user run one at a time;
    /// different users never wait on each other here.
    pub async fn update<R, F>(&self, user_id: i64, f: F) -> Result<R, StreakError>
    where
        F: FnOnce(&mut UserRecord) -> Mutation<R> + Send,
        R: Send,
    {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;
        let mut user = self.backend.load_user(user_id).await?;
        match f(&mut user) {
            Mutation::Changed(r) => {
                self.backend.save_user(user_id, &user).await?;
                Ok(r)
            }
            Mutation::Unchanged(r) => Ok(r),
        }
    }

    async fn user_lock(&self, user_id: i64) -> Arc<Mutex<()>> {
        self.user_locks
            .lock()
            .await
            .entry(user_id)
            .or_default()
            .clone()
    }

    /// Every persisted reminder as `(user_id, habit, time)`.
    pub async fn all_reminders(&self) -> Result<Vec<(i64, String, ReminderTime)>, StreakError> {
        let state = self.backend.load().await?;
        Ok(state
            .users
            .into_iter()
            .flat_map(|(user_id, user)| {
                user.reminders
                    .into_iter()
                    .map(move |(habit, time)| (user_id, habit, time))
            })
            .collect())
    }
}
