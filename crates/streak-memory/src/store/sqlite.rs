//! SQLite backend: one row per user, each write replacing a single row.

use super::StateBackend;
use crate::document::{StoreState, UserRecord};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use streak_core::error::StreakError;
use tracing::warn;

/// SQLite-backed store.
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    /// Open (creating if missing) the database at `db_path` and run migrations.
    pub async fn new(db_path: &str) -> Result<Self, StreakError> {
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StreakError::Storage(format!("failed to create data dir: {e}")))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| StreakError::Storage(format!("invalid db path: {e}")))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(opts)
            .await
            .map_err(|e| StreakError::Storage(format!("failed to connect to sqlite: {e}")))?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, running migrations on it.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StreakError> {
        Self::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Run SQL migrations, tracking which have already been applied.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), StreakError> {
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS _migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .execute(pool)
        .await
        .map_err(|e| StreakError::Storage(format!("failed to create migrations table: {e}")))?;

        let migrations: &[(&str, &str)] =
            &[("001_init", include_str!("../../migrations/001_init.sql"))];

        for &(name, sql) in migrations {
            let applied: Option<(String,)> =
                sqlx::query_as("SELECT name FROM _migrations WHERE name = ?")
                    .bind(name)
                    .fetch_optional(pool)
                    .await
                    .map_err(|e| {
                        StreakError::Storage(format!("failed to check migration {name}: {e}"))
                    })?;
            if applied.is_some() {
                continue;
            }

            sqlx::raw_sql(sql)
                .execute(pool)
                .await
                .map_err(|e| StreakError::Storage(format!("migration {name} failed: {e}")))?;

            sqlx::query("INSERT INTO _migrations (name) VALUES (?)")
                .bind(name)
                .execute(pool)
                .await
                .map_err(|e| {
                    StreakError::Storage(format!("failed to record migration {name}: {e}"))
                })?;
        }

        Ok(())
    }
}

#[async_trait]
impl StateBackend for SqliteBackend {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn load(&self) -> Result<StoreState, StreakError> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT user_id, record FROM users ORDER BY user_id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StreakError::Storage(format!("load users failed: {e}")))?;

        let mut state = StoreState::default();
        for (user_id, record) in rows {
            match serde_json::from_str::<UserRecord>(&record) {
                Ok(user) => {
                    state.users.insert(user_id, user);
                }
                Err(e) => warn!("store: skipping corrupt record for user {user_id}: {e}"),
            }
        }
        Ok(state)
    }

    async fn load_user(&self, user_id: i64) -> Result<UserRecord, StreakError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT record FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StreakError::Storage(format!("load user {user_id} failed: {e}")))?;

        let Some((record,)) = row else {
            return Ok(UserRecord::default());
        };
        match serde_json::from_str::<UserRecord>(&record) {
            Ok(user) => Ok(user),
            Err(e) => {
                warn!("store: corrupt record for user {user_id}, treating as empty: {e}");
                Ok(UserRecord::default())
            }
        }
    }

    async fn save_user(&self, user_id: i64, user: &UserRecord) -> Result<(), StreakError> {
        let record = serde_json::to_string(user)?;
        sqlx::query(
            "INSERT OR REPLACE INTO users (user_id, record, updated_at) \
             VALUES (?, ?, datetime('now'))",
        )
        .bind(user_id)
        .bind(record)
        .execute(&self.pool)
        .await
        .map_err(|e| StreakError::Storage(format!("save user {user_id} failed: {e}")))?;
        Ok(())
    }
}
