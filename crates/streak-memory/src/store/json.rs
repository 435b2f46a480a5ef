//! Single-document JSON file backend.

use super::StateBackend;
use crate::document::{StoreState, UserRecord};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use streak_core::error::StreakError;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

/// What is on disk right now.
enum OnDisk {
    /// Missing or blank file.
    Empty,
    Parsed(StoreState),
    Corrupt(serde_json::Error),
}

/// Stores every user as one pretty-printed JSON file.
pub struct JsonFileBackend {
    path: PathBuf,
    /// Held across read-merge-rename so writers for different users do not
    /// drop each other's records.
    document_lock: Mutex<()>,
}

impl JsonFileBackend {
    /// Create the backend, making sure the parent directory exists.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StreakError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StreakError::Storage(format!("failed to create data dir: {e}")))?;
        }
        Ok(Self {
            path,
            document_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<OnDisk, StreakError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("store: {} not found, starting empty", self.path.display());
                return Ok(OnDisk::Empty);
            }
            Err(e) => {
                return Err(StreakError::Storage(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(OnDisk::Empty);
        }

        Ok(match serde_json::from_slice::<StoreState>(&bytes) {
            Ok(state) => OnDisk::Parsed(state),
            Err(e) => OnDisk::Corrupt(e),
        })
    }

    /// Move an unreadable document aside so the next write does not destroy
    /// it. Only called with `document_lock` held.
    async fn quarantine(&self) {
        let mut target = self.path.clone().into_os_string();
        target.push(".corrupt");
        match tokio::fs::rename(&self.path, &target).await {
            Ok(()) => warn!(
                "store: moved corrupt document to {}",
                PathBuf::from(target).display()
            ),
            Err(e) => warn!("store: could not move corrupt document aside: {e}"),
        }
    }

    async fn write(&self, state: &StoreState) -> Result<(), StreakError> {
        let body = serde_json::to_vec_pretty(state)?;
        let tmp = self.temp_path();

        let write = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(&body).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp, &self.path).await
        };

        if let Err(e) = write.await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StreakError::Storage(format!(
                "failed to write {}: {e}",
                self.path.display()
            )));
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "data.json".to_string());
        self.path
            .with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4()))
    }
}

#[async_trait]
impl StateBackend for JsonFileBackend {
    fn name(&self) -> &str {
        "json"
    }

    async fn load(&self) -> Result<StoreState, StreakError> {
        match self.read().await? {
            OnDisk::Empty => Ok(StoreState::default()),
            OnDisk::Parsed(state) => Ok(state),
            OnDisk::Corrupt(e) => {
                warn!(
                    "store: {} is corrupt, treating as empty: {e}",
                    self.path.display()
                );
                Ok(StoreState::default())
            }
        }
    }

    async fn save_user(&self, user_id: i64, user: &UserRecord) -> Result<(), StreakError> {
        let _guard = self.document_lock.lock().await;
        let mut state = match self.read().await? {
            OnDisk::Empty => StoreState::default(),
            OnDisk::Parsed(state) => state,
            OnDisk::Corrupt(e) => {
                warn!(
                    "store: {} is corrupt, starting a new document: {e}",
                    self.path.display()
                );
                self.quarantine().await;
                StoreState::default()
            }
        };
        state.users.insert(user_id, user.clone());
        self.write(&state).await
    }
}
