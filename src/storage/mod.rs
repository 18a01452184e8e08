use crate::{
    domain::{BoardConfig, BoardState},
    error::{BoardError, Result},
    snapshot,
};
use async_trait::async_trait;
use tracing::{debug, info, warn};

pub mod autosave;
pub mod file_storage;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite_storage;

pub use autosave::Autosave;
pub use file_storage::FileStorage;

#[cfg(feature = "sqlite-storage")]
pub use sqlite_storage::SqliteStorage;

/// Storage medium for encoded board snapshots
///
/// Implementations only move text around; encoding and validation belong
/// to [`crate::snapshot`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Prepares the backend (directories, tables)
    async fn initialize(&self) -> Result<()>;

    /// Replaces the stored snapshot
    async fn save_snapshot(&self, contents: &str) -> Result<()>;

    /// Returns the stored snapshot, or [`BoardError::SnapshotNotFound`]
    async fn load_snapshot(&self) -> Result<String>;

    /// Removes the stored snapshot if there is one
    async fn clear_snapshot(&self) -> Result<()>;

    /// Checks if the backend has been initialized
    async fn is_initialized(&self) -> bool;
}

/// Loads the saved board, falling back to an empty one
///
/// A missing, unreadable or corrupt snapshot is logged and replaced by
/// `BoardState::new(config)`; the stored copy is left as is.
pub async fn restore<S: Storage + ?Sized>(storage: &S, config: &BoardConfig) -> BoardState {
    let contents = match storage.load_snapshot().await {
        Ok(contents) => contents,
        Err(BoardError::SnapshotNotFound) => {
            info!("no saved board snapshot, starting with an empty board");
            return BoardState::new(config);
        }
        Err(err) => {
            warn!(error = %err, "could not read board snapshot, starting with an empty board");
            return BoardState::new(config);
        }
    };

    match snapshot::deserialize(&contents) {
        Ok(state) => {
            info!(cards = state.cards().len(), "board restored from snapshot");
            state
        }
        Err(err) => {
            warn!(
                error = %err,
                kind = ?err.kind(),
                "discarding invalid board snapshot, starting with an empty board"
            );
            BoardState::new(config)
        }
    }
}

/// Encodes `state` and writes it through `storage`
pub async fn persist<S: Storage + ?Sized>(storage: &S, state: &BoardState) -> Result<()> {
    let contents = snapshot::serialize(state)?;
    storage.save_snapshot(&contents).await?;
    debug!(bytes = contents.len(), "board snapshot saved");
    Ok(())
}
