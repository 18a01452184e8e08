use crate::{
    error::{BoardError, Result},
    storage::Storage,
};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// SQLite-based storage: each named snapshot is one row of `board_snapshots`
pub struct SqliteStorage {
    connection: Mutex<Connection>,
    name: String,
}

impl SqliteStorage {
    const DEFAULT_NAME: &'static str = "kanban-storage";

    /// Opens (or creates) the database file at `database_path`
    pub fn new(database_path: impl AsRef<Path>) -> Result<Self> {
        let connection = Connection::open(database_path).map_err(sqlite_error)?;
        Ok(Self::from_connection(connection))
    }

    /// Private database that disappears when the storage is dropped
    pub fn in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory().map_err(sqlite_error)?;
        Ok(Self::from_connection(connection))
    }

    /// Stores snapshots under `name` instead of the default row key
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn from_connection(connection: Connection) -> Self {
        Self {
            connection: Mutex::new(connection),
            name: Self::DEFAULT_NAME.to_string(),
        }
    }

    fn with_connection<T>(
        &self,
        op: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| BoardError::StorageError("sqlite connection lock poisoned".to_string()))?;
        op(&connection).map_err(sqlite_error)
    }
}

fn sqlite_error(err: rusqlite::Error) -> BoardError {
    BoardError::StorageError(err.to_string())
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn initialize(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS board_snapshots (
                    name TEXT PRIMARY KEY,
                    contents TEXT NOT NULL,
                    saved_at TEXT NOT NULL
                )",
                [],
            )
            .map(|_| ())
        })
    }

    async fn save_snapshot(&self, contents: &str) -> Result<()> {
        let saved_at = Utc::now().to_rfc3339();
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO board_snapshots (name, contents, saved_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(name) DO UPDATE SET contents = excluded.contents, saved_at = excluded.saved_at",
                params![self.name, contents, saved_at],
            )
            .map(|_| ())
        })
    }

    async fn load_snapshot(&self) -> Result<String> {
        let contents = self.with_connection(|conn| {
            conn.query_row(
                "SELECT contents FROM board_snapshots WHERE name = ?1",
                params![self.name],
                |row| row.get::<_, String>(0),
            )
            .optional()
        })?;

        contents.ok_or(BoardError::SnapshotNotFound)
    }

    async fn clear_snapshot(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute(
                "DELETE FROM board_snapshots WHERE name = ?1",
                params![self.name],
            )
            .map(|_| ())
        })
    }

    async fn is_initialized(&self) -> bool {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'board_snapshots'",
                [],
                |row| row.get::<_, i64>(0),
            )
        })
        .map(|count| count > 0)
        .unwrap_or(false)
    }
}
