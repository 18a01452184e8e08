use crate::domain::ordering::OrderingError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Index {index} out of range for column {column} with {len} cards")]
    IndexOutOfRange {
        column: String,
        index: usize,
        len: usize,
    },

    #[error("Card id already in use: {0}")]
    DuplicateCardId(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Card {card} is not in column {column}")]
    CardNotInColumn { card: String, column: String },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Corrupt board state: {0}")]
    CorruptState(String),

    #[error("Unsupported snapshot version {found} (newest known is {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Snapshot is not valid JSON: {0}")]
    Deserialization(String),

    #[error(transparent)]
    Ordering(#[from] OrderingError),

    #[error("No saved board snapshot")]
    SnapshotNotFound,

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Coarse classification callers can branch on without matching every variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    CorruptState,
    Deserialization,
    Storage,
}

impl BoardError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::CorruptState(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::IndexOutOfRange { .. } | Self::DuplicateCardId(_) => {
                ErrorKind::Validation
            }
            Self::CardNotFound(_) | Self::CardNotInColumn { .. } | Self::ColumnNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Ordering(OrderingError::IndexOutOfRange { .. })
            | Self::Ordering(OrderingError::AlreadyPresent) => ErrorKind::Validation,
            Self::Ordering(OrderingError::NotPresent) => ErrorKind::NotFound,
            Self::CorruptState(_) | Self::UnsupportedVersion { .. } => ErrorKind::CorruptState,
            Self::Deserialization(_) => ErrorKind::Deserialization,
            Self::SnapshotNotFound
            | Self::StorageError(_)
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorKind::Storage,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
