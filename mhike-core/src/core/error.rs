//! Error types for the M-Hike core library.

use thiserror::Error;

/// All errors that can occur within the M-Hike core library.
#[derive(Debug, Error)]
pub enum HikeLogError {
    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A hike ID was required to exist but does not.
    #[error("Hike not found: {0}")]
    HikeNotFound(i64),

    /// An observation ID was required to exist but does not.
    #[error("Observation not found: {0}")]
    ObservationNotFound(i64),

    /// A required field was empty or out of range when trying to save a record.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// A stored row could not be turned back into a record.
    #[error("Corrupt {table} row {id}: {reason}")]
    CorruptRecord {
        table: &'static str,
        id: i64,
        reason: String,
    },

    /// The store was used after [`close`](crate::StorageBackend::close).
    #[error("Store is closed")]
    StoreClosed,

    /// A blocking database task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    BackgroundTask(#[from] tokio::task::JoinError),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Data could not be serialized to or from JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`HikeLogError`].
pub type Result<T> = std::result::Result<T, HikeLogError>;

impl HikeLogError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::HikeNotFound(_) => "Hike no longer exists".to_string(),
            Self::ObservationNotFound(_) => "Observation no longer exists".to_string(),
            Self::ValidationFailed(msg) => msg.clone(),
            Self::CorruptRecord { table, .. } => format!("A stored {table} record is damaged"),
            Self::StoreClosed => "The logbook is closed".to_string(),
            Self::BackgroundTask(e) => format!("Internal error: {e}"),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
        }
    }

    /// True for failures raised by the storage layer rather than by the caller's input.
    pub fn is_storage_failure(&self) -> bool {
        !matches!(
            self,
            Self::ValidationFailed(_) | Self::HikeNotFound(_) | Self::ObservationNotFound(_)
        )
    }
}
