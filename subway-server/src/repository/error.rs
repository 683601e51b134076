//! Repository error types.

use crate::domain::LineId;

/// Errors that can occur when reading or writing stored data.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Line to save no longer exists
    #[error("line {0} does not exist")]
    MissingLine(LineId),

    /// Snapshot file could not be read or written
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is not valid JSON
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot parsed but holds invalid data
    #[error("corrupt snapshot: {message}")]
    Corrupt { message: String },
}
