//! Error types for timer export.
//!
//! The core operations never fail. `report` hands back the sink's own
//! `std::io::Error` untouched; only the JSON export path uses these types.

use thiserror::Error;

/// Errors that can occur while exporting timers.
#[derive(Debug, Error)]
pub enum ProfTimerError {
    /// Writing to the output sink failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize timer snapshots
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for timer export operations.
pub type ProfTimerResult<T> = Result<T, ProfTimerError>;
