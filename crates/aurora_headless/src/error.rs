//! Error types for the headless runner.

use thiserror::Error;

/// Errors that can stop a headless command.
#[derive(Debug, Error)]
pub enum HeadlessError {
    /// The game rejected an operation or a file.
    #[error(transparent)]
    Game(#[from] aurora_core::error::GameError),

    /// A report could not be serialized.
    #[error("Failed to encode JSON report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for headless operations.
pub type Result<T> = std::result::Result<T, HeadlessError>;
