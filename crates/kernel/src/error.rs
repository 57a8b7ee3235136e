//! Application error types.
//!
//! The rendering pipeline itself never fails; these errors only surface at
//! the edges where records, files and configuration are read.

use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid blog record: {0}")]
    InvalidRecord(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
