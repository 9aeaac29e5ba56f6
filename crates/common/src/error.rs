//! Error types shared across mvstab crates.

use std::path::PathBuf;

use mvstab_field_model::FieldError;

/// Top-level error type for mvstab operations.
#[derive(Debug, thiserror::Error)]
pub enum StabError {
    #[error("Processing error: {message}")]
    Processing { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using StabError.
pub type StabResult<T> = Result<T, StabError>;

impl StabError {
    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing {
            message: msg.into(),
        }
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}
