//! Error types for the vocabulary trainer.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the trainer library.
#[derive(Error, Debug)]
pub enum TrainerError {
    /// Error saving a trained vocabulary or merge table
    #[error("Save error: {0}")]
    Save(String),

    /// I/O error with file context
    #[error("I/O error for {path}: {err}")]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unknown token ID
    #[error("Unknown token ID: {0}")]
    UnknownTokenId(u32),
}

/// Result type alias for trainer operations.
pub type Result<T> = std::result::Result<T, TrainerError>;
