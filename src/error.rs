// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReviewError>;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Spreadsheet error in {path}: {message}")]
    Spreadsheet { path: PathBuf, message: String },

    #[error("Setup error: {0}")]
    Setup(String),

    #[error("Text extraction failed for {file}: {message}")]
    Extraction { file: String, message: String },

    #[error("Failed to write report {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReviewError {
    /// Errors raised before any report could be written for the run.
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            ReviewError::Config(_)
                | ReviewError::Database(_)
                | ReviewError::Spreadsheet { .. }
                | ReviewError::Setup(_)
                | ReviewError::Validation(_)
        )
    }
}
