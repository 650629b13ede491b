// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Extraction failed for {resource}: {message}")]
    Extraction { resource: String, message: String },

    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Row decode error in column {column}: {message}")]
    RowDecode { column: String, message: String },

    #[error("Search index error: {0}")]
    Index(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl IngestError {
    pub fn extraction(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn file_operation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOperation {
            path: path.into(),
            source,
        }
    }
}
