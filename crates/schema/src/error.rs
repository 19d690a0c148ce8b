//! Error types for schema generation

use std::path::PathBuf;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Raised when a model schema cannot be produced
#[derive(Error, Debug)]
#[error("{message}")]
pub struct SchemaGenerationError {
    message: String,
    #[source]
    cause: Option<BoxError>,
}

impl SchemaGenerationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Raised when a generated document cannot be written
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Output path {path} escapes output directory {base}")]
    PathEscape { path: PathBuf, base: PathBuf },

    #[error("Invalid output file name: {0:?}")]
    InvalidFileName(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
