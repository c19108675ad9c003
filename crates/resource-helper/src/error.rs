//! Error types for resource-helper

use resource_store::{ResourcePath, StoreError};
use std::path::PathBuf;

/// Result type for resource-helper operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in resource-helper operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Every provisioning attempt failed. Fatal to the caller; nothing is
    /// left half-created that a later call would not also accept.
    #[error("Unable to create resource with path {path} after {attempts} attempts: {source}")]
    ConflictRetryExhausted {
        path: ResourcePath,
        attempts: u32,
        #[source]
        source: StoreError,
    },

    #[error("Cannot provision the root path")]
    EmptyPath,

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The path a provisioning failure was about.
    pub fn path(&self) -> Option<&ResourcePath> {
        match self {
            Self::ConflictRetryExhausted { path, .. } => Some(path),
            _ => None,
        }
    }
}
