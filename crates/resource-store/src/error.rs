//! Error types for resource-store

use crate::ResourcePath;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors a [`ResourceStore`](crate::ResourceStore) reports for a single call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Another writer created the node between lookup and create.
    #[error("Conflicting write at {path}")]
    Conflict { path: ResourcePath },

    #[error("Persistence failure at {path}: {message}")]
    Persistence { path: ResourcePath, message: String },

    #[error("Invalid store request: {message}")]
    InvalidRequest { message: String },
}

impl StoreError {
    pub fn conflict(path: &ResourcePath) -> Self {
        Self::Conflict { path: path.clone() }
    }

    pub fn persistence(path: &ResourcePath, message: impl Into<String>) -> Self {
        Self::Persistence {
            path: path.clone(),
            message: message.into(),
        }
    }

    /// The path the failed call was addressing, when known.
    pub fn path(&self) -> Option<&ResourcePath> {
        match self {
            Self::Conflict { path } | Self::Persistence { path, .. } => Some(path),
            Self::InvalidRequest { .. } => None,
        }
    }
}
