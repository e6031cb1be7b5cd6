//! Error types shared by the moderation core.

use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by a [`Dispatcher`](crate::dispatcher::Dispatcher).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The platform refused the operation (missing permission, HTTP 403).
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Any other platform or network failure.
    #[error("transport failure: {0}")]
    Other(String),
}

impl TransportError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, TransportError::PermissionDenied(_))
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    /// The persisted configuration exists but cannot be read into the schema.
    #[error("configuration at {path} is corrupt: {reason}")]
    ConfigCorrupt { path: PathBuf, reason: String },

    #[error("failed to access configuration at {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Only ever reported to the diagnostic stream, never to callers of
    /// `ActionLogger::record`.
    #[error("failed to write action log {path}: {source}")]
    LogWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("user {user_id} is not allowed to run `{command}`")]
    UnauthorizedCommand { user_id: u64, command: String },
}

pub type Result<T> = std::result::Result<T, RelayError>;
