use callbook_core::CallId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("{backend} store unavailable: {reason}")]
    Unavailable {
        backend: &'static str,
        reason: String,
    },
    #[error("call not found: {0}")]
    NotFound(CallId),
    #[error("call {0} was modified since it was read")]
    Conflict(CallId),
    #[error("malformed stored document: {0}")]
    Schema(String),
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid data path: {0}")]
    InvalidDataPath(PathBuf),
    #[error("migration error: {0}")]
    Migration(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// Transport, auth or storage-engine failure. Retrying may succeed.
    Unavailable,
    NotFound,
    Conflict,
    Schema,
    Setup,
}

impl StoreError {
    pub fn unavailable(backend: &'static str, reason: impl Into<String>) -> Self {
        StoreError::Unavailable {
            backend,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Io(_) | StoreError::Sql(_) | StoreError::Unavailable { .. } => {
                StoreErrorKind::Unavailable
            }
            StoreError::NotFound(_) => StoreErrorKind::NotFound,
            StoreError::Conflict(_) => StoreErrorKind::Conflict,
            StoreError::Schema(_) => StoreErrorKind::Schema,
            StoreError::MissingHomeDir
            | StoreError::InvalidDataPath(_)
            | StoreError::Migration(_) => StoreErrorKind::Setup,
        }
    }
}
