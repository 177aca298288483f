//! Repository-level error type.
//!
//! Backend adapters translate their native driver errors into `RepoError`
//! before returning; nothing from sqlx or SeaORM crosses the contract
//! boundary except as an opaque `source()` inside `StorageError`.

use std::error::Error;

use thiserror::Error;

/// Operational failure categories for the generic storage error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// The caller's `OpContext` was cancelled.
    Cancelled,
    /// The caller's deadline elapsed, or the pool timed out handing out a connection.
    Timeout,
    /// The engine could not be reached.
    Unavailable,
    Other,
}

/// Anything that is not one of the four semantic outcomes.
#[derive(Debug, Error)]
#[error("storage error ({kind:?}): {detail}")]
pub struct StorageError {
    kind: StorageErrorKind,
    detail: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl StorageError {
    pub fn new(kind: StorageErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            source: None,
        }
    }

    pub fn with_source(
        kind: StorageErrorKind,
        detail: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            detail: detail.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }
}

/// Central repository error type
#[derive(Debug, Error)]
pub enum RepoError {
    /// Unique `name` already taken by another record
    #[error("record already exists")]
    Duplicate,
    /// Single-row lookup matched nothing
    #[error("record does not exist")]
    NotFound,
    /// Targeted update touched zero rows
    #[error("update failed")]
    UpdateFailed,
    /// Targeted delete touched zero rows
    #[error("delete failed")]
    DeleteFailed,
    #[error("{0}")]
    Storage(#[from] StorageError),
}

impl RepoError {
    pub fn storage(kind: StorageErrorKind, detail: impl Into<String>) -> Self {
        Self::Storage(StorageError::new(kind, detail))
    }

    /// True for the four outcomes a consumer is expected to handle and move on from.
    pub fn is_semantic(&self) -> bool {
        !matches!(self, RepoError::Storage(_))
    }

    pub fn storage_kind(&self) -> Option<StorageErrorKind> {
        match self {
            RepoError::Storage(e) => Some(e.kind()),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.storage_kind() == Some(StorageErrorKind::Cancelled)
    }
}
