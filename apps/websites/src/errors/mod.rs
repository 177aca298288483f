//! Error vocabulary shared by every repository backend.

pub mod domain;

pub use domain::{RepoError, StorageError, StorageErrorKind};
