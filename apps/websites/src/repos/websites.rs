//! Website domain model and the repository contract every backend implements.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::domain::RepoError;
use crate::infra::op_context::OpContext;

/// Website domain model
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Website {
    /// Assigned by storage on create; `0` until then.
    pub id: i64,
    pub name: String,
    pub url: String,
    pub rank: i64,
}

impl Website {
    /// An unpersisted record.
    pub fn new(name: impl Into<String>, url: impl Into<String>, rank: i64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            url: url.into(),
            rank,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }
}

/// CRUD over the `websites` table.
///
/// Implementations must be interchangeable: the same inputs produce the same
/// outputs and the same `RepoError` kinds whichever backend is wired in.
/// Every call races against `ctx` and returns `RepoError::Storage` with kind
/// `Cancelled` or `Timeout` when the caller gives up first.
#[async_trait]
pub trait WebsiteRepo: Send + Sync {
    /// Create the `websites` table if it does not exist. Idempotent.
    async fn migrate(&self, ctx: &OpContext) -> Result<(), RepoError>;

    /// Insert `website`, ignoring its `id`. `Duplicate` if the name is taken.
    async fn create(&self, ctx: &OpContext, website: Website) -> Result<Website, RepoError>;

    /// Every record, ordered by id. Empty when the table is empty.
    async fn all(&self, ctx: &OpContext) -> Result<Vec<Website>, RepoError>;

    /// The record called `name`, or `NotFound`.
    async fn get_by_name(&self, ctx: &OpContext, name: &str) -> Result<Website, RepoError>;

    /// Replace name, url and rank of record `id`.
    ///
    /// `Duplicate` if the new name belongs to another record, `UpdateFailed`
    /// if no record has `id`.
    async fn update(&self, ctx: &OpContext, id: i64, website: Website)
        -> Result<Website, RepoError>;

    /// Remove record `id`; `DeleteFailed` if there was none.
    async fn delete(&self, ctx: &OpContext, id: i64) -> Result<(), RepoError>;
}
