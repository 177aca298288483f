use db_infra::{connect_orm, connect_pool, connect_raw, DbInfraError, DbSettings};
use tracing::info;

use crate::adapters::{WebsiteRepoPool, WebsiteRepoRaw, WebsiteRepoSea};
use crate::config::backend::BackendKind;
use crate::repos::websites::WebsiteRepo;

/// Builder for the repository handed to consumers (used in both tests and main)
pub struct RepoBuilder {
    backend: BackendKind,
    settings: Option<DbSettings>,
}

impl RepoBuilder {
    pub fn new() -> Self {
        Self {
            backend: BackendKind::default(),
            settings: None,
        }
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_settings(mut self, settings: DbSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Connect and wrap the chosen adapter. Settings fall back to the environment.
    pub async fn build(self) -> Result<Box<dyn WebsiteRepo>, DbInfraError> {
        let settings = match self.settings {
            Some(settings) => settings,
            None => DbSettings::from_env()?,
        };
        build_repo(self.backend, &settings).await
    }
}

impl Default for RepoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn repo_builder() -> RepoBuilder {
    RepoBuilder::new()
}

/// Open the connection resource `kind` needs and return it behind the contract.
pub async fn build_repo(
    kind: BackendKind,
    settings: &DbSettings,
) -> Result<Box<dyn WebsiteRepo>, DbInfraError> {
    let repo: Box<dyn WebsiteRepo> = match kind {
        BackendKind::Raw => Box::new(WebsiteRepoRaw::new(connect_raw(settings).await?)),
        BackendKind::Pool => Box::new(WebsiteRepoPool::new(connect_pool(settings).await?)),
        BackendKind::Orm => Box::new(WebsiteRepoSea::new(connect_orm(settings).await?)),
    };
    info!(backend = %kind, "website repository ready");
    Ok(repo)
}
