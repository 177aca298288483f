#![deny(clippy::wildcard_imports)]

pub mod adapters;
pub mod config;
pub mod entities;
pub mod errors;
pub mod infra;
pub mod repos;
pub mod services;

// Re-exports for public API
pub use adapters::{WebsiteRepoPool, WebsiteRepoRaw, WebsiteRepoSea};
pub use config::backend::BackendKind;
pub use errors::{RepoError, StorageError, StorageErrorKind};
pub use infra::op_context::OpContext;
pub use infra::state::{build_repo, repo_builder, RepoBuilder};
pub use repos::{Website, WebsiteRepo};
pub use services::demo::{run_demo, DemoReport};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_support::logging::init();
}
