//! Scripted walk through every repository operation.
//!
//! Semantic outcomes (`Duplicate`, `NotFound`, `UpdateFailed`,
//! `DeleteFailed`) are logged and the walk carries on; anything else stops
//! it and is returned to the caller.

use tracing::{info, warn};

use crate::errors::domain::RepoError;
use crate::infra::op_context::OpContext;
use crate::repos::websites::{Website, WebsiteRepo};

pub const GOSAMPLES: &str = "GOSAMPLES";
pub const GOLANG: &str = "Golang official website";

/// What each step of the demo observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoReport {
    /// GOSAMPLES as stored after step 2 (created or looked up).
    pub gosamples: Website,
    /// The golang record as stored after step 2.
    pub golang: Website,
    /// Names whose create hit an existing record.
    pub already_present: Vec<String>,
    pub fetched: Option<Website>,
    pub updated: Option<Website>,
    pub listed: Vec<Website>,
    pub deleted: bool,
    pub listed_after_delete: Vec<Website>,
}

fn seed_records() -> (Website, Website) {
    (
        Website::new(GOSAMPLES, "https://gosamples.dev", 2),
        Website::new(GOLANG, "https:://golang.org", 1),
    )
}

async fn create_or_lookup(
    ctx: &OpContext,
    repo: &dyn WebsiteRepo,
    website: Website,
    report: &mut DemoReport,
) -> Result<Website, RepoError> {
    let name = website.name.clone();
    match repo.create(ctx, website).await {
        Ok(created) => {
            info!(id = created.id, name = %created.name, "created");
            Ok(created)
        }
        Err(RepoError::Duplicate) => {
            warn!(name = %name, "record already exists");
            report.already_present.push(name.clone());
            repo.get_by_name(ctx, &name).await
        }
        Err(e) => Err(e),
    }
}

pub async fn run_demo(ctx: &OpContext, repo: &dyn WebsiteRepo) -> Result<DemoReport, RepoError> {
    let mut report = DemoReport::default();

    info!(step = 1, "migrate repository");
    repo.migrate(ctx).await?;

    info!(step = 2, "create records");
    let (gosamples, golang) = seed_records();
    report.gosamples = create_or_lookup(ctx, repo, gosamples, &mut report).await?;
    report.golang = create_or_lookup(ctx, repo, golang, &mut report).await?;

    info!(step = 3, "get record by name");
    match repo.get_by_name(ctx, GOSAMPLES).await {
        Ok(found) => {
            info!(id = found.id, rank = found.rank, "fetched {GOSAMPLES}");
            report.fetched = Some(found);
        }
        Err(RepoError::NotFound) => warn!("record {GOSAMPLES} does not exist"),
        Err(e) => return Err(e),
    }

    info!(step = 4, "update record");
    let promoted = Website {
        rank: 1,
        ..report.gosamples.clone()
    };
    match repo.update(ctx, promoted.id, promoted).await {
        Ok(updated) => {
            info!(id = updated.id, rank = updated.rank, "updated");
            report.updated = Some(updated);
        }
        Err(e @ (RepoError::Duplicate | RepoError::UpdateFailed)) => {
            warn!(id = report.gosamples.id, error = %e, "update skipped");
        }
        Err(e) => return Err(e),
    }

    info!(step = 5, "get all");
    report.listed = repo.all(ctx).await?;
    for website in &report.listed {
        info!(id = website.id, name = %website.name, url = %website.url, rank = website.rank, "listed");
    }

    info!(step = 6, "delete record");
    match repo.delete(ctx, report.golang.id).await {
        Ok(()) => {
            info!(id = report.golang.id, "deleted");
            report.deleted = true;
        }
        Err(RepoError::DeleteFailed) => {
            warn!(id = report.golang.id, "delete failed");
        }
        Err(e) => return Err(e),
    }

    info!(step = 7, "get all");
    report.listed_after_delete = repo.all(ctx).await?;
    for website in &report.listed_after_delete {
        info!(id = website.id, name = %website.name, url = %website.url, rank = website.rank, "listed");
    }

    Ok(report)
}
