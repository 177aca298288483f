//! Behaviour every `WebsiteRepo` backend must share.
//!
//! Each check takes a migrated repository and returns `Err` only for
//! unexpected storage failures; contract violations panic through asserts.

use std::time::Duration;

use test_support::{unique_name, unique_url};
use websites::{run_demo, OpContext, RepoError, StorageErrorKind, Website, WebsiteRepo};

const MISSING_ID: i64 = i64::MAX;

fn ctx() -> OpContext {
    OpContext::background().with_timeout(Duration::from_secs(30))
}

fn sample(prefix: &str, rank: i64) -> Website {
    Website::new(unique_name(prefix), unique_url(prefix), rank)
}

pub async fn create_then_get_round_trips(repo: &dyn WebsiteRepo) -> Result<(), RepoError> {
    let ctx = ctx();
    let site = sample("roundtrip", 3);

    let created = repo.create(&ctx, site.clone()).await?;
    assert!(created.is_persisted());
    assert_eq!((&created.name, &created.url, created.rank), (&site.name, &site.url, site.rank));

    let fetched = repo.get_by_name(&ctx, &site.name).await?;
    assert_eq!(fetched, created);
    Ok(())
}

pub async fn create_ignores_caller_id(repo: &dyn WebsiteRepo) -> Result<(), RepoError> {
    let ctx = ctx();
    let first = repo.create(&ctx, sample("first", 1)).await?;
    let second = repo
        .create(
            &ctx,
            Website {
                id: first.id,
                ..sample("second", 1)
            },
        )
        .await?;
    assert_ne!(second.id, first.id);
    Ok(())
}

pub async fn duplicate_create_keeps_one_record(repo: &dyn WebsiteRepo) -> Result<(), RepoError> {
    let ctx = ctx();
    let site = sample("dup", 5);
    repo.create(&ctx, site.clone()).await?;

    let err = repo
        .create(
            &ctx,
            Website {
                url: unique_url("other"),
                rank: 9,
                ..site.clone()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate), "got {err:?}");

    let matching = repo
        .all(&ctx)
        .await?
        .into_iter()
        .filter(|w| w.name == site.name)
        .collect::<Vec<_>>();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].rank, 5);
    Ok(())
}

pub async fn get_unknown_is_not_found(repo: &dyn WebsiteRepo) -> Result<(), RepoError> {
    let err = repo
        .get_by_name(&ctx(), &unique_name("ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound), "got {err:?}");
    Ok(())
}

pub async fn update_replaces_fields(repo: &dyn WebsiteRepo) -> Result<(), RepoError> {
    let ctx = ctx();
    let created = repo.create(&ctx, sample("update", 4)).await?;
    let renamed = sample("renamed", 1);

    let updated = repo.update(&ctx, created.id, renamed.clone()).await?;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, renamed.name);

    let fetched = repo.get_by_name(&ctx, &renamed.name).await?;
    assert_eq!(fetched, updated);
    let old = repo.get_by_name(&ctx, &created.name).await.unwrap_err();
    assert!(matches!(old, RepoError::NotFound));
    Ok(())
}

pub async fn update_unknown_is_update_failed(repo: &dyn WebsiteRepo) -> Result<(), RepoError> {
    let ctx = ctx();
    repo.create(&ctx, sample("bystander", 2)).await?;
    let before = repo.all(&ctx).await?;

    let err = repo
        .update(&ctx, MISSING_ID, sample("nowhere", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::UpdateFailed), "got {err:?}");

    assert_eq!(repo.all(&ctx).await?, before);
    Ok(())
}

pub async fn update_into_taken_name_is_duplicate(repo: &dyn WebsiteRepo) -> Result<(), RepoError> {
    let ctx = ctx();
    let a = repo.create(&ctx, sample("alpha", 1)).await?;
    let b = repo.create(&ctx, sample("beta", 2)).await?;

    let err = repo
        .update(
            &ctx,
            b.id,
            Website {
                name: a.name.clone(),
                ..b.clone()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate), "got {err:?}");

    assert_eq!(repo.get_by_name(&ctx, &b.name).await?, b);
    assert_eq!(repo.get_by_name(&ctx, &a.name).await?, a);
    Ok(())
}

pub async fn delete_removes_only_target(repo: &dyn WebsiteRepo) -> Result<(), RepoError> {
    let ctx = ctx();
    let keep = repo.create(&ctx, sample("keep", 1)).await?;
    let gone = repo.create(&ctx, sample("gone", 2)).await?;

    repo.delete(&ctx, gone.id).await?;

    let all = repo.all(&ctx).await?;
    assert!(all.contains(&keep));
    assert!(!all.iter().any(|w| w.id == gone.id));
    Ok(())
}

pub async fn delete_unknown_is_delete_failed(repo: &dyn WebsiteRepo) -> Result<(), RepoError> {
    let err = repo.delete(&ctx(), MISSING_ID).await.unwrap_err();
    assert!(matches!(err, RepoError::DeleteFailed), "got {err:?}");
    Ok(())
}

pub async fn migrate_is_idempotent(repo: &dyn WebsiteRepo) -> Result<(), RepoError> {
    let ctx = ctx();
    repo.create(&ctx, sample("survivor", 7)).await?;
    let before = repo.all(&ctx).await?;

    repo.migrate(&ctx).await?;
    repo.migrate(&ctx).await?;

    assert_eq!(repo.all(&ctx).await?, before);
    Ok(())
}

pub async fn all_lists_in_id_order(repo: &dyn WebsiteRepo) -> Result<(), RepoError> {
    let ctx = ctx();
    for rank in [3, 1, 2] {
        repo.create(&ctx, sample("ordered", rank)).await?;
    }
    let ids = repo
        .all(&ctx)
        .await?
        .into_iter()
        .map(|w| w.id)
        .collect::<Vec<_>>();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    Ok(())
}

pub async fn dead_context_is_rejected(repo: &dyn WebsiteRepo) -> Result<(), RepoError> {
    let cancelled = OpContext::background();
    cancelled.cancel();
    let err = repo
        .create(&cancelled, sample("never", 1))
        .await
        .unwrap_err();
    assert_eq!(err.storage_kind(), Some(StorageErrorKind::Cancelled));

    let expired = OpContext::background().with_timeout(Duration::ZERO);
    let err = repo.all(&expired).await.unwrap_err();
    assert_eq!(err.storage_kind(), Some(StorageErrorKind::Timeout));
    let err = repo
        .create(&expired, sample("late", 1))
        .await
        .unwrap_err();
    assert_eq!(err.storage_kind(), Some(StorageErrorKind::Timeout));

    // neither rejected create reached storage
    let stored = repo.all(&ctx()).await?;
    assert!(stored
        .iter()
        .all(|w| !w.name.starts_with("never-") && !w.name.starts_with("late-")));
    Ok(())
}

/// The seven-step walk on an empty table: ids come out as 1 and 2.
pub async fn end_to_end_scenario(repo: &dyn WebsiteRepo) -> Result<(), RepoError> {
    let ctx = ctx();

    let gosamples = repo
        .create(&ctx, Website::new("GOSAMPLES", "https://gosamples.dev", 2))
        .await?;
    assert_eq!(gosamples.id, 1);
    let golang = repo
        .create(
            &ctx,
            Website::new("Golang official website", "https:://golang.org", 1),
        )
        .await?;
    assert_eq!(golang.id, 2);

    let fetched = repo.get_by_name(&ctx, "GOSAMPLES").await?;
    assert_eq!((fetched.id, fetched.rank), (1, 2));

    let updated = repo
        .update(&ctx, 1, Website { rank: 1, ..fetched })
        .await?;
    assert_eq!(updated.rank, 1);

    assert_eq!(repo.all(&ctx).await?.len(), 2);

    repo.delete(&ctx, golang.id).await?;
    let remaining = repo.all(&ctx).await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, 1);
    assert_eq!(remaining[0].rank, 1);
    Ok(())
}

/// The demo twice on one store: the second run finds both seeds present.
pub async fn demo_is_rerunnable(repo: &dyn WebsiteRepo) -> Result<(), RepoError> {
    let ctx = ctx();

    let first = run_demo(&ctx, repo).await?;
    assert!(first.already_present.is_empty());
    assert!(first.deleted);
    assert_eq!(first.listed.len(), 2);
    assert_eq!(first.listed_after_delete.len(), 1);
    assert_eq!(first.updated.map(|w| w.rank), Some(1));

    // golang was deleted, GOSAMPLES survives with rank 1
    let second = run_demo(&ctx, repo).await?;
    assert_eq!(second.already_present, vec!["GOSAMPLES".to_string()]);
    assert_eq!(second.gosamples.id, first.gosamples.id);
    assert_eq!(second.fetched.map(|w| w.rank), Some(1));
    assert_ne!(second.golang.id, first.golang.id);
    assert_eq!(second.listed_after_delete.len(), 1);
    Ok(())
}

/// Expands to one `#[tokio::test]` per contract check, each on a fresh
/// repository from `$setup`. Extra attributes are applied to every test.
macro_rules! repo_contract_tests {
    (@one $setup:path, [$(#[$attr:meta])*], $check:ident) => {
        #[tokio::test]
        $(#[$attr])*
        async fn $check() -> Result<(), websites::RepoError> {
            let repo = $setup().await;
            crate::support::contract::$check(repo.as_ref()).await
        }
    };
    (@each $setup:path, $attrs:tt $(,)?) => {};
    (@each $setup:path, $attrs:tt, $check:ident $(, $rest:ident)* $(,)?) => {
        repo_contract_tests!(@one $setup, $attrs, $check);
        repo_contract_tests!(@each $setup, $attrs, $($rest),*);
    };
    ($setup:path $(, #[$attr:meta])* $(,)?) => {
        repo_contract_tests!(@each $setup, [$(#[$attr])*],
            create_then_get_round_trips,
            create_ignores_caller_id,
            duplicate_create_keeps_one_record,
            get_unknown_is_not_found,
            update_replaces_fields,
            update_unknown_is_update_failed,
            update_into_taken_name_is_duplicate,
            delete_removes_only_target,
            delete_unknown_is_delete_failed,
            migrate_is_idempotent,
            all_lists_in_id_order,
            dead_context_is_rejected,
            end_to_end_scenario,
            demo_is_rerunnable,
        );
    };
}
