//! Repository fixtures: a fresh in-memory SQLite store per test, or a
//! freshly dropped `websites` table on the Postgres named by
//! `TEST_DATABASE_URL`.

use db_infra::{connect_orm, DbSettings};
use sqlx::{Connection, PgConnection};
use websites::{build_repo, BackendKind, OpContext, WebsiteRepo, WebsiteRepoSea};

pub const TEST_DATABASE_URL: &str = "TEST_DATABASE_URL";

/// ORM adapter on a private in-memory SQLite database, already migrated.
pub async fn sqlite_repo() -> Box<dyn WebsiteRepo> {
    let conn = connect_orm(&DbSettings::new("sqlite::memory:"))
        .await
        .expect("open in-memory sqlite");
    let repo = WebsiteRepoSea::new(conn);
    repo.migrate(&OpContext::background())
        .await
        .expect("migrate sqlite");
    Box::new(repo)
}

fn pg_url() -> String {
    std::env::var(TEST_DATABASE_URL)
        .unwrap_or_else(|_| panic!("{TEST_DATABASE_URL} must point at a disposable Postgres database"))
}

/// Drop the table so ids restart at 1 and no rows leak between tests.
async fn reset_pg_table(url: &str) {
    let mut conn = PgConnection::connect(url)
        .await
        .expect("connect to test postgres");
    sqlx::query("DROP TABLE IF EXISTS websites")
        .execute(&mut conn)
        .await
        .expect("drop websites table");
    conn.close().await.expect("close reset connection");
}

/// `kind` adapter on a clean Postgres table, already migrated.
pub async fn pg_repo(kind: BackendKind) -> Box<dyn WebsiteRepo> {
    let url = pg_url();
    reset_pg_table(&url).await;

    let settings = DbSettings::new(url)
        .with_max_connections(4)
        .with_connect_attempts(1);
    let repo = build_repo(kind, &settings)
        .await
        .unwrap_or_else(|e| panic!("build {kind} repo: {e}"));
    repo.migrate(&OpContext::background())
        .await
        .expect("migrate postgres");
    repo
}

pub async fn pg_raw_repo() -> Box<dyn WebsiteRepo> {
    pg_repo(BackendKind::Raw).await
}

pub async fn pg_pool_repo() -> Box<dyn WebsiteRepo> {
    pg_repo(BackendKind::Pool).await
}

pub async fn pg_orm_repo() -> Box<dyn WebsiteRepo> {
    pg_repo(BackendKind::Orm).await
}
