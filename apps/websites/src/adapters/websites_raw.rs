//! Raw driver adapter: one dedicated `PgConnection`.

use async_trait::async_trait;
use sqlx::PgConnection;
use tokio::sync::Mutex;
use tracing::debug;

use super::websites_sql as sql;
use crate::errors::domain::RepoError;
use crate::infra::db_errors::{expect_rows_deleted, expect_rows_updated, map_sqlx_err};
use crate::infra::op_context::OpContext;
use crate::repos::websites::{Website, WebsiteRepo};

/// `WebsiteRepo` over a single driver connection.
///
/// The connection can only run one statement at a time, so calls queue on
/// the mutex; the engine still provides the only isolation between them.
pub struct WebsiteRepoRaw {
    conn: Mutex<PgConnection>,
}

impl WebsiteRepoRaw {
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl WebsiteRepo for WebsiteRepoRaw {
    async fn migrate(&self, ctx: &OpContext) -> Result<(), RepoError> {
        ctx.run("migrate", async {
            let mut conn = self.conn.lock().await;
            sqlx::query(sql::CREATE_TABLE)
                .execute(&mut *conn)
                .await
                .map_err(map_sqlx_err)?;
            debug!(backend = "raw", "websites table ensured");
            Ok::<_, RepoError>(())
        })
        .await
    }

    async fn create(&self, ctx: &OpContext, website: Website) -> Result<Website, RepoError> {
        ctx.run("create", async {
            let mut conn = self.conn.lock().await;
            let row = sqlx::query(sql::INSERT)
                .bind(&website.name)
                .bind(&website.url)
                .bind(website.rank)
                .fetch_one(&mut *conn)
                .await
                .map_err(map_sqlx_err)?;
            let created = sql::website_from_row(&row).map_err(map_sqlx_err)?;
            debug!(backend = "raw", id = created.id, "website created");
            Ok::<_, RepoError>(created)
        })
        .await
    }

    async fn all(&self, ctx: &OpContext) -> Result<Vec<Website>, RepoError> {
        ctx.run("all", async {
            let mut conn = self.conn.lock().await;
            let rows = sqlx::query(sql::SELECT_ALL)
                .fetch_all(&mut *conn)
                .await
                .map_err(map_sqlx_err)?;
            rows.iter()
                .map(sql::website_from_row)
                .collect::<Result<Vec<_>, _>>()
                .map_err(map_sqlx_err)
        })
        .await
    }

    async fn get_by_name(&self, ctx: &OpContext, name: &str) -> Result<Website, RepoError> {
        ctx.run("get_by_name", async {
            let mut conn = self.conn.lock().await;
            let row = sqlx::query(sql::SELECT_BY_NAME)
                .bind(name)
                .fetch_one(&mut *conn)
                .await
                .map_err(map_sqlx_err)?;
            sql::website_from_row(&row).map_err(map_sqlx_err)
        })
        .await
    }

    async fn update(
        &self,
        ctx: &OpContext,
        id: i64,
        website: Website,
    ) -> Result<Website, RepoError> {
        ctx.run("update", async {
            let mut conn = self.conn.lock().await;
            let result = sqlx::query(sql::UPDATE)
                .bind(&website.name)
                .bind(&website.url)
                .bind(website.rank)
                .bind(id)
                .execute(&mut *conn)
                .await
                .map_err(map_sqlx_err)?;
            expect_rows_updated(result.rows_affected())?;
            debug!(backend = "raw", id, "website updated");
            Ok::<_, RepoError>(Website { id, ..website })
        })
        .await
    }

    async fn delete(&self, ctx: &OpContext, id: i64) -> Result<(), RepoError> {
        ctx.run("delete", async {
            let mut conn = self.conn.lock().await;
            let result = sqlx::query(sql::DELETE)
                .bind(id)
                .execute(&mut *conn)
                .await
                .map_err(map_sqlx_err)?;
            expect_rows_deleted(result.rows_affected())?;
            debug!(backend = "raw", id, "website deleted");
            Ok::<_, RepoError>(())
        })
        .await
    }
}
