//! SeaORM adapter for the website repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Schema, Set,
};
use tracing::debug;

use crate::entities::websites;
use crate::errors::domain::RepoError;
use crate::infra::db_errors::{expect_rows_deleted, expect_rows_updated, map_db_err};
use crate::infra::op_context::OpContext;
use crate::repos::websites::{Website, WebsiteRepo};

/// SeaORM implementation of `WebsiteRepo`.
///
/// Works against any backend SeaORM is built for; the table definition is
/// derived from the `websites` entity rather than written by hand.
#[derive(Debug)]
pub struct WebsiteRepoSea {
    db: DatabaseConnection,
}

impl WebsiteRepoSea {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Give the connection back, e.g. to read a mock database's statement log.
    pub fn into_connection(self) -> DatabaseConnection {
        self.db
    }
}

#[async_trait]
impl WebsiteRepo for WebsiteRepoSea {
    async fn migrate(&self, ctx: &OpContext) -> Result<(), RepoError> {
        ctx.run("migrate", async {
            let backend = self.db.get_database_backend();
            let mut stmt = Schema::new(backend).create_table_from_entity(websites::Entity);
            stmt.if_not_exists();
            self.db
                .execute(backend.build(&stmt))
                .await
                .map_err(map_db_err)?;
            debug!(backend = "orm", "websites table ensured");
            Ok::<_, RepoError>(())
        })
        .await
    }

    async fn create(&self, ctx: &OpContext, website: Website) -> Result<Website, RepoError> {
        ctx.run("create", async {
            let active = websites::ActiveModel {
                id: NotSet,
                name: Set(website.name),
                url: Set(website.url),
                rank: Set(website.rank),
            };
            let created = active.insert(&self.db).await.map_err(map_db_err)?;
            debug!(backend = "orm", id = created.id, "website created");
            Ok::<_, RepoError>(Website::from(created))
        })
        .await
    }

    async fn all(&self, ctx: &OpContext) -> Result<Vec<Website>, RepoError> {
        ctx.run("all", async {
            let models = websites::Entity::find()
                .order_by_asc(websites::Column::Id)
                .all(&self.db)
                .await
                .map_err(map_db_err)?;
            Ok::<_, RepoError>(models.into_iter().map(Website::from).collect())
        })
        .await
    }

    async fn get_by_name(&self, ctx: &OpContext, name: &str) -> Result<Website, RepoError> {
        ctx.run("get_by_name", async {
            websites::Entity::find()
                .filter(websites::Column::Name.eq(name))
                .one(&self.db)
                .await
                .map_err(map_db_err)?
                .map(Website::from)
                .ok_or(RepoError::NotFound)
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
            let changes = websites::ActiveModel {
                id: NotSet,
                name: Set(website.name.clone()),
                url: Set(website.url.clone()),
                rank: Set(website.rank),
            };
            let result = websites::Entity::update_many()
                .set(changes)
                .filter(websites::Column::Id.eq(id))
                .exec(&self.db)
                .await
                .map_err(map_db_err)?;
            expect_rows_updated(result.rows_affected)?;
            debug!(backend = "orm", id, "website updated");
            Ok::<_, RepoError>(Website { id, ..website })
        })
        .await
    }

    async fn delete(&self, ctx: &OpContext, id: i64) -> Result<(), RepoError> {
        ctx.run("delete", async {
            let result = websites::Entity::delete_by_id(id)
                .exec(&self.db)
                .await
                .map_err(map_db_err)?;
            expect_rows_deleted(result.rows_affected)?;
            debug!(backend = "orm", id, "website deleted");
            Ok::<_, RepoError>(())
        })
        .await
    }
}

// Conversions between SeaORM models and domain models

impl From<websites::Model> for Website {
    fn from(model: websites::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            url: model.url,
            rank: model.rank,
        }
    }
}
