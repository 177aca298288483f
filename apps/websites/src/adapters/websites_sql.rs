//! Hand-written SQL shared by the raw and pool adapters.

use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::repos::websites::Website;

pub(crate) const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS websites (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    url TEXT NOT NULL,
    rank BIGINT NOT NULL
)
"#;

pub(crate) const INSERT: &str =
    "INSERT INTO websites (name, url, rank) VALUES ($1, $2, $3) RETURNING id, name, url, rank";

pub(crate) const SELECT_ALL: &str = "SELECT id, name, url, rank FROM websites ORDER BY id";

pub(crate) const SELECT_BY_NAME: &str =
    "SELECT id, name, url, rank FROM websites WHERE name = $1";

pub(crate) const UPDATE: &str = "UPDATE websites SET name = $1, url = $2, rank = $3 WHERE id = $4";

pub(crate) const DELETE: &str = "DELETE FROM websites WHERE id = $1";

pub(crate) fn website_from_row(row: &PgRow) -> Result<Website, sqlx::Error> {
    Ok(Website {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        url: row.try_get("url")?,
        rank: row.try_get("rank")?,
    })
}
