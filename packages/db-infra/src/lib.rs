//! Shared database configuration and connection infrastructure.
//! Used by the websites app to build whichever backend was selected.

pub mod config;
pub mod error;
pub mod infra;

pub use config::db;
pub use config::db::{DbKind, DbSettings};
pub use error::DbInfraError;
pub use infra::db::core::{connect_orm, connect_pool, connect_raw, sanitize_db_url};
