pub mod core;

pub use core::{connect_orm, connect_pool, connect_raw, sanitize_db_url};
