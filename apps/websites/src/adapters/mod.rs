//! Backend adapters binding `WebsiteRepo` to a storage access mechanism.

pub mod websites_pool;
pub mod websites_raw;
pub mod websites_sea;
mod websites_sql;

pub use websites_pool::WebsiteRepoPool;
pub use websites_raw::WebsiteRepoRaw;
pub use websites_sea::WebsiteRepoSea;
