use std::fmt;

use clap::ValueEnum;

/// Which adapter serves the `WebsiteRepo` contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BackendKind {
    /// One dedicated driver connection behind a mutex.
    Raw,
    /// Shared sqlx connection pool.
    Pool,
    /// SeaORM over its own managed pool.
    #[default]
    Orm,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Raw => "raw",
            BackendKind::Pool => "pool",
            BackendKind::Orm => "orm",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
