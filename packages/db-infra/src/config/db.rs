use std::env;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::error::DbInfraError;

/// Storage engine family, derived from the connection URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    SqliteFile,
    SqliteMemory,
}

impl DbKind {
    /// Classify a connection URL by its scheme.
    pub fn from_url(url: &str) -> Result<Self, DbInfraError> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(DbKind::Postgres)
        } else if url.starts_with("sqlite::memory:") || url.contains("mode=memory") {
            Ok(DbKind::SqliteMemory)
        } else if url.starts_with("sqlite:") {
            Ok(DbKind::SqliteFile)
        } else {
            Err(DbInfraError::config(format!(
                "unsupported database URL scheme: '{}'",
                url.split(':').next().unwrap_or_default()
            )))
        }
    }
}

/// Connection settings shared by every backend builder.
#[derive(Debug, Clone, PartialEq)]
pub struct DbSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    /// Attempts made by the connect retry loop (Postgres only).
    pub connect_attempts: u32,
    pub connect_interval: Duration,
}

impl DbSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            connect_attempts: 5,
            connect_interval: Duration::from_millis(500),
        }
    }

    /// Resolve settings from the environment.
    ///
    /// `DATABASE_URL` wins when present. Otherwise the URL is assembled from
    /// `POSTGRES_HOST`, `POSTGRES_PORT`, `POSTGRES_USER`, `POSTGRES_PASSWORD`
    /// and `POSTGRES_DB`, each with a local-development default.
    pub fn from_env() -> Result<Self, DbInfraError> {
        let url = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => postgres_url_from_parts()?,
        };

        let mut settings = Self::new(url);
        if let Some(max) = parse_var::<u32>("WEBSITES_DB_MAX_CONNECTIONS")? {
            settings.max_connections = max;
        }
        if let Some(ms) = parse_var::<u64>("WEBSITES_DB_ACQUIRE_TIMEOUT_MS")? {
            settings.acquire_timeout = Duration::from_millis(ms);
        }
        if let Some(attempts) = parse_var::<u32>("WEBSITES_DB_CONNECT_ATTEMPTS")? {
            settings.connect_attempts = attempts;
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_connect_attempts(mut self, attempts: u32) -> Self {
        self.connect_attempts = attempts;
        self
    }

    pub fn db_kind(&self) -> Result<DbKind, DbInfraError> {
        DbKind::from_url(&self.url)
    }

    pub fn validate(&self) -> Result<(), DbInfraError> {
        self.db_kind()?;
        if self.max_connections == 0 {
            return Err(DbInfraError::config("max_connections must be at least 1"));
        }
        if self.min_connections > self.max_connections {
            return Err(DbInfraError::config(format!(
                "min_connections ({}) exceeds max_connections ({})",
                self.min_connections, self.max_connections
            )));
        }
        if self.connect_attempts == 0 {
            return Err(DbInfraError::config("connect_attempts must be at least 1"));
        }
        Ok(())
    }
}

fn default_max_connections() -> u32 {
    (num_cpus::get() as u32).saturating_mul(2).clamp(2, 16)
}

fn postgres_url_from_parts() -> Result<String, DbInfraError> {
    let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
    port.parse::<u16>().map_err(|_| {
        DbInfraError::config(format!("POSTGRES_PORT must be a valid port number, got '{port}'"))
    })?;
    let user = env::var("POSTGRES_USER").unwrap_or_else(|_| "postgres".to_string());
    let password = env::var("POSTGRES_PASSWORD").unwrap_or_else(|_| "postgres".to_string());
    let db_name = env::var("POSTGRES_DB").unwrap_or_else(|_| "postgres".to_string());

    let user = utf8_percent_encode(&user, NON_ALPHANUMERIC);
    let password = utf8_percent_encode(&password, NON_ALPHANUMERIC);
    Ok(format!(
        "postgres://{user}:{password}@{host}:{port}/{db_name}"
    ))
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, DbInfraError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| DbInfraError::config(format!("{name} has an invalid value: '{raw}'"))),
        Err(_) => Ok(None),
    }
}
