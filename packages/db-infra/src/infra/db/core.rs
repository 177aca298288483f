use std::future::Future;
use std::time::Duration;

use rand::Rng;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgConnection, PgPool};
use tracing::{info, warn};

use crate::config::db::{DbKind, DbSettings};
use crate::error::DbInfraError;

async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval: Duration,
) -> Result<T, DbInfraError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbInfraError>>,
{
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(
                        "connection_retry=success attempts={} interval_ms={}",
                        attempt,
                        interval.as_millis()
                    );
                }
                return Ok(result);
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < max_attempts {
                    let jitter_ms = rand::rng().random::<u64>() % 50;
                    warn!(
                        "connection_retry=failed attempt={} max_attempts={} interval_ms={}",
                        attempt,
                        max_attempts,
                        interval.as_millis()
                    );
                    tokio::time::sleep(interval + Duration::from_millis(jitter_ms)).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        DbInfraError::config("no error recorded after max attempts (this should not happen)")
    }))
}

/// Postgres connections are retried; SQLite either opens or it doesn't.
fn attempts_for(kind: DbKind, settings: &DbSettings) -> u32 {
    match kind {
        DbKind::Postgres => settings.connect_attempts,
        DbKind::SqliteFile | DbKind::SqliteMemory => 1,
    }
}

fn require_postgres(settings: &DbSettings, backend: &str) -> Result<(), DbInfraError> {
    match settings.db_kind()? {
        DbKind::Postgres => Ok(()),
        other => Err(DbInfraError::config(format!(
            "the {backend} backend requires a Postgres URL, got {other:?}"
        ))),
    }
}

/// Build the SeaORM connection used by the ORM backend.
pub async fn connect_orm(settings: &DbSettings) -> Result<DatabaseConnection, DbInfraError> {
    settings.validate()?;
    let kind = settings.db_kind()?;
    let target = sanitize_db_url(&settings.url);

    let mut opt = ConnectOptions::new(settings.url.clone());
    opt.acquire_timeout(settings.acquire_timeout)
        .sqlx_logging(false);
    if matches!(kind, DbKind::SqliteMemory) {
        // every pooled connection would otherwise open its own private database
        opt.min_connections(1).max_connections(1);
    } else {
        opt.min_connections(settings.min_connections)
            .max_connections(settings.max_connections);
    }

    let conn = retry_connection(
        || {
            let opt = opt.clone();
            let target = target.clone();
            async move {
                Database::connect(opt)
                    .await
                    .map_err(|e| DbInfraError::connect(target, e))
            }
        },
        attempts_for(kind, settings),
        settings.connect_interval,
    )
    .await?;

    info!(backend = "orm", db_kind = ?kind, target = %target, "database connected");
    Ok(conn)
}

/// Build the sqlx pool used by the connection-pool backend.
pub async fn connect_pool(settings: &DbSettings) -> Result<PgPool, DbInfraError> {
    settings.validate()?;
    require_postgres(settings, "pool")?;
    let target = sanitize_db_url(&settings.url);

    let pool = retry_connection(
        || {
            let target = target.clone();
            let options = PgPoolOptions::new()
                .min_connections(settings.min_connections)
                .max_connections(settings.max_connections)
                .acquire_timeout(settings.acquire_timeout);
            async move {
                options
                    .connect(&settings.url)
                    .await
                    .map_err(|e| DbInfraError::connect(target, e))
            }
        },
        settings.connect_attempts,
        settings.connect_interval,
    )
    .await?;

    info!(backend = "pool", target = %target, max_connections = settings.max_connections, "database connected");
    Ok(pool)
}

/// Open the single dedicated connection used by the raw driver backend.
pub async fn connect_raw(settings: &DbSettings) -> Result<PgConnection, DbInfraError> {
    settings.validate()?;
    require_postgres(settings, "raw")?;
    let target = sanitize_db_url(&settings.url);

    let conn = retry_connection(
        || {
            let target = target.clone();
            async move {
                PgConnection::connect(&settings.url)
                    .await
                    .map_err(|e| DbInfraError::connect(target, e))
            }
        },
        settings.connect_attempts,
        settings.connect_interval,
    )
    .await?;

    info!(backend = "raw", target = %target, "database connected");
    Ok(conn)
}

/// Sanitize database URL by masking password in connection strings.
/// Used for logging and error messages.
pub fn sanitize_db_url(url: &str) -> String {
    let Some((auth_part, host_part)) = url.rsplit_once('@') else {
        return url.to_string();
    };
    let Some((scheme, credentials)) = auth_part.split_once("://") else {
        return url.to_string();
    };
    match credentials.split_once(':') {
        Some((user, _password)) => format!("{scheme}://{user}:***@{host_part}"),
        None => url.to_string(),
    }
}
