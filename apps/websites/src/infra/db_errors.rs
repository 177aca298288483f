//! Native driver error -> RepoError translation.
//!
//! One translator per access mechanism: `map_sqlx_err` serves the raw and
//! pool adapters, `map_db_err` serves the SeaORM adapter. Zero-row outcomes
//! of targeted mutations go through `expect_rows_updated` /
//! `expect_rows_deleted` so every adapter reports them the same way.

use sea_orm::{ConnAcquireErr, DbErr, RuntimeErr};
use tracing::{debug, error, warn};

use crate::errors::domain::{RepoError, StorageError, StorageErrorKind};

/// SQLSTATE for `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Only the tagged `SQLSTATE(code)` form counts; bare digits in a message
/// may be a port, an id or a value.
fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(&format!("SQLSTATE({code})"))
}

/// Recognise unique violations from rendered messages of either engine.
fn is_unique_violation_message(msg: &str) -> bool {
    mentions_sqlstate(msg, UNIQUE_VIOLATION)
        || msg.contains("duplicate key value violates unique constraint")
        || msg.contains("UNIQUE constraint failed")
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation()
                || db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                || is_unique_violation_message(db_err.message())
        }
        _ => false,
    }
}

/// Translate a `sqlx::Error` into a `RepoError`.
pub fn map_sqlx_err(e: sqlx::Error) -> RepoError {
    let (kind, detail) = match &e {
        sqlx::Error::RowNotFound => {
            debug!("No row returned for single-row query");
            return RepoError::NotFound;
        }
        err if is_unique_violation(err) => {
            warn!(raw_error = %e, "Unique constraint violation");
            return RepoError::Duplicate;
        }
        sqlx::Error::PoolTimedOut => (StorageErrorKind::Timeout, "Database pool timed out"),
        sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
            (StorageErrorKind::Unavailable, "Database unavailable")
        }
        _ => (StorageErrorKind::Other, "Database operation failed"),
    };

    if matches!(kind, StorageErrorKind::Other) {
        error!(raw_error = %e, "Unhandled database error");
    } else {
        warn!(raw_error = %e, kind = ?kind, "Database operational error");
    }
    RepoError::Storage(StorageError::with_source(kind, detail, e))
}

/// Translate a SeaORM `DbErr` into a `RepoError`.
pub fn map_db_err(e: DbErr) -> RepoError {
    match &e {
        DbErr::RecordNotFound(_) => {
            debug!("Record not found");
            RepoError::NotFound
        }
        DbErr::RecordNotUpdated => {
            debug!("Update matched no record");
            RepoError::UpdateFailed
        }
        DbErr::Exec(RuntimeErr::SqlxError(inner)) | DbErr::Query(RuntimeErr::SqlxError(inner))
            if is_unique_violation(inner) =>
        {
            warn!(raw_error = %e, "Unique constraint violation");
            RepoError::Duplicate
        }
        // connectivity failures stay operational whatever their text says
        DbErr::ConnectionAcquire(ConnAcquireErr::Timeout) => {
            warn!(raw_error = %e, "Database timeout or pool issue");
            RepoError::Storage(StorageError::with_source(
                StorageErrorKind::Timeout,
                "Database timeout",
                e,
            ))
        }
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            warn!(raw_error = %e, "Database unavailable");
            RepoError::Storage(StorageError::with_source(
                StorageErrorKind::Unavailable,
                "Database unavailable",
                e,
            ))
        }
        _ => {
            let error_msg = e.to_string();
            if is_unique_violation_message(&error_msg) {
                warn!(raw_error = %error_msg, "Unique constraint violation");
                return RepoError::Duplicate;
            }
            error!(raw_error = %error_msg, "Unhandled database error");
            RepoError::Storage(StorageError::with_source(
                StorageErrorKind::Other,
                "Database operation failed",
                e,
            ))
        }
    }
}

/// Zero rows on a targeted UPDATE means the id matched nothing.
pub fn expect_rows_updated(rows_affected: u64) -> Result<(), RepoError> {
    if rows_affected == 0 {
        debug!("Update affected zero rows");
        return Err(RepoError::UpdateFailed);
    }
    Ok(())
}

/// Zero rows on a targeted DELETE means the id matched nothing.
pub fn expect_rows_deleted(rows_affected: u64) -> Result<(), RepoError> {
    if rows_affected == 0 {
        debug!("Delete affected zero rows");
        return Err(RepoError::DeleteFailed);
    }
    Ok(())
}
