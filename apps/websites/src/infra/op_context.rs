//! Per-call cancellation and deadline signal accepted by every repository operation.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::domain::{RepoError, StorageErrorKind};

#[derive(Debug, Clone)]
pub struct OpContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Default for OpContext {
    fn default() -> Self {
        Self::background()
    }
}

impl OpContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::from_token(CancellationToken::new())
    }

    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Tighten the deadline to `timeout` from now. An earlier deadline is kept.
    ///
    /// A timeout too large to represent as an instant adds no deadline.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Tighten the deadline. An earlier deadline is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Derived context: cancelled with its parent, cancellable on its own.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Race `fut` against cancellation and the deadline.
    ///
    /// Cancellation is checked first, then the deadline. Both are checked
    /// eagerly before `fut` is polled, so an already-dead context never
    /// issues a statement.
    pub async fn run<T, F>(&self, op: &'static str, fut: F) -> Result<T, RepoError>
    where
        F: Future<Output = Result<T, RepoError>>,
    {
        if self.is_cancelled() {
            return Err(cancelled(op));
        }
        if self.is_expired() {
            return Err(timed_out(op));
        }

        let deadline = async {
            match self.deadline() {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;

            _ = self.token.cancelled() => Err(cancelled(op)),
            _ = deadline => Err(timed_out(op)),
            result = fut => result,
        }
    }
}

fn cancelled(op: &'static str) -> RepoError {
    debug!(op, "operation cancelled");
    RepoError::storage(StorageErrorKind::Cancelled, format!("{op} cancelled"))
}

fn timed_out(op: &'static str) -> RepoError {
    debug!(op, "operation deadline exceeded");
    RepoError::storage(StorageErrorKind::Timeout, format!("{op} deadline exceeded"))
}
