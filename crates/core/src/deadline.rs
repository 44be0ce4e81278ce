//! Cancellable deadlines for bounded remote work.
//!
//! A [`Deadline`] pairs an optional expiry instant with a
//! [`CancellationToken`]. Child deadlines expire no later than their parent
//! and are cancelled together with it, so a per-upload bound composes with
//! whatever outer bound the caller already holds (request scope, server
//! shutdown).

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

/// Why a deadline-bounded future did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    /// The expiry instant passed first.
    #[error("deadline exceeded")]
    DeadlineExceeded,
    /// The cancellation token fired first.
    #[error("cancelled")]
    Cancelled,
}

/// Expiry instant plus cancellation token.
#[derive(Debug, Clone)]
pub struct Deadline {
    expires_at: Option<Instant>,
    token: CancellationToken,
}

impl Deadline {
    /// A deadline that never expires and is only cancelled explicitly.
    #[must_use]
    pub fn never() -> Self {
        Self::from_token(CancellationToken::new())
    }

    /// A deadline without expiry driven by an existing token.
    #[must_use]
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            expires_at: None,
            token,
        }
    }

    /// A deadline expiring `timeout` from now.
    ///
    /// A timeout too large to represent as an instant means no expiry.
    #[must_use]
    pub fn after(timeout: Duration) -> Self {
        Self {
            expires_at: Instant::now().checked_add(timeout),
            token: CancellationToken::new(),
        }
    }

    /// A child expiring at the earlier of `timeout` from now and this deadline.
    ///
    /// Cancelling `self` cancels the child; cancelling the child leaves
    /// `self` untouched.
    #[must_use]
    pub fn child(&self, timeout: Duration) -> Self {
        let own = Instant::now().checked_add(timeout);
        let expires_at = match (self.expires_at, own) {
            (Some(parent), Some(own)) => Some(parent.min(own)),
            (parent, None) => parent,
            (None, own) => own,
        };

        Self {
            expires_at,
            token: self.token.child_token(),
        }
    }

    /// Instant at which the deadline expires, if any.
    #[must_use]
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Time left before expiry; `None` for deadlines without expiry.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Whether the deadline has expired or been cancelled.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.token.is_cancelled() || self.expires_at.is_some_and(|at| at <= Instant::now())
    }

    /// Cancel this deadline and all of its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The cancellation token.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Drive `fut` until it completes, the deadline expires, or the token is
    /// cancelled. On interruption `fut` is dropped, aborting whatever it was
    /// doing.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        if self.token.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }
        if self.expires_at.is_some_and(|at| at <= Instant::now()) {
            return Err(Interrupted::DeadlineExceeded);
        }

        let expiry = async {
            match self.expires_at {
                Some(at) => sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(Interrupted::Cancelled),
            () = expiry => Err(Interrupted::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }
}
