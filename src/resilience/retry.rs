//! Single-retry-on-auth-failure protocol.
//!
//! # Responsibilities
//! - Decide, per request, whether a response warrants the one retry
//! - Guarantee at most one retry regardless of outcome
//!
//! # Design Decisions
//! - The retrier only decides; the dispatcher performs the
//!   invalidate-evict-rebuild-reissue sequence so the recovery steps
//!   stay in one place
//! - No backoff and no loop: a second 401/403 is returned as-is

use axum::http::StatusCode;

/// Per-request retry state. Not shared across requests.
#[derive(Debug, Default)]
pub struct Retrier {
    retried: bool,
}

impl Retrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true exactly once, and only for an auth-failure status.
    ///
    /// Marks the retry as consumed when it fires, so a 401/403 on the
    /// retried attempt passes through unchanged.
    pub fn should_retry(&mut self, status: StatusCode) -> bool {
        if self.retried {
            return false;
        }
        if status != StatusCode::UNAUTHORIZED && status != StatusCode::FORBIDDEN {
            return false;
        }
        self.retried = true;
        true
    }
}
