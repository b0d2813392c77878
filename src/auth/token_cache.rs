//! OAuth bearer token cache.
//!
//! # Responsibilities
//! - Map an OAuth client ID to its current bearer token
//! - Expire entries on the issuer-declared lifetime, minus a margin
//! - Purge expired entries in the background
//!
//! # Design Decisions
//! - A present entry is always usable; validity is never re-checked
//!   beyond presence, so the TTL carries a 2s safety margin to avoid
//!   presenting a token in its final seconds
//! - Last put wins on concurrent refreshes for the same client

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::time;

use crate::observability::metrics;

/// Safety margin subtracted from the issuer-declared lifetime.
const EXPIRY_MARGIN_SECS: u64 = 2;

#[derive(Debug, Clone)]
struct TokenEntry {
    token: String,
    deadline: Instant,
}

/// A thread-safe cache of bearer tokens keyed by OAuth client ID.
#[derive(Clone, Default)]
pub struct TokenCache {
    inner: Arc<DashMap<String, TokenEntry>>,
}

impl TokenCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Get the cached token for a client ID, if present and unexpired.
    pub fn get(&self, client_id: &str) -> Option<String> {
        let entry = self.inner.get(client_id)?;
        if entry.deadline <= Instant::now() {
            drop(entry);
            self.inner.remove(client_id);
            return None;
        }
        Some(entry.token.clone())
    }

    /// Cache a token with the issuer-declared `expires_in` seconds.
    ///
    /// Effective TTL is `max(expires_in - 2, 0)`.
    pub fn put(&self, client_id: &str, token: &str, expires_in_secs: u64) {
        let ttl = expires_in_secs.saturating_sub(EXPIRY_MARGIN_SECS);
        let entry = TokenEntry {
            token: token.to_string(),
            deadline: Instant::now() + Duration::from_secs(ttl),
        };
        self.inner.insert(client_id.to_string(), entry);
    }

    /// Drop the cached token for a client ID.
    pub fn remove(&self, client_id: &str) {
        self.inner.remove(client_id);
    }

    /// Number of cached tokens, including not-yet-swept expired ones.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Periodically purge expired entries until shutdown.
    pub async fn run_sweeper(self, interval: Duration, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = time::interval(interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = Instant::now();
                    self.inner.retain(|_, entry| entry.deadline > now);
                    metrics::record_token_cache_size(self.inner.len());
                }
                _ = shutdown.recv() => {
                    tracing::info!("Token cache sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
