//! Backend descriptor cache.
//!
//! # Responsibilities
//! - Map a service ID to its cached forwarding target and strategy
//! - Evict entries on a single fixed TTL, independent of token expiry
//! - Purge expired entries in the background
//!
//! # Design Decisions
//! - Concurrent misses for the same ID may each build an entry; last
//!   put wins. Builds are idempotent apart from the metadata lookup
//!   call, so this costs at most one extra lookup per TTL window
//! - Entries are handed out as `Arc`s; eviction never invalidates an
//!   entry a request is already holding

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::time;
use url::Url;

use crate::auth::AuthStrategy;
use crate::observability::metrics;
use crate::registry::RequestParameters;

/// Cached forwarding target for one service ID.
pub struct BackendEntry {
    /// Base URL requests are forwarded to.
    pub target_url: Url,

    /// Transport toward this backend, built with the shared TLS flags.
    pub client: reqwest::Client,

    /// Authorization strategy selected at entry creation.
    pub strategy: AuthStrategy,

    /// Fixed request parameters declared in the service metadata.
    pub request_parameters: Option<RequestParameters>,
}

struct CachedEntry {
    entry: Arc<BackendEntry>,
    inserted: Instant,
}

/// A thread-safe cache of backend entries keyed by service ID.
#[derive(Clone)]
pub struct BackendCache {
    inner: Arc<DashMap<String, CachedEntry>>,
    ttl: Duration,
}

impl BackendCache {
    /// Create a cache whose entries expire `ttl` after their last write.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Get the entry for a service ID, if present and unexpired.
    pub fn get(&self, service_id: &str) -> Option<Arc<BackendEntry>> {
        let cached = self.inner.get(service_id)?;
        if cached.inserted.elapsed() >= self.ttl {
            drop(cached);
            self.inner.remove(service_id);
            return None;
        }
        Some(cached.entry.clone())
    }

    /// Insert an entry, replacing any previous one for the ID.
    pub fn put(&self, service_id: &str, entry: BackendEntry) -> Arc<BackendEntry> {
        let entry = Arc::new(entry);
        self.inner.insert(
            service_id.to_string(),
            CachedEntry {
                entry: entry.clone(),
                inserted: Instant::now(),
            },
        );
        entry
    }

    /// Evict the entry for a service ID.
    pub fn remove(&self, service_id: &str) {
        self.inner.remove(service_id);
    }

    /// Number of cached entries, including not-yet-swept expired ones.
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
                    let ttl = self.ttl;
                    self.inner.retain(|_, cached| cached.inserted.elapsed() < ttl);
                    metrics::record_backend_cache_size(self.inner.len());
                }
                _ = shutdown.recv() => {
                    tracing::info!("Backend cache sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
