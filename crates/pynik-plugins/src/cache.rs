//! Fetch cache with TTL (Time-To-Live) support.
//!
//! [`CachingFetcher`] sits in front of another [`Fetcher`] and keeps fetched
//! bodies per URL for a while, so repeated schedule lookups for the same
//! feed do not hit the server every time. The `collect` command evicts
//! expired entries.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::command::BoxFuture;
use crate::error::PluginResult;
use crate::fetch::{FetchResponse, Fetcher};

/// A cached document.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached body.
    pub data: String,
    /// When the entry expires (monotonic clock).
    expires_at: Instant,
}

impl CacheEntry {
    /// Creates a new cache entry with the given TTL.
    pub fn new(data: impl Into<String>, ttl: Duration) -> Self {
        Self {
            data: data.into(),
            expires_at: Instant::now() + ttl,
        }
    }

    /// Returns true if the entry has expired.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Fetched documents keyed by URL.
#[derive(Debug)]
pub struct FeedCache {
    ttl: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl FeedCache {
    /// Creates a cache with the given TTL. A zero TTL disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Returns true if entries are stored at all.
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Gets the body for a URL, only if not expired.
    pub fn get_valid(&self, url: &str) -> Option<&str> {
        self.entries
            .get(url)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.data.as_str())
    }

    /// Inserts or replaces the body for a URL.
    pub fn insert(&mut self, url: impl Into<String>, data: impl Into<String>) {
        if !self.is_enabled() {
            return;
        }
        let url = url.into();
        debug!(url = %url, "Caching document");
        self.entries.insert(url, CacheEntry::new(data, self.ttl));
    }

    /// Removes all expired entries and returns how many were removed.
    pub fn evict_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|url, entry| {
            let keep = !entry.is_expired();
            if !keep {
                trace!(url = %url, "Evicting expired cache entry");
            }
            keep
        });
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted = evicted, "Evicted expired cache entries");
        }
        evicted
    }

    /// Clears all cache entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of cache entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A cache shared between the caching fetcher and the `collect` command.
pub type SharedCache = Arc<Mutex<FeedCache>>;

/// [`Fetcher`] that serves fresh cached bodies before asking `inner`.
pub struct CachingFetcher {
    inner: Arc<dyn Fetcher>,
    cache: SharedCache,
}

impl CachingFetcher {
    /// Wraps `inner` with `cache`.
    pub fn new(inner: Arc<dyn Fetcher>, cache: SharedCache) -> Self {
        Self { inner, cache }
    }

    /// Returns the shared cache.
    pub fn cache(&self) -> SharedCache {
        Arc::clone(&self.cache)
    }

    async fn fetch(&self, url: &str) -> PluginResult<FetchResponse> {
        if let Some(data) = self.cache.lock().await.get_valid(url) {
            trace!(url = %url, "Cache hit");
            return Ok(FetchResponse::new(url, data));
        }
        let response = self.inner.read_url(url).await?;
        self.cache.lock().await.insert(url, response.data.clone());
        Ok(response)
    }
}

impl Fetcher for CachingFetcher {
    fn read_url<'a>(&'a self, url: &'a str) -> BoxFuture<'a, PluginResult<FetchResponse>> {
        Box::pin(self.fetch(url))
    }
}
