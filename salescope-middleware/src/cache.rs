//! TTL caching for record sources

use crate::Layer;
use async_trait::async_trait;
use indexmap::IndexMap;
use salescope_core::{RecordSet, RecordSource, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, trace};

/// Default time a loaded record set stays fresh
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Default number of sources a shared cache holds
pub const DEFAULT_MAX_SOURCES: usize = 16;

/// Cache key: the name of the source that produced the records
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a source
    pub fn for_source(source: &dyn RecordSource) -> Self {
        CacheKey(source.name().to_string())
    }
}

/// Record-set cache with TTL and LRU eviction
#[derive(Debug)]
pub struct SourceCache {
    /// Cached record sets with LRU ordering
    entries: IndexMap<CacheKey, CacheEntry>,
    /// Maximum number of entries
    max_size: usize,
    /// TTL for new entries
    default_ttl: Duration,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    records: Arc<RecordSet>,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) > self.ttl
    }
}

impl SourceCache {
    /// Create a new cache
    pub fn new(max_size: usize, default_ttl: Duration) -> Self {
        Self {
            entries: IndexMap::new(),
            max_size: max_size.max(1),
            default_ttl,
        }
    }

    /// Get a fresh record set, dropping it if it has expired
    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<RecordSet>> {
        let expired = self.entries.get(key)?.is_expired(Instant::now());
        if expired {
            self.entries.shift_remove(key);
            trace!(source = %key.0, "Cache entry expired");
            return None;
        }

        // Move to the end to mark it most recently used
        let index = self.entries.get_index_of(key)?;
        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        self.entries.get(key).map(|entry| Arc::clone(&entry.records))
    }

    /// Store a record set
    pub fn put(&mut self, key: CacheKey, records: Arc<RecordSet>) {
        self.entries.shift_remove(&key);

        while self.entries.len() >= self.max_size {
            if let Some((oldest, _)) = self.entries.shift_remove_index(0) {
                debug!(source = %oldest.0, "Evicted oldest cache entry");
            }
        }

        self.entries.insert(
            key,
            CacheEntry {
                records,
                created_at: Instant::now(),
                ttl: self.default_ttl,
            },
        );
    }

    /// Drop one entry
    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        self.entries.shift_remove(key).is_some()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop expired entries
    pub fn clear_expired(&mut self) {
        let now = Instant::now();
        self.entries.retain(|key, entry| {
            let expired = entry.is_expired(now);
            if expired {
                debug!(source = %key.0, "Removed expired cache entry");
            }
            !expired
        });
    }

    /// Number of entries, fresh or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cache middleware layer
///
/// Clones share the same cache.
#[derive(Debug, Clone)]
pub struct CacheLayer {
    cache: Arc<RwLock<SourceCache>>,
}

impl CacheLayer {
    /// Create a layer whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(DEFAULT_MAX_SOURCES, ttl)
    }

    /// Create a layer holding at most `max_size` sources
    pub fn with_capacity(max_size: usize, ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(SourceCache::new(max_size, ttl))),
        }
    }

    /// Drop every cached record set
    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }
}

impl Default for CacheLayer {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<S> Layer<S> for CacheLayer {
    type Service = CachedSource<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CachedSource {
            inner,
            cache: Arc::clone(&self.cache),
        }
    }
}

/// A record source whose loads are memoized for the layer's TTL
pub struct CachedSource<S> {
    inner: S,
    cache: Arc<RwLock<SourceCache>>,
}

impl<S: RecordSource> CachedSource<S> {
    /// Forget this source's cached records so the next load refetches
    pub async fn invalidate(&self) -> bool {
        let key = CacheKey::for_source(&self.inner);
        self.cache.write().await.invalidate(&key)
    }

    /// The wrapped source
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: RecordSource> RecordSource for CachedSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn load(&self) -> Result<Arc<RecordSet>> {
        let key = CacheKey::for_source(&self.inner);

        if let Some(records) = self.cache.write().await.get(&key) {
            debug!(source = %key.0, "Cache hit");
            return Ok(records);
        }

        debug!(source = %key.0, "Cache miss");
        let records = self.inner.load().await?;
        info!(
            source = %key.0,
            sales = records.sales.len(),
            line_items = records.line_items.len(),
            "Loaded records"
        );

        self.cache.write().await.put(key, Arc::clone(&records));
        Ok(records)
    }
}
