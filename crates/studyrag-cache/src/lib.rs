//! Bounded, time-expiring cache for recommendation lookups.
//!
//! Entries are keyed by (query, scope, limit), expire after a fixed TTL, and
//! the least recently used key is evicted once the cache is full. The cache
//! knows nothing about the values it stores, so any remote catalog lookup
//! can sit behind it.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

/// Composite key: two logically identical requests map to the same key by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub query: String,
    pub scope: String,
    pub limit: usize,
}

impl CacheKey {
    pub fn new(query: &str, scope: &str, limit: usize) -> Self {
        Self {
            query: query.to_string(),
            scope: scope.to_string(),
            limit,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            // 24 hours, matching how long recommendation lists stay useful.
            ttl: Duration::from_millis(86_400_000),
            max_entries: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub len: usize,
    pub max_entries: usize,
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    created_at: Instant,
}

#[derive(Debug)]
struct CacheInner<V> {
    entries: HashMap<CacheKey, CacheEntry<V>>,
    // Front is least recently used.
    access_order: Vec<CacheKey>,
}

impl<V> CacheInner<V> {
    fn touch(&mut self, key: &CacheKey) {
        self.access_order.retain(|k| k != key);
        self.access_order.push(key.clone());
    }

    fn remove(&mut self, key: &CacheKey) {
        self.entries.remove(key);
        self.access_order.retain(|k| k != key);
    }

    fn evict_lru(&mut self) {
        if self.access_order.is_empty() {
            return;
        }
        let victim = self.access_order.remove(0);
        debug!(query = %victim.query, "evicted least recently used cache entry");
        self.entries.remove(&victim);
    }
}

#[derive(Debug)]
pub struct RecommendationCache<V> {
    inner: Mutex<CacheInner<V>>,
    ttl: Duration,
    max_entries: usize,
}

impl<V: Clone> RecommendationCache<V> {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                access_order: Vec::new(),
            }),
            ttl: config.ttl,
            max_entries: config.max_entries.max(1),
        }
    }

    /// Returns the cached value, or `None` if the key was never set or its
    /// entry aged past the TTL (stale entries are dropped on this read).
    /// A hit counts as a use for eviction ordering.
    pub fn get(&self, query: &str, scope: &str, limit: usize) -> Option<V> {
        let key = CacheKey::new(query, scope, limit);
        let mut inner = self.inner.lock();

        let expired = match inner.entries.get(&key) {
            None => return None,
            Some(entry) => entry.created_at.elapsed() > self.ttl,
        };
        if expired {
            debug!(query, "cache entry expired");
            inner.remove(&key);
            return None;
        }
        inner.touch(&key);
        inner.entries.get(&key).map(|e| e.value.clone())
    }

    /// Inserts or overwrites. Inserting a new key at capacity evicts the
    /// least recently used key first; the cache never exceeds its bound.
    pub fn set(&self, query: &str, scope: &str, limit: usize, value: V) {
        let key = CacheKey::new(query, scope, limit);
        let mut inner = self.inner.lock();

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.max_entries {
            inner.evict_lru();
        }
        inner.entries.insert(
            key.clone(),
            CacheEntry {
                value,
                created_at: Instant::now(),
            },
        );
        inner.touch(&key);
    }

    /// Serves from the cache when possible, otherwise runs `fetch` and
    /// stores its result. Lookup errors are propagated and never cached.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        query: &str,
        scope: &str,
        limit: usize,
        fetch: F,
    ) -> anyhow::Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>>,
    {
        if let Some(hit) = self.get(query, scope, limit) {
            debug!(query, "recommendation cache hit");
            return Ok(hit);
        }
        let value = fetch().await?;
        self.set(query, scope, limit, value.clone());
        Ok(value)
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.access_order.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            len: self.len(),
            max_entries: self.max_entries,
        }
    }
}
