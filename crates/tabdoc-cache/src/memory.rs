//! In-memory cache implementation.
//!
//! [`MemoryCache`] keeps every bucket in one process-wide map guarded by an
//! `RwLock`. Readers never block each other; writers replace whole entries,
//! so a reader sees either the old or the new value, never a partial one.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::{Cache, CacheBucket};

struct Entry {
    stored_at: Instant,
    value: Arc<[u8]>,
}

type Store = Arc<RwLock<HashMap<(String, String), Entry>>>;

/// Process-wide in-memory [`Cache`] with a fixed time-to-live.
#[derive(Clone)]
pub struct MemoryCache {
    store: Store,
    ttl: Duration,
}

impl MemoryCache {
    /// Create an empty cache whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Number of entries currently held, including expired ones not yet evicted.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.read().unwrap().len()
    }

    /// Whether the cache holds no entries.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(MemoryCacheBucket {
            name: name.to_owned(),
            store: Arc::clone(&self.store),
            ttl: self.ttl,
        })
    }
}

struct MemoryCacheBucket {
    name: String,
    store: Store,
    ttl: Duration,
}

impl MemoryCacheBucket {
    fn map_key(&self, key: &str) -> (String, String) {
        (self.name.clone(), key.to_owned())
    }
}

impl CacheBucket for MemoryCacheBucket {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let map_key = self.map_key(key);
        {
            let store = self.store.read().unwrap();
            let entry = store.get(&map_key)?;
            if entry.stored_at.elapsed() < self.ttl {
                return Some(entry.value.to_vec());
            }
        }

        // Expired: evict so the map does not grow with dead entries.
        let mut store = self.store.write().unwrap();
        if store
            .get(&map_key)
            .is_some_and(|e| e.stored_at.elapsed() >= self.ttl)
        {
            store.remove(&map_key);
        }
        None
    }

    fn set(&self, key: &str, value: &[u8]) {
        let entry = Entry {
            stored_at: Instant::now(),
            value: Arc::from(value),
        };
        self.store.write().unwrap().insert(self.map_key(key), entry);
    }

    fn remove(&self, key: &str) {
        self.store.write().unwrap().remove(&self.map_key(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let bucket = cache.bucket("docs");

        bucket.set("doc:button", b"<h1>Button</h1>");
        assert_eq!(bucket.get("doc:button"), Some(b"<h1>Button</h1>".to_vec()));
    }

    #[test]
    fn test_missing_key() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        assert_eq!(cache.bucket("docs").get("nope"), None);
    }

    #[test]
    fn test_overwrite() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let bucket = cache.bucket("docs");

        bucket.set("key", b"first");
        bucket.set("key", b"second");
        assert_eq!(bucket.get("key"), Some(b"second".to_vec()));
    }

    #[test]
    fn test_remove() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let bucket = cache.bucket("docs");

        bucket.set("key", b"value");
        bucket.remove("key");
        assert_eq!(bucket.get("key"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_ttl_always_misses() {
        let cache = MemoryCache::new(Duration::ZERO);
        let bucket = cache.bucket("docs");

        bucket.set("key", b"value");
        assert_eq!(bucket.get("key"), None);
        // Expired entry is evicted on read
        assert!(cache.is_empty());
    }

    #[test]
    fn test_buckets_are_isolated() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let alpha = cache.bucket("alpha");
        let beta = cache.bucket("beta");

        alpha.set("key", b"alpha-data");
        beta.set("key", b"beta-data");

        assert_eq!(alpha.get("key"), Some(b"alpha-data".to_vec()));
        assert_eq!(beta.get("key"), Some(b"beta-data".to_vec()));
    }

    #[test]
    fn test_handles_share_storage() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.bucket("docs").set("key", b"shared");

        let clone = cache.clone();
        assert_eq!(clone.bucket("docs").get("key"), Some(b"shared".to_vec()));
        assert_eq!(cache.len(), 1);
    }
}
