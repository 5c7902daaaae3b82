//! Cache abstraction layer for tabdoc.
//!
//! This crate provides generic caching traits that decouple cache consumers
//! from the underlying storage mechanism. Two traits form the core API:
//!
//! - [`Cache`]: Factory for named cache buckets
//! - [`CacheBucket`]: Key-value store with time-to-live expiry and explicit removal
//!
//! # Implementations
//!
//! - [`NullCache`] / [`NullCacheBucket`]: No-op implementations (always miss)
//! - [`MemoryCache`]: Process-wide in-memory implementation
//! - [`FileCache`]: File-based implementation with version validation
//!
//! Entries older than the cache's TTL read as misses. Staleness is a liveness
//! bound only: callers rebuild and store again on the next miss.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tabdoc_cache::{Cache, MemoryCache};
//!
//! let cache = MemoryCache::new(Duration::from_secs(3600));
//! let bucket = cache.bucket("docs");
//! bucket.set("navigation", b"[]");
//! assert_eq!(bucket.get("navigation"), Some(b"[]".to_vec()));
//! bucket.remove("navigation");
//! assert_eq!(bucket.get("navigation"), None);
//! ```

mod ext;
mod file;
mod memory;

use std::time::Duration;

pub use ext::CacheBucketExt;
pub use file::FileCache;
pub use memory::MemoryCache;

/// Default time-to-live for cache entries (one hour).
pub const DEFAULT_TTL: Duration = Duration::from_hours(1);

/// A named partition within a [`Cache`].
///
/// Values are opaque bytes. A stored entry is returned until it is removed,
/// overwritten, or older than the owning cache's TTL.
pub trait CacheBucket: Send + Sync {
    /// Retrieve a cached value.
    ///
    /// Returns `None` on cache miss or when the entry has expired.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Store a value in the cache.
    ///
    /// Overwrites any existing entry for the same key and restarts its TTL.
    fn set(&self, key: &str, value: &[u8]);

    /// Remove an entry. Removing a missing key is not an error.
    fn remove(&self, key: &str);
}

/// Factory for named cache [`CacheBucket`]s.
///
/// A `Cache` produces buckets that are logically isolated from each other.
/// Calling `bucket` multiple times with the same name returns handles that
/// share the same underlying storage.
pub trait Cache: Send + Sync {
    /// Open or create a named bucket.
    ///
    /// # Arguments
    ///
    /// * `name` - Bucket name (e.g., "docs")
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket>;
}

/// No-op [`CacheBucket`] that never stores or retrieves data.
///
/// Every `get` returns `None`; every `set` and `remove` is silently discarded.
/// Used as the bucket type for [`NullCache`].
pub struct NullCacheBucket;

impl CacheBucket for NullCacheBucket {
    fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _key: &str, _value: &[u8]) {}

    fn remove(&self, _key: &str) {}
}

/// No-op [`Cache`] that always returns [`NullCacheBucket`]s.
///
/// Use when caching is disabled.
pub struct NullCache;

impl Cache for NullCache {
    fn bucket(&self, _name: &str) -> Box<dyn CacheBucket> {
        Box::new(NullCacheBucket)
    }
}
