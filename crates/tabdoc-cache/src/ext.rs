//! Extension trait for [`CacheBucket`] with typed convenience methods.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CacheBucket;

/// Typed convenience methods for [`CacheBucket`].
///
/// [`CacheBucket`] stays object-safe and byte-oriented; callers get
/// `get_json`/`set_json` through this blanket-implemented extension.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tabdoc_cache::{Cache, CacheBucketExt, MemoryCache};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct PageData { title: String }
///
/// let cache = MemoryCache::new(Duration::from_secs(60));
/// let bucket = cache.bucket("docs");
///
/// bucket.set_json("doc:button", &PageData { title: "Button".into() });
/// let data: Option<PageData> = bucket.get_json("doc:button");
/// assert_eq!(data.unwrap().title, "Button");
/// ```
pub trait CacheBucketExt: CacheBucket {
    /// Retrieve a JSON-deserialized value from the cache.
    ///
    /// Returns `None` on cache miss, expiry, or deserialization failure.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = self.get(key)?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "discarding undecodable cache entry");
                None
            }
        }
    }

    /// Store a value as JSON in the cache.
    ///
    /// Silently does nothing if serialization fails.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        if let Ok(bytes) = serde_json::to_vec(value) {
            self.set(key, &bytes);
        }
    }
}

impl<B: CacheBucket + ?Sized> CacheBucketExt for B {}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::{Cache, MemoryCache, NullCache};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        title: String,
        level: u8,
    }

    #[test]
    fn test_json_round_trip_through_memory_bucket() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let bucket = cache.bucket("docs");
        let entry = Entry {
            title: "Alert".to_owned(),
            level: 2,
        };

        bucket.set_json("doc:alert", &entry);

        assert_eq!(bucket.get_json::<Entry>("doc:alert"), Some(entry));
    }

    #[test]
    fn test_get_json_with_invalid_bytes_is_miss() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let bucket = cache.bucket("docs");
        bucket.set("doc:broken", b"{not json");

        assert_eq!(bucket.get_json::<Entry>("doc:broken"), None);
    }

    #[test]
    fn test_get_json_from_null_cache() {
        let bucket = NullCache.bucket("docs");
        bucket.set_json("k", &Entry {
            title: "x".to_owned(),
            level: 1,
        });
        assert_eq!(bucket.get_json::<Entry>("k"), None);
    }
}
