//! File-based cache implementation.
//!
//! [`FileCache`] stores cache entries as files on disk, organized into buckets
//! (subdirectories). Each entry is a single file with a binary header followed
//! by the data:
//!
//! ```text
//! [written_at_ms: u64 LE][data bytes]
//! ```
//!
//! On read, only the header is read first to check the entry's age. The full
//! data is read only when the entry is still fresh.
//!
//! On construction, [`FileCache`] validates a `VERSION` file in the cache root.
//! If the version mismatches or is missing, the entire cache directory is wiped
//! and recreated. Stale caches from previous builds are never used.
//!
//! Because entries live on disk, a maintenance process (`tabdoc cache clear`)
//! can invalidate entries that a running server will observe on its next read.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::{Cache, CacheBucket};

/// File extension for entry files, so that `a` and `a/b` never collide.
const ENTRY_EXT: &str = "entry";

/// File-based [`Cache`] rooted at a directory on disk.
///
/// Directory layout:
/// ```text
/// {root}/
/// +-- VERSION                 # contains the cache version string
/// +-- docs/                   # bucket "docs"
///     +-- navigation.entry    # key "navigation"
///     +-- doc/
///         +-- button.entry    # key "doc:button"
///         +-- forms/
///             +-- input.entry # key "doc:forms/input"
/// ```
pub struct FileCache {
    root: PathBuf,
    ttl: Duration,
}

impl FileCache {
    /// Create a new file-based cache at `root`, validating the cache version.
    ///
    /// If the `VERSION` file inside `root` does not match `version`, the entire
    /// cache directory is removed and recreated with the new version. Errors
    /// during validation are logged but never fatal.
    #[must_use]
    pub fn new(root: PathBuf, version: &str, ttl: Duration) -> Self {
        validate_version(&root, version);
        Self { root, ttl }
    }
}

impl Cache for FileCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(FileCacheBucket {
            dir: self.root.join(name),
            ttl: self.ttl,
        })
    }
}

/// A single bucket backed by a directory on disk.
struct FileCacheBucket {
    dir: PathBuf,
    ttl: Duration,
}

impl FileCacheBucket {
    /// Map a cache key to an entry file.
    ///
    /// `:` and `/` both act as directory separators. Keys with empty, `.` or
    /// `..` segments are rejected so an entry can never escape the bucket.
    fn entry_path(&self, key: &str) -> Option<PathBuf> {
        let relative: PathBuf = key.split([':', '/']).collect();
        let valid = !key.is_empty()
            && key.split([':', '/']).all(|s| !s.is_empty())
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            tracing::debug!(key = %key, "rejecting cache key");
            return None;
        }
        let mut path = self.dir.join(relative);
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        path.set_file_name(format!("{file_name}.{ENTRY_EXT}"));
        Some(path)
    }
}

impl CacheBucket for FileCacheBucket {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.entry_path(key)?;
        let mut file = File::open(&path).ok()?;

        // Read write timestamp (u64 LE, milliseconds since epoch)
        let mut ts_buf = [0u8; 8];
        file.read_exact(&mut ts_buf).ok()?;
        let written_at = u64::from_le_bytes(ts_buf);

        let age_ms = now_millis().saturating_sub(written_at);
        if u128::from(age_ms) >= self.ttl.as_millis() {
            tracing::debug!(key = %key, "cache entry expired");
            let _ = fs::remove_file(&path);
            return None;
        }

        // The header is consumed; copy the remaining payload
        let mut data = Vec::new();
        io::copy(&mut file, &mut data).ok()?;
        Some(data)
    }

    fn set(&self, key: &str, value: &[u8]) {
        let Some(path) = self.entry_path(key) else {
            return;
        };

        // Write failures leave the entry uncached
        let Some(parent) = path.parent() else {
            return;
        };
        if fs::create_dir_all(parent).is_err() {
            return;
        }

        let mut buf = Vec::with_capacity(8 + value.len());
        buf.extend_from_slice(&now_millis().to_le_bytes());
        buf.extend_from_slice(value);

        // Write to a sibling temp file and rename, so readers never see a
        // half-written entry.
        let tmp = path.with_extension(format!("{ENTRY_EXT}.tmp"));
        if fs::write(&tmp, &buf).is_ok() && fs::rename(&tmp, &path).is_err() {
            let _ = fs::remove_file(&tmp);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(path) = self.entry_path(key) {
            let _ = fs::remove_file(path);
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Validate the cache version, wiping the directory on mismatch.
fn validate_version(root: &Path, version: &str) {
    let version_file = root.join("VERSION");

    match fs::read_to_string(&version_file) {
        Ok(stored) if stored == version => {
            tracing::debug!("cache version matches: {version}");
            return;
        }
        Ok(stored) => {
            tracing::info!(
                "cache version mismatch (stored={stored}, current={version}), wiping cache"
            );
        }
        Err(_) => {
            tracing::info!("no cache VERSION file found, initializing cache");
        }
    }

    if root.exists()
        && let Err(e) = fs::remove_dir_all(root)
    {
        tracing::warn!("failed to remove cache directory: {e}");
    }
    if let Err(e) = fs::create_dir_all(root) {
        tracing::warn!("failed to create cache directory: {e}");
        return;
    }
    if let Err(e) = fs::write(&version_file, version) {
        tracing::warn!("failed to write cache VERSION file: {e}");
    }
}
