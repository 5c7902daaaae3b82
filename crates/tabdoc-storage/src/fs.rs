//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for reading markdown sources from a content root on
//! the local filesystem.

use std::fs;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use crate::scanner::Scanner;
use crate::storage::{Entry, Storage, StorageError, StorageErrorKind, slug_candidates};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage implementation.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use tabdoc_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("resources/docs"));
/// assert_eq!(storage.resolve("forms/input"), Some(PathBuf::from("forms/input.md")));
/// ```
pub struct FsStorage {
    /// Root directory of the content tree.
    source_dir: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at `source_dir`.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Content root this storage reads from.
    #[must_use]
    pub fn source_dir(&self) -> &std::path::Path {
        &self.source_dir
    }

    /// Resolve a slug to an absolute path or a typed error.
    fn resolve_full(&self, slug: &str) -> Result<PathBuf, StorageError> {
        if slug_candidates(slug).is_none() {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(slug)
                .with_backend(BACKEND));
        }
        self.resolve(slug)
            .map(|rel| self.source_dir.join(rel))
            .ok_or_else(|| StorageError::not_found(format!("{slug}.md")).with_backend(BACKEND))
    }
}

impl Storage for FsStorage {
    fn scan(&self) -> Result<Vec<Entry>, StorageError> {
        Ok(Scanner::new(&self.source_dir).scan())
    }

    fn resolve(&self, slug: &str) -> Option<PathBuf> {
        slug_candidates(slug)?
            .into_iter()
            .map(PathBuf::from)
            .find(|rel| self.source_dir.join(rel).is_file())
    }

    fn read(&self, slug: &str) -> Result<String, StorageError> {
        let full_path = self.resolve_full(slug)?;
        fs::read_to_string(&full_path)
            .map_err(|e| StorageError::io(e, Some(full_path)).with_backend(BACKEND))
    }

    fn mtime(&self, slug: &str) -> Result<i64, StorageError> {
        let full_path = self.resolve_full(slug)?;
        let metadata = fs::metadata(&full_path)
            .map_err(|e| StorageError::io(e, Some(full_path.clone())).with_backend(BACKEND))?;
        let modified = metadata
            .modified()
            .map_err(|e| StorageError::io(e, Some(full_path)).with_backend(BACKEND))?;
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX)))
    }
}
