//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::storage::{Entry, Storage, StorageError, StorageErrorKind, slug_candidates};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores sources in memory, keyed by their path relative to the content
/// root. The content tree returned by `scan()` is derived from those paths
/// with the same filtering and ordering rules as the filesystem backend.
///
/// # Example
///
/// ```ignore
/// use tabdoc_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("forms/input.md", "# Input\n\nText fields.")
///     .with_mtime("forms/input.md", 1_700_000_000);
///
/// let tree = storage.scan().unwrap();
/// let source = storage.read("forms/input").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<HashMap<PathBuf, String>>,
    mtimes: RwLock<HashMap<PathBuf, i64>>,
    read_errors: RwLock<HashSet<PathBuf>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source file at `path` (relative to the content root).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into());
        self
    }

    /// Set modification time for a path.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `mtime` - Modification time as seconds since Unix epoch
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_mtime(self, path: impl Into<PathBuf>, mtime: i64) -> Self {
        self.mtimes.write().unwrap().insert(path.into(), mtime);
        self
    }

    /// Make reads of an existing path fail with a permission error.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_read_error(self, path: impl Into<PathBuf>) -> Self {
        self.read_errors.write().unwrap().insert(path.into());
        self
    }

    /// Replace the content of a path, adding it if missing.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_file(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into());
    }

    /// Remove a path.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        self.files.write().unwrap().remove(path.as_ref());
    }

    fn resolve_or_error(&self, slug: &str) -> Result<PathBuf, StorageError> {
        if slug_candidates(slug).is_none() {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(slug)
                .with_backend(BACKEND));
        }
        self.resolve(slug)
            .ok_or_else(|| StorageError::not_found(format!("{slug}.md")).with_backend(BACKEND))
    }
}

/// Build one level of the tree from paths split into segments.
fn build_level(prefix: &Path, paths: &[Vec<String>]) -> Vec<Entry> {
    let mut directories: BTreeMap<&str, Vec<Vec<String>>> = BTreeMap::new();
    let mut files: BTreeSet<&str> = BTreeSet::new();

    for segments in paths {
        match segments.as_slice() {
            [name] => {
                files.insert(name.as_str());
            }
            [dir, rest @ ..] => directories
                .entry(dir.as_str())
                .or_default()
                .push(rest.to_vec()),
            [] => {}
        }
    }

    let mut entries: Vec<Entry> = directories
        .into_iter()
        .map(|(name, rest)| Entry::Directory {
            name: name.to_owned(),
            children: build_level(&prefix.join(name), &rest),
        })
        .collect();
    entries.extend(files.into_iter().map(|name| Entry::File {
        name: name.to_owned(),
        path: prefix.join(name),
    }));
    entries
}

impl Storage for MockStorage {
    fn scan(&self) -> Result<Vec<Entry>, StorageError> {
        let files = self.files.read().unwrap();
        let paths: Vec<Vec<String>> = files
            .keys()
            .filter(|p| p.extension().is_some_and(|e| e == "md"))
            .map(|p| {
                p.iter()
                    .map(|s| s.to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
            })
            .filter(|segments| segments.iter().all(|s| !s.starts_with('.')))
            .collect();
        Ok(build_level(Path::new(""), &paths))
    }

    fn resolve(&self, slug: &str) -> Option<PathBuf> {
        let files = self.files.read().unwrap();
        slug_candidates(slug)?
            .into_iter()
            .map(PathBuf::from)
            .find(|rel| files.contains_key(rel))
    }

    fn read(&self, slug: &str) -> Result<String, StorageError> {
        let path = self.resolve_or_error(slug)?;
        if self.read_errors.read().unwrap().contains(&path) {
            return Err(StorageError::new(StorageErrorKind::PermissionDenied)
                .with_path(path)
                .with_backend(BACKEND));
        }
        self.files
            .read()
            .unwrap()
            .get(&path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }

    fn mtime(&self, slug: &str) -> Result<i64, StorageError> {
        let path = self.resolve_or_error(slug)?;
        Ok(self
            .mtimes
            .read()
            .unwrap()
            .get(&path)
            .copied()
            .unwrap_or(0))
    }
}
