//! Storage trait and error types.
//!
//! Provides the core [`Storage`] trait for listing and reading markdown sources,
//! along with [`StorageError`] for unified error handling across backends.
//!
//! # Slug Convention
//!
//! All `slug` parameters in Storage methods are content slugs, not file paths:
//! - `"button"` - top-level document
//! - `"forms/input"` - nested document
//! - `"index"` - landing document
//!
//! Storage implementations handle the mapping from slugs to source files.

use std::path::PathBuf;

/// One node of the content tree returned by [`Storage::scan`].
///
/// Within a directory, directories come first, then files; each group is
/// ordered byte-wise by `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A directory and its (already filtered and ordered) children.
    Directory {
        /// Base name of the directory.
        name: String,
        /// Nested entries.
        children: Vec<Entry>,
    },
    /// A markdown source file.
    File {
        /// Base name of the file, including the `.md` extension.
        name: String,
        /// Path relative to the content root.
        path: PathBuf,
    },
}

impl Entry {
    /// Base name of the entry (file names keep their extension).
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Directory { name, .. } | Self::File { name, .. } => name,
        }
    }

    /// Base name without the `.md` extension.
    #[must_use]
    pub fn stem(&self) -> &str {
        match self {
            Self::Directory { name, .. } => name,
            Self::File { name, .. } => name.strip_suffix(".md").unwrap_or(name),
        }
    }
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid slug or path.
    InvalidPath,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Candidate source paths for `slug`, relative to the content root, in
/// resolution order.
///
/// Returns `None` for slugs that can never resolve: empty, absolute, or
/// containing empty, `.` or `..` segments. When the underscore variant is
/// identical to the plain candidate it is listed once.
#[must_use]
pub fn slug_candidates(slug: &str) -> Option<Vec<String>> {
    let valid = !slug.is_empty()
        && !slug.contains('\\')
        && slug
            .split('/')
            .all(|segment| !matches!(segment, "" | "." | ".."));
    if !valid {
        return None;
    }

    let plain = format!("{slug}.md");
    let underscored = format!("{}.md", slug.replace('-', "_"));
    let mut candidates = vec![plain];
    if underscored != candidates[0] {
        candidates.push(underscored);
    }
    Some(candidates)
}

/// Storage abstraction for content listing and retrieval.
///
/// Provides a unified interface for accessing markdown sources regardless of
/// backend. Implementations must be deterministic: the same content yields
/// the same scan order and the same resolutions.
pub trait Storage: Send + Sync {
    /// Recursively list the content root.
    ///
    /// Only `.md` files are listed; hidden entries are skipped. A missing
    /// root yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be listed at all.
    fn scan(&self) -> Result<Vec<Entry>, StorageError>;

    /// Map a slug to its source file, relative to the content root.
    ///
    /// Tries the candidates of [`slug_candidates`] in order and returns the
    /// first that exists. Never has side effects.
    fn resolve(&self, slug: &str) -> Option<PathBuf>;

    /// Read the markdown source for a slug.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the slug does not resolve or the file
    /// can't be read.
    fn read(&self, slug: &str) -> Result<String, StorageError>;

    /// Get modification time as seconds since Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the slug does not resolve or mtime can't
    /// be retrieved.
    fn mtime(&self, slug: &str) -> Result<i64, StorageError>;
}
