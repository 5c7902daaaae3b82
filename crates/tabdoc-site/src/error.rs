use tabdoc_storage::{StorageError, StorageErrorKind};

/// Error returned by [`DocumentationService`](crate::DocumentationService).
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Listing or reading sources failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl SiteError {
    /// Whether the underlying failure is a missing source.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Storage(e) => e.kind == StorageErrorKind::NotFound,
        }
    }
}
