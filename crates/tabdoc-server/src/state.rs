//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use tabdoc_search::SearchService;
use tabdoc_site::DocumentationService;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Cached navigation and documents.
    pub(crate) docs: Arc<DocumentationService>,
    /// Search with local fallback.
    pub(crate) search: Arc<SearchService>,
    /// Application version for `ETag` computation.
    pub(crate) version: String,
}
