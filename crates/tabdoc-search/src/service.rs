//! Search entry point: external engine first, local search as fallback.

use tabdoc_site::DEFAULT_CATEGORY;

use crate::backend::{SearchBackend, SearchHit};
use crate::excerpt::highlighted_excerpt;
use crate::local::LocalSearch;
use crate::result::SearchResult;

/// Queries shorter than this many characters return no results.
pub const MIN_QUERY_CHARS: usize = 2;
/// Maximum number of hits requested from the engine.
const RESULT_LIMIT: usize = 20;
/// Excerpt length for engine results.
const EXCERPT_CHARS: usize = 200;

/// Search over the documentation.
///
/// With a backend configured, the backend is asked first; any backend
/// error is logged and answered by [`LocalSearch`] instead. Errors never
/// reach the caller and failed requests are not retried.
pub struct SearchService {
    backend: Option<Box<dyn SearchBackend>>,
    local: LocalSearch,
}

impl SearchService {
    #[must_use]
    pub fn new(backend: Option<Box<dyn SearchBackend>>, local: LocalSearch) -> Self {
        Self { backend, local }
    }

    /// Search for `query`.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        let Some(backend) = &self.backend else {
            return self.local.search(query);
        };

        match backend.search(query, RESULT_LIMIT) {
            Ok(hits) => hits.into_iter().map(result_from_hit).collect(),
            Err(e) => {
                tracing::warn!(error = %e, query, "search backend failed, using local search");
                self.local.search(query)
            }
        }
    }
}

fn result_from_hit(hit: SearchHit) -> SearchResult {
    let formatted = hit.formatted.unwrap_or_default();
    let content = formatted.content.unwrap_or(hit.content);

    SearchResult {
        title: formatted.title.unwrap_or(hit.title),
        slug: hit.slug,
        excerpt: highlighted_excerpt(&content, EXCERPT_CHARS),
        category: hit
            .category
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
    }
}
