//! Substring search over the documentation itself.

use std::sync::Arc;

use tabdoc_site::DocumentationService;

use crate::excerpt::query_excerpt;
use crate::result::SearchResult;

/// Excerpt length for local results.
const EXCERPT_CHARS: usize = 150;

/// Case-insensitive substring search over titles and markdown sources.
///
/// Results follow navigation order; there is no ranking.
pub struct LocalSearch {
    docs: Arc<DocumentationService>,
}

impl LocalSearch {
    #[must_use]
    pub fn new(docs: Arc<DocumentationService>) -> Self {
        Self { docs }
    }

    /// Find documents whose title or source contains `query`.
    ///
    /// Documents that fail to load are skipped and logged.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        let needle = query.to_lowercase();

        let navigation = match self.docs.navigation() {
            Ok(navigation) => navigation,
            Err(e) => {
                tracing::warn!(error = %e, "local search could not load navigation");
                return Vec::new();
            }
        };

        let mut results = Vec::new();
        for (node, category) in navigation.files() {
            let document = match self.docs.document(node.slug()) {
                Ok(Some(document)) => document,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(slug = node.slug(), error = %e, "skipping unreadable document");
                    continue;
                }
            };

            if document.title.to_lowercase().contains(&needle)
                || document.raw.to_lowercase().contains(&needle)
            {
                results.push(SearchResult {
                    excerpt: query_excerpt(&document.raw, query, EXCERPT_CHARS),
                    title: document.title,
                    slug: document.slug,
                    category: category.to_owned(),
                });
            }
        }

        results
    }
}
