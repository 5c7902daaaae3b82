//! Seam between the search service and the external search engine.

use serde::Deserialize;

use crate::error::SearchError;

/// Highlighted copies of a hit's fields (`<mark>` around matches).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct FormattedHit {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// One hit from the search engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "_formatted", default)]
    pub formatted: Option<FormattedHit>,
}

/// Full-text search engine queried before falling back to local search.
pub trait SearchBackend: Send + Sync {
    /// Return at most `limit` hits for `query`, best first, with `title`
    /// and `content` highlighted.
    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError>;
}
