use serde::{Deserialize, Serialize};

/// One search hit as returned to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Document title; may contain `<mark>` highlights.
    pub title: String,
    pub slug: String,
    /// Short text around the match; may contain `<mark>` highlights.
    pub excerpt: String,
    pub category: String,
}
