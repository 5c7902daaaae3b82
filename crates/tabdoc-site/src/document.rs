use serde::{Deserialize, Serialize};
use tabdoc_renderer::TocEntry;

/// A rendered documentation page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Slug the document was requested by.
    pub slug: String,
    /// First H1 text, or the title-cased last slug segment.
    pub title: String,
    /// Rendered HTML body.
    pub html: String,
    /// Markdown source.
    pub raw: String,
    /// Headings of level 2-4.
    pub toc: Vec<TocEntry>,
    /// Source modification time (seconds since the Unix epoch).
    pub updated_at: i64,
}
