//! Records pushed to the search index.

use std::sync::LazyLock;

use md5::{Digest, Md5};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tabdoc_site::{Document, DocumentationService, SiteError};

use crate::excerpt::strip_tags;

static FENCED_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid regex"));
static INLINE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`]+`").expect("valid regex"));
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+").expect("valid regex"));
static BOLD_STAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid regex"));
static BOLD_UNDERSCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([^_]+)__").expect("valid regex"));
static ITALIC_STAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+)\*").expect("valid regex"));
static ITALIC_UNDERSCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([^_]+)_").expect("valid regex"));
static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]+\)").expect("valid regex"));
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid regex"));
static BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// One document as stored in the search index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// MD5 hex digest of the slug; the index primary key.
    pub id: String,
    pub slug: String,
    pub title: String,
    /// Markdown source reduced to plain text.
    pub content: String,
    pub category: String,
    /// Table of contents titles joined by spaces.
    pub headings: String,
    pub updated_at: Option<i64>,
}

impl IndexRecord {
    /// Build the record for `document` listed under `category`.
    #[must_use]
    pub fn from_document(document: &Document, category: &str) -> Self {
        let headings = document
            .toc
            .iter()
            .map(|entry| entry.title.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            id: record_id(&document.slug),
            slug: document.slug.clone(),
            title: document.title.clone(),
            content: strip_markdown(&document.raw),
            category: category.to_owned(),
            headings,
            updated_at: Some(document.updated_at),
        }
    }
}

/// Primary key for a slug: lowercase hex MD5.
#[must_use]
pub fn record_id(slug: &str) -> String {
    hex::encode(Md5::digest(slug.as_bytes()))
}

/// Reduce markdown to searchable plain text.
///
/// Code is dropped entirely, emphasis and links keep their text, images and
/// HTML tags disappear.
#[must_use]
pub fn strip_markdown(markdown: &str) -> String {
    let text = FENCED_CODE_RE.replace_all(markdown, "");
    let text = INLINE_CODE_RE.replace_all(&text, "");
    let text = HEADING_RE.replace_all(&text, "");
    let text = BOLD_STAR_RE.replace_all(&text, "$1");
    let text = BOLD_UNDERSCORE_RE.replace_all(&text, "$1");
    let text = ITALIC_STAR_RE.replace_all(&text, "$1");
    let text = ITALIC_UNDERSCORE_RE.replace_all(&text, "$1");
    let text = IMAGE_RE.replace_all(&text, "");
    let text = LINK_RE.replace_all(&text, "$1");
    let text = strip_tags(&text).replace("[TOC]", "");
    let text = BLANK_LINES_RE.replace_all(&text, "\n\n");
    text.trim().to_owned()
}

/// Build a record for every document reachable from the navigation.
///
/// File nodes whose source no longer resolves are skipped.
pub fn collect_records(service: &DocumentationService) -> Result<Vec<IndexRecord>, SiteError> {
    let navigation = service.navigation()?;
    let mut records = Vec::new();

    for (node, category) in navigation.files() {
        if let Some(document) = service.document(node.slug())? {
            records.push(IndexRecord::from_document(&document, category));
        } else {
            tracing::warn!(slug = node.slug(), "listed document no longer resolves");
        }
    }

    Ok(records)
}
