//! Pages API endpoint.
//!
//! Returns a rendered document as JSON with metadata and table of contents.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::Serialize;
use tabdoc_renderer::TocEntry;
use tabdoc_site::INDEX_DOCUMENT;

use crate::error::ServerError;
use crate::state::AppState;

/// Response for GET /api/pages/{slug}.
#[derive(Serialize)]
struct PageResponse {
    meta: PageMeta,
    toc: Vec<TocResponse>,
    /// Rendered HTML content.
    content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageMeta {
    title: String,
    slug: String,
    /// Source modification time (RFC 3339).
    last_modified: String,
    /// Source modification time (seconds since the Unix epoch).
    updated_at: i64,
}

/// Table of contents entry for serialization.
#[derive(Serialize)]
struct TocResponse {
    /// Heading level (2-4).
    level: u8,
    title: String,
    /// Anchor id of the heading.
    id: String,
}

impl From<TocEntry> for TocResponse {
    fn from(entry: TocEntry) -> Self {
        Self {
            level: entry.level,
            title: entry.title,
            id: entry.anchor_slug,
        }
    }
}

/// Handle GET /api/pages/ (root document).
pub(crate) async fn get_root_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_page_impl(INDEX_DOCUMENT, &state, &headers)
}

/// Handle GET /api/pages/{slug}.
pub(crate) async fn get_page(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let slug = slug.trim_end_matches('/');
    let slug = if slug.is_empty() { INDEX_DOCUMENT } else { slug };
    get_page_impl(slug, &state, &headers)
}

fn get_page_impl(
    slug: &str,
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let document = state
        .docs
        .document(slug)?
        .ok_or_else(|| ServerError::PageNotFound(slug.to_owned()))?;

    let etag = compute_etag(&state.version, &document.html);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let last_modified: DateTime<Utc> =
        DateTime::from_timestamp(document.updated_at, 0).unwrap_or_default();

    let response = PageResponse {
        meta: PageMeta {
            title: document.title,
            slug: document.slug,
            last_modified: last_modified.to_rfc3339(),
            updated_at: document.updated_at,
        },
        toc: document.toc.into_iter().map(TocResponse::from).collect(),
        content: document.html,
    };

    Ok((
        [
            (header::ETAG, etag),
            (
                header::LAST_MODIFIED,
                last_modified
                    .format("%a, %d %b %Y %H:%M:%S GMT")
                    .to_string(),
            ),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        Json(response),
    )
        .into_response())
}

/// Compute `ETag` from version and content.
///
/// MD5 truncated to 16 hex chars, quoted.
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
