//! Meilisearch REST client.
//!
//! Blocking client for the handful of endpoints the documentation index
//! needs: search, document upload, clearing and index settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder};

use crate::backend::{SearchBackend, SearchHit};
use crate::error::SearchError;
use crate::record::IndexRecord;

/// Default HTTP timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const HIGHLIGHT_PRE_TAG: &str = "<mark>";
const HIGHLIGHT_POST_TAG: &str = "</mark>";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    q: &'a str,
    limit: usize,
    attributes_to_highlight: [&'static str; 2],
    highlight_pre_tag: &'static str,
    highlight_post_tag: &'static str,
}

impl<'a> SearchRequest<'a> {
    fn new(query: &'a str, limit: usize) -> Self {
        Self {
            q: query,
            limit,
            attributes_to_highlight: ["title", "content"],
            highlight_pre_tag: HIGHLIGHT_PRE_TAG,
            highlight_post_tag: HIGHLIGHT_POST_TAG,
        }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: Vec<SearchHit>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexSettings {
    searchable_attributes: [&'static str; 3],
    filterable_attributes: [&'static str; 1],
}

const INDEX_SETTINGS: IndexSettings = IndexSettings {
    searchable_attributes: ["title", "headings", "content"],
    filterable_attributes: ["category"],
};

/// Asynchronous task accepted by Meilisearch.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueuedTask {
    /// Task identifier, for looking the task up later.
    pub task_uid: u64,
}

/// Meilisearch client bound to one index.
pub struct MeilisearchClient {
    agent: Agent,
    base_url: String,
    index: String,
    api_key: Option<String>,
}

impl MeilisearchClient {
    /// Create a client.
    ///
    /// # Arguments
    /// * `base_url` - Meilisearch server URL (e.g. `http://127.0.0.1:7700`)
    /// * `index` - Index name (e.g. `documentation`)
    /// * `api_key` - Sent as a bearer token when present
    /// * `timeout` - Global timeout for each request
    #[must_use]
    pub fn new(base_url: &str, index: &str, api_key: Option<&str>, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            index: index.to_owned(),
            api_key: api_key.map(str::to_owned),
        }
    }

    /// URL of an endpoint under the index.
    fn index_url(&self, path: &str) -> String {
        format!("{}/indexes/{}/{path}", self.base_url, self.index)
    }

    fn authorized<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        let request = request.header("Accept", "application/json");
        match &self.api_key {
            Some(key) => request.header("Authorization", &format!("Bearer {key}")),
            None => request,
        }
    }

    /// Upload records, replacing documents with the same `id`.
    pub fn add_documents(&self, records: &[IndexRecord]) -> Result<EnqueuedTask, SearchError> {
        let url = self.index_url("documents?primaryKey=id");
        tracing::info!(count = records.len(), index = %self.index, "uploading documents");

        let response = self.authorized(self.agent.post(&url)).send_json(records)?;
        Ok(checked_body(response)?.read_json()?)
    }

    /// Delete every document in the index.
    pub fn clear(&self) -> Result<EnqueuedTask, SearchError> {
        let url = self.index_url("documents");
        tracing::info!(index = %self.index, "clearing index");

        let response = self.authorized(self.agent.delete(&url)).call()?;
        Ok(checked_body(response)?.read_json()?)
    }

    /// Apply searchable and filterable attributes to the index.
    pub fn sync_settings(&self) -> Result<EnqueuedTask, SearchError> {
        let url = self.index_url("settings");
        tracing::info!(index = %self.index, "syncing index settings");

        let response = self
            .authorized(self.agent.patch(&url))
            .send_json(INDEX_SETTINGS)?;
        Ok(checked_body(response)?.read_json()?)
    }
}

impl SearchBackend for MeilisearchClient {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        let url = self.index_url("search");
        tracing::debug!(query, limit, "querying search index");

        let response = self
            .authorized(self.agent.post(&url))
            .send_json(SearchRequest::new(query, limit))?;
        let response: SearchResponse = checked_body(response)?.read_json()?;
        Ok(response.hits)
    }
}

/// Turn a non-success status into an error carrying the response body.
fn checked_body(response: Response<Body>) -> Result<Body, SearchError> {
    let status = response.status().as_u16();
    let mut body = response.into_body();

    if !(200..300).contains(&status) {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(SearchError::HttpResponse {
            status,
            body: error_body,
        });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_index_url_trims_trailing_slash() {
        let client = MeilisearchClient::new(
            "http://search:7700/",
            "documentation",
            None,
            DEFAULT_TIMEOUT,
        );
        assert_eq!(
            client.index_url("search"),
            "http://search:7700/indexes/documentation/search"
        );
    }

    #[test]
    fn test_search_request_body() {
        let body = serde_json::to_value(SearchRequest::new("butt", 20)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "q": "butt",
                "limit": 20,
                "attributesToHighlight": ["title", "content"],
                "highlightPreTag": "<mark>",
                "highlightPostTag": "</mark>",
            })
        );
    }

    #[test]
    fn test_settings_body() {
        let body = serde_json::to_value(INDEX_SETTINGS).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "searchableAttributes": ["title", "headings", "content"],
                "filterableAttributes": ["category"],
            })
        );
    }

    #[test]
    fn test_search_response_parsing() {
        let json = r#"{
            "hits": [
                {
                    "id": "5d41402abc4b2a76b9719d911017c592",
                    "slug": "forms/input",
                    "title": "Input",
                    "content": "Text input fields",
                    "category": "Forms",
                    "updated_at": 1700000000,
                    "_formatted": {
                        "title": "<mark>Input</mark>",
                        "content": "Text <mark>input</mark> fields",
                        "updated_at": "1700000000"
                    }
                },
                { "slug": "button", "title": "Button" }
            ],
            "query": "input",
            "processingTimeMs": 1
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.hits.len(), 2);
        let formatted = response.hits[0].formatted.as_ref().unwrap();
        assert_eq!(formatted.title.as_deref(), Some("<mark>Input</mark>"));
        assert_eq!(response.hits[0].category.as_deref(), Some("Forms"));
        assert_eq!(response.hits[1].content, "");
        assert_eq!(response.hits[1].formatted, None);
    }

    #[test]
    fn test_enqueued_task_parsing() {
        let task: EnqueuedTask = serde_json::from_str(
            r#"{"taskUid": 7, "indexUid": "documentation", "status": "enqueued", "type": "documentAdditionOrUpdate"}"#,
        )
        .unwrap();
        assert_eq!(task.task_uid, 7);
    }

    #[test]
    fn test_unreachable_server_is_error() {
        let client = MeilisearchClient::new(
            "http://127.0.0.1:9",
            "documentation",
            Some("key"),
            Duration::from_secs(2),
        );
        assert!(client.search("button", 20).is_err());
    }
}
