//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/navigation", get(handlers::navigation::get_navigation))
        .route("/api/pages/", get(handlers::pages::get_root_page))
        .route("/api/pages/{*slug}", get(handlers::pages::get_page))
        .route("/api/search", get(handlers::search::search))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer())
                .layer(security::referrer_policy_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tabdoc_cache::NullCache;
    use tabdoc_search::{LocalSearch, SearchService};
    use tabdoc_site::DocumentationService;
    use tabdoc_storage::MockStorage;
    use tower::ServiceExt;

    use super::*;

    fn router(storage: MockStorage) -> Router {
        let docs = Arc::new(DocumentationService::new(Arc::new(storage), &NullCache));
        let search = Arc::new(SearchService::new(
            None,
            LocalSearch::new(Arc::clone(&docs)),
        ));
        create_router(Arc::new(AppState {
            docs,
            search,
            version: "1.0.0".to_owned(),
        }))
    }

    fn storage() -> MockStorage {
        MockStorage::new()
            .with_file("index.md", "# Welcome")
            .with_file("button.md", "# Button\n\nA clickable button.\n\n## Sizes")
            .with_file("forms/input.md", "# Input")
            .with_mtime("button.md", 1_700_000_000)
    }

    async fn get(router: Router, uri: &str) -> Response {
        router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_navigation_endpoint() {
        let response = get(router(storage()), "/api/navigation").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        let slugs: Vec<&str> = json["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["slug"].as_str().unwrap())
            .collect();
        assert_eq!(slugs, vec!["forms", "button"]);
    }

    #[tokio::test]
    async fn test_page_endpoint() {
        let response = get(router(storage()), "/api/pages/button").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "private, max-age=60"
        );
        assert_eq!(
            response.headers()[header::LAST_MODIFIED],
            "Tue, 14 Nov 2023 22:13:20 GMT"
        );
        assert!(response.headers().contains_key(header::ETAG));

        let json = json_body(response).await;
        assert_eq!(json["meta"]["title"], "Button");
        assert_eq!(json["meta"]["slug"], "button");
        assert_eq!(json["meta"]["updatedAt"], 1_700_000_000);
        assert_eq!(json["meta"]["lastModified"], "2023-11-14T22:13:20+00:00");
        assert_eq!(
            json["toc"],
            json!([{"level": 2, "title": "Sizes", "id": "sizes"}])
        );
        assert!(json["content"].as_str().unwrap().contains("clickable"));
    }

    #[tokio::test]
    async fn test_page_trailing_slash() {
        let response = get(router(storage()), "/api/pages/forms/input/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["meta"]["slug"], "forms/input");
    }

    #[tokio::test]
    async fn test_root_page() {
        let response = get(router(storage()), "/api/pages/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["meta"]["title"], "Welcome");
    }

    #[tokio::test]
    async fn test_root_page_missing() {
        let storage = MockStorage::new().with_file("a.md", "# A");
        let response = get(router(storage), "/api/pages/").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_page_not_found() {
        let response = get(router(storage()), "/api/pages/missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["slug"], "missing");
    }

    #[tokio::test]
    async fn test_if_none_match_returns_not_modified() {
        let router = router(storage());
        let response = get(router.clone(), "/api/pages/button").await;
        let etag = response.headers()[header::ETAG].clone();

        let response = router
            .oneshot(
                Request::get("/api/pages/button")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_search_endpoint_uses_local_fallback() {
        let response = get(router(storage()), "/api/search?q=clickable").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["slug"], "button");
        assert_eq!(json[0]["category"], "General");
    }

    #[tokio::test]
    async fn test_search_short_query() {
        let response = get(router(storage()), "/api/search?q=b").await;
        assert_eq!(json_body(response).await, json!([]));

        let response = get(router(storage()), "/api/search").await;
        assert_eq!(json_body(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_security_headers() {
        let response = get(router(storage()), "/api/navigation").await;
        let headers = response.headers();

        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["referrer-policy"], "same-origin");
        assert!(headers.contains_key("content-security-policy"));
    }
}
