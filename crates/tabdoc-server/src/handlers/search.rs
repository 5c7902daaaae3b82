//! Search API endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use tabdoc_search::SearchResult;

use crate::error::ServerError;
use crate::state::AppState;

/// Query string for GET /api/search.
#[derive(Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Handle GET /api/search?q=...
///
/// Short queries answer `[]`. Engine failures are answered by local search,
/// so the only error left is a failed blocking task.
pub(crate) async fn search(
    Query(params): Query<SearchParams>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SearchResult>>, ServerError> {
    let search = Arc::clone(&state.search);
    let results = tokio::task::spawn_blocking(move || search.search(&params.q)).await?;
    Ok(Json(results))
}
