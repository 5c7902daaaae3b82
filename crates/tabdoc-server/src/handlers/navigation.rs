//! Navigation API endpoint.
//!
//! Returns the navigation tree for the documentation site.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use tabdoc_site::Navigation;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /api/navigation.
///
/// Serializes as `{"items": [...]}`.
pub(crate) async fn get_navigation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Navigation>, ServerError> {
    let navigation = state.docs.navigation()?;
    Ok(Json(navigation))
}
