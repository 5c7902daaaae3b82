/// Error from the search index collaborator.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// HTTP request failed (network error, timeout, malformed body).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// Server answered with a non-success status.
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },
}
