//! HTTP API for tabdoc documentation.
//!
//! Serves three JSON endpoints over axum:
//! - `GET /api/navigation`: the navigation tree
//! - `GET /api/pages/{*slug}`: a rendered document with its table of contents
//! - `GET /api/search?q=...`: search results with highlighted excerpts
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tabdoc_cache::NullCache;
//! use tabdoc_search::{LocalSearch, SearchService};
//! use tabdoc_server::{ServerConfig, run_server};
//! use tabdoc_site::DocumentationService;
//! use tabdoc_storage::FsStorage;
//!
//! #[tokio::main]
//! async fn main() {
//!     let storage = Arc::new(FsStorage::new("docs".into()));
//!     let docs = Arc::new(DocumentationService::new(storage, &NullCache));
//!     let search = Arc::new(SearchService::new(None, LocalSearch::new(Arc::clone(&docs))));
//!
//!     run_server(ServerConfig::default(), docs, search).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use tabdoc_search::SearchService;
use tabdoc_site::DocumentationService;

pub use error::ServerError;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Application version (part of every `ETag`).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener cannot bind.
pub async fn run_server(
    config: ServerConfig,
    docs: Arc<DocumentationService>,
    search: Arc<SearchService>,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState {
        docs,
        search,
        version: config.version,
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from a loaded `tabdoc.toml`.
#[must_use]
pub fn server_config_from_config(config: &tabdoc_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        version,
    }
}
