//! `tabdoc serve` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tabdoc_config::{CacheBackend, CliSettings, Config};
use tabdoc_search::{LocalSearch, SearchBackend, SearchService};
use tabdoc_server::{run_server, server_config_from_config};

use crate::commands::{documentation_service, search_client};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover tabdoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (render warnings and request logs).
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable caching.
    #[arg(long)]
    no_cache: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            source_dir: self.source_dir,
            cache_enabled: self.no_cache.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        config.validate()?;

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Source directory: {}",
            config.docs_resolved.source_dir.display()
        ));

        match config.cache.backend {
            CacheBackend::File => output.info(&format!(
                "Cache directory: {}",
                config.docs_resolved.cache_dir().display()
            )),
            CacheBackend::Memory => output.info("Cache: memory"),
            CacheBackend::None => output.info("Cache: disabled"),
        }

        let backend: Option<Box<dyn SearchBackend>> =
            if let Some(search) = &config.search_resolved {
                output.info(&format!("Search engine: {} ({})", search.url, search.index));
                Some(Box::new(search_client(search)))
            } else {
                output.info("Search engine: none (local search only)");
                None
            };

        let docs = Arc::new(documentation_service(&config, version)?);
        let search = Arc::new(SearchService::new(
            backend,
            LocalSearch::new(Arc::clone(&docs)),
        ));

        let server_config = server_config_from_config(&config, version.to_owned());
        run_server(server_config, docs, search)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
