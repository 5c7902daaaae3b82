//! `tabdoc index` command implementation.

use std::path::PathBuf;

use clap::Args;
use tabdoc_config::Config;
use tabdoc_search::collect_records;

use crate::commands::{documentation_service, search_client};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the index command.
#[derive(Args)]
pub(crate) struct IndexArgs {
    /// Path to configuration file (default: auto-discover tabdoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Delete every indexed document before uploading.
    #[arg(long)]
    fresh: bool,
}

impl IndexArgs {
    /// Execute the index command.
    ///
    /// Uploads one record per document, then drops the documentation cache
    /// so the server picks up the same content the index now holds.
    ///
    /// # Errors
    ///
    /// Returns an error if `[search]` is missing, no documents are found or
    /// the search engine rejects a request.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        let search = config.require_search()?;
        let client = search_client(search);
        let docs = documentation_service(&config, version)?;

        output.info("Loading documents...");
        let records = collect_records(&docs)?;
        if records.is_empty() {
            return Err(CliError::Validation(format!(
                "No documents found in {}",
                config.docs_resolved.source_dir.display()
            )));
        }
        output.info(&format!("Found {} documents", records.len()));

        if self.fresh {
            output.warning(&format!("Clearing index '{}'...", search.index));
            client.clear()?;
        }

        let task = client.add_documents(&records)?;
        output.info(&format!("Upload enqueued as task {}", task.task_uid));

        let removed = docs.invalidate_all()?;
        tracing::info!(removed, "documentation cache invalidated");

        client.sync_settings()?;

        output.success(&format!(
            "Indexed {} documents into '{}'",
            records.len(),
            search.index
        ));
        Ok(())
    }
}
