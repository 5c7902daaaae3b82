//! `tabdoc flush` command implementation.

use std::path::PathBuf;

use clap::Args;
use tabdoc_config::Config;

use crate::commands::search_client;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the flush command.
#[derive(Args)]
pub(crate) struct FlushArgs {
    /// Path to configuration file (default: auto-discover tabdoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl FlushArgs {
    /// Execute the flush command.
    ///
    /// # Errors
    ///
    /// Returns an error if `[search]` is missing or the engine rejects the request.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        let search = config.require_search()?;

        let task = search_client(search).clear()?;

        output.success(&format!(
            "Index '{}' cleared (task {})",
            search.index, task.task_uid
        ));
        Ok(())
    }
}
