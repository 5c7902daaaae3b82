//! `tabdoc cache` commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use tabdoc_config::{CacheBackend, Config};

use crate::commands::documentation_service;
use crate::error::CliError;
use crate::output::Output;

/// Cache maintenance commands.
#[derive(Subcommand)]
pub(crate) enum CacheCommand {
    /// Drop cached navigation and documents.
    Clear(ClearArgs),
}

impl CacheCommand {
    /// Execute the cache command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        match self {
            Self::Clear(args) => args.execute(version),
        }
    }
}

/// Arguments for the cache clear command.
#[derive(Args)]
pub(crate) struct ClearArgs {
    /// Path to configuration file (default: auto-discover tabdoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ClearArgs {
    fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        match config.cache.backend {
            CacheBackend::File => {}
            CacheBackend::Memory => {
                output.warning("Memory cache lives in the server process; nothing to clear here");
                return Ok(());
            }
            CacheBackend::None => {
                output.warning("Cache is disabled; nothing to clear");
                return Ok(());
            }
        }

        let removed = documentation_service(&config, version)?.invalidate_all()?;

        output.success(&format!("Cleared {removed} cache entries"));
        Ok(())
    }
}
