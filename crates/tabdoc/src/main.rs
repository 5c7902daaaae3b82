//! tabdoc CLI - component library documentation.
//!
//! Provides commands for:
//! - `serve`: Start the documentation API server
//! - `index`: Push every document to the search engine
//! - `flush`: Empty the search index
//! - `cache clear`: Drop cached navigation and documents

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CacheCommand, FlushArgs, IndexArgs, ServeArgs};
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// tabdoc - component library documentation.
#[derive(Parser)]
#[command(name = "tabdoc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the documentation server.
    Serve(ServeArgs),
    /// Upload all documents to the search index.
    Index(IndexArgs),
    /// Delete all documents from the search index.
    Flush(FlushArgs),
    /// Cache maintenance commands.
    #[command(subcommand)]
    Cache(CacheCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Serve(args) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(args.execute(VERSION))
        }
        Commands::Index(args) => args.execute(VERSION),
        Commands::Flush(args) => args.execute(),
        Commands::Cache(cmd) => cmd.execute(VERSION),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
