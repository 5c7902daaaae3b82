//! CLI error types.

use tabdoc_config::ConfigError;
use tabdoc_search::SearchError;
use tabdoc_site::SiteError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Site(#[from] SiteError),

    #[error("{0}")]
    Search(#[from] SearchError),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Validation(String),
}
