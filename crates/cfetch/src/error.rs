//! CLI error types.

use cfetch_config::ConfigError;
use cfetch_confluence::ConfluenceError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Confluence(#[from] ConfluenceError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    /// Paginated fetch stopped early and partial output was not allowed.
    #[error("{0} (use --allow-partial to print what was fetched)")]
    Partial(String),
}
