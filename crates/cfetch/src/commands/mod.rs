//! CLI command implementations.

mod content;
mod directory;

use std::path::PathBuf;

use cfetch_config::{CliSettings, Config};
use cfetch_confluence::{BodyFormat, ConfluenceFetcher, PartialFetch};
use clap::{Args, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::error::CliError;
use crate::output::Output;

pub(crate) use content::{
    AddCommentArgs, CreatePageArgs, ListArgs, PageLookupArgs, SpacePagesArgs,
};
pub(crate) use directory::{AddLabelArgs, LabelsArgs, SearchArgs, SpacesArgs, UserArgs};

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Path to configuration file (default: auto-discover cfetch.toml).
    #[arg(short, long, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Confluence site URL (overrides config and CONFLUENCE_URL).
    #[arg(long, global = true)]
    pub(crate) base_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true)]
    pub(crate) timeout: Option<u64>,

    /// Log requests to stderr.
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,
}

impl GlobalArgs {
    /// Load configuration and build a fetcher.
    fn fetcher(&self) -> Result<ConfluenceFetcher, CliError> {
        let cli_settings = CliSettings {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            info!("Loaded configuration from {}", path.display());
        }
        let confluence = config.require_confluence()?;
        Ok(ConfluenceFetcher::from_config(confluence)?)
    }
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// List inline comments on a page.
    InlineComments(ListArgs),
    /// List footer comments on a page.
    Comments(ListArgs),
    /// Add a footer comment (storage format) to a page.
    AddComment(AddCommentArgs),
    /// Show a page by ID, or by space and title.
    Page(PageLookupArgs),
    /// List the child pages of a page.
    Children(ListArgs),
    /// Create a page from a storage format body.
    CreatePage(CreatePageArgs),
    /// List pages in a space.
    SpacePages(SpacePagesArgs),
    /// List spaces.
    Spaces(SpacesArgs),
    /// List labels on a page.
    Labels(LabelsArgs),
    /// Add a label to a page.
    AddLabel(AddLabelArgs),
    /// Search with CQL or plain text.
    Search(SearchArgs),
    /// Show the current user, or a user by account ID.
    User(UserArgs),
}

impl Command {
    /// Execute the command.
    pub(crate) fn execute(self, global: &GlobalArgs, output: &Output) -> Result<(), CliError> {
        let fetcher = global.fetcher()?;
        match self {
            Self::InlineComments(args) => args.inline_comments(&fetcher, output),
            Self::Comments(args) => args.page_comments(&fetcher, output),
            Self::AddComment(args) => args.execute(&fetcher, output),
            Self::Page(args) => args.execute(&fetcher, output),
            Self::Children(args) => args.children(&fetcher, output),
            Self::CreatePage(args) => args.execute(&fetcher, output),
            Self::SpacePages(args) => args.execute(&fetcher, output),
            Self::Spaces(args) => args.execute(&fetcher, output),
            Self::Labels(args) => args.execute(&fetcher, output),
            Self::AddLabel(args) => args.execute(&fetcher, output),
            Self::Search(args) => args.execute(&fetcher, output),
            Self::User(args) => args.execute(&fetcher, output),
        }
    }
}

/// Body format from the `--raw` flag.
fn body_format(raw: bool) -> BodyFormat {
    if raw {
        BodyFormat::Storage
    } else {
        BodyFormat::Markdown
    }
}

/// Accept a complete fetch, or a partial one when the user allowed it.
fn collect<T>(
    result: Result<Vec<T>, PartialFetch<T>>,
    allow_partial: bool,
    output: &Output,
) -> Result<Vec<T>, CliError> {
    match result {
        Ok(items) => Ok(items),
        Err(partial) if allow_partial => {
            output.warning(&format!("Warning: {partial}; printing partial results"));
            Ok(partial.into_partial())
        }
        Err(partial) => Err(CliError::Partial(partial.to_string())),
    }
}

/// Print a collection fetch as JSON.
fn print_all<T: Serialize>(
    result: Result<Vec<T>, PartialFetch<T>>,
    allow_partial: bool,
    output: &Output,
) -> Result<(), CliError> {
    let items = collect(result, allow_partial, output)?;
    output.json(&items)
}
