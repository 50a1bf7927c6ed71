//! Space, label, user and search commands.

use cfetch_confluence::ConfluenceFetcher;
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the spaces command.
#[derive(Args)]
pub(crate) struct SpacesArgs {
    /// Index of the first space to return.
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Maximum number of spaces to return.
    #[arg(long, default_value_t = 25)]
    limit: usize,
}

impl SpacesArgs {
    pub(crate) fn execute(self, fetcher: &ConfluenceFetcher, output: &Output) -> Result<(), CliError> {
        output.json(&fetcher.spaces().spaces(self.start, self.limit)?)
    }
}

/// Arguments for the labels command.
#[derive(Args)]
pub(crate) struct LabelsArgs {
    /// Confluence page ID.
    page_id: String,
}

impl LabelsArgs {
    pub(crate) fn execute(self, fetcher: &ConfluenceFetcher, output: &Output) -> Result<(), CliError> {
        output.json(&fetcher.labels().page_labels(&self.page_id)?)
    }
}

/// Arguments for the add-label command.
#[derive(Args)]
pub(crate) struct AddLabelArgs {
    /// Confluence page ID.
    page_id: String,

    /// Label name (no whitespace).
    name: String,
}

impl AddLabelArgs {
    pub(crate) fn execute(self, fetcher: &ConfluenceFetcher, output: &Output) -> Result<(), CliError> {
        output.json(&fetcher.labels().add_page_label(&self.page_id, &self.name)?)
    }
}

/// Arguments for the search command.
#[derive(Args)]
pub(crate) struct SearchArgs {
    /// CQL query, or plain text to match anywhere.
    query: String,

    /// Maximum number of results.
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

impl SearchArgs {
    pub(crate) fn execute(self, fetcher: &ConfluenceFetcher, output: &Output) -> Result<(), CliError> {
        output.json(&fetcher.search().search(&self.query, self.limit)?)
    }
}

/// Arguments for the user command.
#[derive(Args)]
pub(crate) struct UserArgs {
    /// Account ID to look up (default: the authenticated user).
    account_id: Option<String>,
}

impl UserArgs {
    pub(crate) fn execute(self, fetcher: &ConfluenceFetcher, output: &Output) -> Result<(), CliError> {
        let users = fetcher.users();
        let user = match &self.account_id {
            Some(account_id) => users.user_by_account_id(account_id)?,
            None => users.current_user()?,
        };
        output.json(&user)
    }
}
