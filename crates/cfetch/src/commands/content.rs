//! Comment and page commands.

use cfetch_confluence::ConfluenceFetcher;
use cfetch_confluence::services::PageDraft;
use clap::Args;

use super::{body_format, print_all};
use crate::error::CliError;
use crate::output::Output;

/// A page and the body format to render.
#[derive(Args)]
pub(crate) struct PageArgs {
    /// Confluence page ID.
    pub(crate) page_id: String,

    /// Keep bodies in storage format instead of converting to Markdown.
    #[arg(long)]
    pub(crate) raw: bool,
}

/// Arguments for commands that follow pagination.
#[derive(Args)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    pub(crate) page: PageArgs,

    /// Print what was fetched even if a later request fails.
    #[arg(long)]
    pub(crate) allow_partial: bool,
}

impl ListArgs {
    pub(crate) fn inline_comments(
        self,
        fetcher: &ConfluenceFetcher,
        output: &Output,
    ) -> Result<(), CliError> {
        let result = fetcher
            .comments()
            .inline_comments(&self.page.page_id, body_format(self.page.raw));
        print_all(result, self.allow_partial, output)
    }

    pub(crate) fn page_comments(
        self,
        fetcher: &ConfluenceFetcher,
        output: &Output,
    ) -> Result<(), CliError> {
        let result = fetcher
            .comments()
            .page_comments(&self.page.page_id, body_format(self.page.raw));
        print_all(result, self.allow_partial, output)
    }

    pub(crate) fn children(
        self,
        fetcher: &ConfluenceFetcher,
        output: &Output,
    ) -> Result<(), CliError> {
        let result = fetcher
            .pages()
            .children(&self.page.page_id, body_format(self.page.raw));
        print_all(result, self.allow_partial, output)
    }
}

/// Arguments for the add-comment command.
#[derive(Args)]
pub(crate) struct AddCommentArgs {
    #[command(flatten)]
    page: PageArgs,

    /// Comment body in storage format (e.g. `<p>Looks good</p>`).
    body: String,
}

impl AddCommentArgs {
    pub(crate) fn execute(self, fetcher: &ConfluenceFetcher, output: &Output) -> Result<(), CliError> {
        let comment = fetcher.comments().add_comment(
            &self.page.page_id,
            &self.body,
            body_format(self.page.raw),
        )?;
        output.json(&comment)
    }
}

/// Arguments for the page command.
#[derive(Args)]
pub(crate) struct PageLookupArgs {
    /// Confluence page ID.
    #[arg(required_unless_present = "title", conflicts_with_all = ["space", "title"])]
    page_id: Option<String>,

    /// Space key, used with --title.
    #[arg(long, requires = "title")]
    space: Option<String>,

    /// Exact page title, used with --space.
    #[arg(long, requires = "space")]
    title: Option<String>,

    /// Keep the body in storage format instead of converting to Markdown.
    #[arg(long)]
    raw: bool,
}

impl PageLookupArgs {
    pub(crate) fn execute(self, fetcher: &ConfluenceFetcher, output: &Output) -> Result<(), CliError> {
        let format = body_format(self.raw);
        let pages = fetcher.pages();
        let page = match (&self.page_id, &self.space, &self.title) {
            (Some(page_id), _, _) => pages.page(page_id, format)?,
            (None, Some(space), Some(title)) => pages.page_by_title(space, title, format)?,
            _ => {
                return Err(CliError::Validation(
                    "page id or --space and --title required".to_owned(),
                ));
            }
        };
        output.json(&page)
    }
}

/// Arguments for the space-pages command.
#[derive(Args)]
pub(crate) struct SpacePagesArgs {
    /// Space key.
    space_key: String,

    /// Index of the first page to return.
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Maximum number of pages to return.
    #[arg(long, default_value_t = 25)]
    limit: usize,

    /// Keep bodies in storage format instead of converting to Markdown.
    #[arg(long)]
    raw: bool,
}

impl SpacePagesArgs {
    pub(crate) fn execute(self, fetcher: &ConfluenceFetcher, output: &Output) -> Result<(), CliError> {
        let pages = fetcher.pages().space_pages(
            &self.space_key,
            self.start,
            self.limit,
            body_format(self.raw),
        )?;
        output.json(&pages)
    }
}

/// Arguments for the create-page command.
#[derive(Args)]
pub(crate) struct CreatePageArgs {
    /// Space key.
    space_key: String,

    /// Page title.
    title: String,

    /// Page body in storage format.
    body: String,

    /// Parent page ID.
    #[arg(long)]
    parent: Option<String>,

    /// Print the body in storage format instead of Markdown.
    #[arg(long)]
    raw: bool,
}

impl CreatePageArgs {
    pub(crate) fn execute(self, fetcher: &ConfluenceFetcher, output: &Output) -> Result<(), CliError> {
        let draft = PageDraft {
            space_key: &self.space_key,
            title: &self.title,
            body: &self.body,
            parent_id: self.parent.as_deref(),
        };
        let page = fetcher.pages().create_page(&draft, body_format(self.raw))?;
        output.json(&page)
    }
}
