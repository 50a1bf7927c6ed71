//! CQL search.

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;

use crate::client::ConfluenceClient;
use crate::error::ConfluenceError;
use crate::models::SearchResult;
use crate::pagination::results;
use crate::types::SearchItem;

/// Whole queries made of `field operator value` clauses joined by `AND`/`OR`,
/// with an optional trailing `ORDER BY`.
static CQL_QUERY: LazyLock<Regex> = LazyLock::new(|| {
    let value = r#"(?:"(?:[^"\\]|\\.)*"|'[^']*'|\([^()]*\)|[\w.:-]+(?:\([^()]*\))?)"#;
    let operator = r"(?:\s*(?:!=|!~|>=|<=|=|~|>|<)\s*|\s+(?i:not\s+in|in|is\s+not|is)\s+)";
    let clause = format!(r"\(*\s*[A-Za-z][\w.\[\]]*{operator}{value}\s*\)*");
    let pattern = format!(
        r"^(?i:not\s+)?{clause}(?:\s+(?i:and|or)\s+(?i:not\s+)?{clause})*(?:\s+(?i:order\s+by)\s+.+)?$"
    );
    Regex::new(&pattern).expect("invalid CQL regex")
});

/// Confluence search.
pub struct Search<'a> {
    client: &'a ConfluenceClient,
}

impl<'a> Search<'a> {
    pub(crate) fn new(client: &'a ConfluenceClient) -> Self {
        Self { client }
    }

    /// Search with CQL or plain text.
    ///
    /// Plain text is wrapped as `siteSearch ~ "..."`; see [`to_cql`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::InvalidInput`] for an empty query, or an
    /// error if the request fails.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, ConfluenceError> {
        let cql = to_cql(query)
            .ok_or_else(|| ConfluenceError::InvalidInput("search query cannot be empty".to_owned()))?;

        info!("Searching: {}", cql);
        let url = format!("{}/search", self.client.rest_api_url());
        let response = self.client.get(
            &url,
            &[
                ("cql", cql),
                ("limit", limit.to_string()),
                ("expand", "content.space".to_owned()),
            ],
        )?;

        let web_url = self.client.web_url();
        results(response)?
            .into_iter()
            .map(|value| SearchResult::from_raw(serde_json::from_value::<SearchItem>(value)?, &web_url))
            .collect()
    }
}

/// Turn a user query into CQL.
///
/// Queries shaped like CQL clauses (`space = DEV AND type = page`) pass
/// through unchanged; anything else becomes a quoted `siteSearch` term.
/// Returns `None` for blank input.
#[must_use]
pub fn to_cql(query: &str) -> Option<String> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    if CQL_QUERY.is_match(query) {
        return Some(query.to_owned());
    }
    let escaped = query.replace('\\', "\\\\").replace('"', "\\\"");
    Some(format!("siteSearch ~ \"{escaped}\""))
}
