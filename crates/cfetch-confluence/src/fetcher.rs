//! Facade handing out resource services over one client.

use cfetch_config::ConfluenceConfig;

use crate::client::ConfluenceClient;
use crate::error::ConfluenceError;
use crate::services::{Comments, Labels, Pages, Search, Spaces, Users};

/// Entry point for fetching from one Confluence site.
///
/// Owns the [`ConfluenceClient`] and lends it to short-lived services.
pub struct ConfluenceFetcher {
    client: ConfluenceClient,
}

impl ConfluenceFetcher {
    /// Wrap an existing client.
    #[must_use]
    pub fn new(client: ConfluenceClient) -> Self {
        Self { client }
    }

    /// Build an HTTP-backed fetcher from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::Config`] if the configuration is invalid.
    pub fn from_config(config: &ConfluenceConfig) -> Result<Self, ConfluenceError> {
        ConfluenceClient::from_config(config).map(Self::new)
    }

    /// Underlying client.
    #[must_use]
    pub fn client(&self) -> &ConfluenceClient {
        &self.client
    }

    /// Footer and inline comments.
    #[must_use]
    pub fn comments(&self) -> Comments<'_> {
        Comments::new(&self.client)
    }

    /// Pages.
    #[must_use]
    pub fn pages(&self) -> Pages<'_> {
        Pages::new(&self.client)
    }

    /// Spaces.
    #[must_use]
    pub fn spaces(&self) -> Spaces<'_> {
        Spaces::new(&self.client)
    }

    /// Labels.
    #[must_use]
    pub fn labels(&self) -> Labels<'_> {
        Labels::new(&self.client)
    }

    /// Users.
    #[must_use]
    pub fn users(&self) -> Users<'_> {
        Users::new(&self.client)
    }

    /// Search.
    #[must_use]
    pub fn search(&self) -> Search<'_> {
        Search::new(&self.client)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::client::MockTransport;
    use crate::client::test_support::cloud_client;
    use crate::preprocess::BodyFormat;

    #[test]
    fn test_services_share_one_client() {
        let mock = Arc::new(
            MockTransport::new()
                .with_json(json!({"accountId": "acc-1"}))
                .with_json(json!({"space": {"key": "DEV"}}))
                .with_json(json!({"results": []})),
        );
        let fetcher = ConfluenceFetcher::new(cloud_client(&mock));

        let user = fetcher.users().current_user().unwrap();
        let comments = fetcher
            .comments()
            .inline_comments("1", BodyFormat::Markdown)
            .unwrap();

        assert_eq!(user.account_id, "acc-1");
        assert!(comments.is_empty());
        assert_eq!(mock.requests().len(), 3);
    }
}
