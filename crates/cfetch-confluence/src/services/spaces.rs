//! Space operations.

use tracing::info;

use crate::client::ConfluenceClient;
use crate::error::ConfluenceError;
use crate::models::ConfluenceSpace;
use crate::pagination::results;
use crate::types::SpaceRaw;

/// Space listing.
pub struct Spaces<'a> {
    client: &'a ConfluenceClient,
}

impl<'a> Spaces<'a> {
    pub(crate) fn new(client: &'a ConfluenceClient) -> Self {
        Self { client }
    }

    /// List one window of spaces visible to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or any space is malformed.
    pub fn spaces(&self, start: usize, limit: usize) -> Result<Vec<ConfluenceSpace>, ConfluenceError> {
        info!("Listing spaces (start={}, limit={})", start, limit);
        let url = format!("{}/space", self.client.rest_api_url());
        let response = self.client.get(
            &url,
            &[("start", start.to_string()), ("limit", limit.to_string())],
        )?;

        let web_url = self.client.web_url();
        results(response)?
            .into_iter()
            .map(|value| {
                let raw: SpaceRaw = serde_json::from_value(value)?;
                ConfluenceSpace::from_raw(raw, &web_url)
            })
            .collect()
    }
}
