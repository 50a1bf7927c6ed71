//! Label operations.

use serde_json::json;
use tracing::info;

use crate::client::ConfluenceClient;
use crate::error::ConfluenceError;
use crate::models::ConfluenceLabel;
use crate::pagination::results;
use crate::types::Label;
use crate::url::content_id;

/// Page labels.
pub struct Labels<'a> {
    client: &'a ConfluenceClient,
}

impl<'a> Labels<'a> {
    pub(crate) fn new(client: &'a ConfluenceClient) -> Self {
        Self { client }
    }

    /// Labels attached to a page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or any label is malformed.
    pub fn page_labels(&self, page_id: &str) -> Result<Vec<ConfluenceLabel>, ConfluenceError> {
        info!("Getting labels for page {}", page_id);
        let response = self.client.get(&self.url(page_id)?, &[])?;
        convert(response)
    }

    /// Attach a global label to a page and return the page's labels.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::InvalidInput`] if the name is empty or
    /// contains whitespace, or an error if the server rejects it.
    pub fn add_page_label(
        &self,
        page_id: &str,
        name: &str,
    ) -> Result<Vec<ConfluenceLabel>, ConfluenceError> {
        let name = name.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(ConfluenceError::InvalidInput(format!(
                "invalid label name '{name}'"
            )));
        }

        info!("Adding label '{}' to page {}", name, page_id);
        let body = json!([{"prefix": "global", "name": name}]);
        let response = self.client.post_as(&self.url(page_id)?, body)?;
        convert(response)
    }

    fn url(&self, page_id: &str) -> Result<String, ConfluenceError> {
        let page_id = content_id(page_id)?;
        Ok(format!("{}/content/{page_id}/label", self.client.rest_api_url()))
    }
}

fn convert(response: serde_json::Value) -> Result<Vec<ConfluenceLabel>, ConfluenceError> {
    results(response)?
        .into_iter()
        .map(|value| ConfluenceLabel::from_raw(serde_json::from_value::<Label>(value)?))
        .collect()
}
