//! Confluence REST API client.
//!
//! [`ConfluenceClient`] is the shared session every service borrows: it
//! owns the transport, knows the site layout (Cloud vs Server/Data
//! Center), and carries the content preprocessor.

#[cfg(any(test, feature = "mock"))]
mod mock;
mod transport;

use std::sync::Arc;
use std::time::Duration;

use cfetch_config::ConfluenceConfig;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockTransport;
pub use transport::{ApiRequest, HttpTransport, Method, Transport};

use crate::error::ConfluenceError;
use crate::preprocess::{
    ContentPreprocessor, PageContext, ProcessedContent, StoragePreprocessor,
};
use crate::url;

/// Confluence REST API client.
pub struct ConfluenceClient {
    transport: Arc<dyn Transport>,
    preprocessor: Arc<dyn ContentPreprocessor>,
    base_url: String,
    cloud: bool,
}

impl ConfluenceClient {
    /// Create an HTTP client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::Config`] if the configuration is invalid.
    pub fn from_config(config: &ConfluenceConfig) -> Result<Self, ConfluenceError> {
        config.validate()?;
        let credentials = config.credentials()?;
        let transport = HttpTransport::new(
            &credentials,
            Duration::from_secs(config.timeout_secs),
        );
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client on top of an existing transport.
    ///
    /// Credentials in `config` are not checked; the transport owns
    /// authentication.
    pub fn with_transport(config: &ConfluenceConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            preprocessor: Arc::new(StoragePreprocessor::new()),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            cloud: config.is_cloud(),
        }
    }

    /// Replace the content preprocessor.
    #[must_use]
    pub fn with_preprocessor(mut self, preprocessor: impl ContentPreprocessor + 'static) -> Self {
        self.preprocessor = Arc::new(preprocessor);
        self
    }

    /// Site root URL without a context path.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether the site is Confluence Cloud.
    #[must_use]
    pub fn is_cloud(&self) -> bool {
        self.cloud
    }

    /// Web base URL: the site root plus `/wiki` on Cloud.
    #[must_use]
    pub fn web_url(&self) -> String {
        if self.cloud {
            format!("{}/wiki", self.base_url)
        } else {
            self.base_url.clone()
        }
    }

    /// REST API v1 base URL.
    pub(crate) fn rest_api_url(&self) -> String {
        format!("{}/rest/api", self.web_url())
    }

    /// REST API v2 base URL (Cloud only).
    pub(crate) fn v2_api_url(&self) -> String {
        format!("{}/wiki/api/v2", self.base_url)
    }

    /// Resolve a link returned by the server to an absolute URL.
    pub(crate) fn resolve_link(&self, link: &str) -> String {
        url::resolve(&self.web_url(), link)
    }

    /// Run the preprocessor over one storage body.
    pub(crate) fn process(&self, html: &str, context: &PageContext) -> ProcessedContent {
        self.preprocessor.process(html, context)
    }

    pub(crate) fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Value, ConfluenceError> {
        self.transport.execute(&ApiRequest::get(url, query))
    }

    pub(crate) fn get_as<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ConfluenceError> {
        Ok(serde_json::from_value(self.get(url, query)?)?)
    }

    pub(crate) fn post_as<T: DeserializeOwned>(
        &self,
        url: &str,
        body: Value,
    ) -> Result<T, ConfluenceError> {
        let request = ApiRequest::with_body(Method::Post, url, body);
        Ok(serde_json::from_value(self.transport.execute(&request)?)?)
    }

    pub(crate) fn put_as<T: DeserializeOwned>(
        &self,
        url: &str,
        body: Value,
    ) -> Result<T, ConfluenceError> {
        let request = ApiRequest::with_body(Method::Put, url, body);
        Ok(serde_json::from_value(self.transport.execute(&request)?)?)
    }

    /// Resolve the link context (owning space) of a page.
    ///
    /// A page without a space key yields an empty key.
    pub(crate) fn page_context(&self, page_id: &str) -> Result<PageContext, ConfluenceError> {
        #[derive(Deserialize)]
        struct SpaceRef {
            key: Option<String>,
        }
        #[derive(Deserialize)]
        struct ContentWithSpace {
            space: Option<SpaceRef>,
        }

        let page_id = url::content_id(page_id)?;
        let url = format!("{}/content/{page_id}", self.rest_api_url());
        let content: ContentWithSpace = self.get_as(&url, &[("expand", "space".to_owned())])?;
        let space_key = content.space.and_then(|s| s.key).unwrap_or_default();
        Ok(PageContext::new(space_key, self.web_url()))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use cfetch_config::ConfluenceConfig;

    use super::{ConfluenceClient, MockTransport};

    pub(crate) const CLOUD_URL: &str = "https://example.atlassian.net";

    pub(crate) fn config(base_url: &str) -> ConfluenceConfig {
        ConfluenceConfig {
            base_url: base_url.to_owned(),
            username: Some("me@example.com".to_owned()),
            api_token: Some("token".to_owned()),
            personal_token: None,
            timeout_secs: 30,
        }
    }

    /// Cloud client over `mock`; the caller keeps the handle to inspect requests.
    pub(crate) fn cloud_client(mock: &Arc<MockTransport>) -> ConfluenceClient {
        let transport: Arc<MockTransport> = Arc::clone(mock);
        ConfluenceClient::with_transport(&config(CLOUD_URL), transport)
    }
}
