//! Page operations.

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use super::storage_body;
use crate::client::ConfluenceClient;
use crate::error::{ConfluenceError, FetchStage, PartialFetch};
use crate::models::ConfluencePage;
use crate::pagination::{PAGE_SIZE, fail, fetch_all, results};
use crate::preprocess::{BodyFormat, PageContext};
use crate::types::ContentPage;
use crate::url::content_id;

/// Expansions needed to build a page with its body.
const PAGE_EXPAND: &str = "body.storage,version,space";

/// Fields of a page to create.
#[derive(Debug, Clone, Copy)]
pub struct PageDraft<'a> {
    /// Key of the space to create the page in.
    pub space_key: &'a str,
    /// Page title.
    pub title: &'a str,
    /// Body in storage format.
    pub body: &'a str,
    /// Optional parent page ID.
    pub parent_id: Option<&'a str>,
}

/// Page reads and writes.
pub struct Pages<'a> {
    client: &'a ConfluenceClient,
}

impl<'a> Pages<'a> {
    pub(crate) fn new(client: &'a ConfluenceClient) -> Self {
        Self { client }
    }

    /// Get a page by ID with its body rendered in `format`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    pub fn page(&self, page_id: &str, format: BodyFormat) -> Result<ConfluencePage, ConfluenceError> {
        let page_id = content_id(page_id)?;
        info!("Getting page {}", page_id);
        let url = format!("{}/content/{page_id}", self.client.rest_api_url());
        let raw: ContentPage = self
            .client
            .get_as(&url, &[("expand", PAGE_EXPAND.to_owned())])?;
        self.convert(raw, format)
    }

    /// Find a page by exact title within a space.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::NotFound`] if no page has that title.
    pub fn page_by_title(
        &self,
        space_key: &str,
        title: &str,
        format: BodyFormat,
    ) -> Result<ConfluencePage, ConfluenceError> {
        info!("Looking up page '{}' in space {}", title, space_key);
        let url = format!("{}/content", self.client.rest_api_url());
        let response = self.client.get(
            &url,
            &[
                ("type", "page".to_owned()),
                ("spaceKey", space_key.to_owned()),
                ("title", title.to_owned()),
                ("expand", PAGE_EXPAND.to_owned()),
            ],
        )?;

        let first = results(response)?.into_iter().next().ok_or_else(|| {
            ConfluenceError::NotFound(format!("page '{title}' in space {space_key}"))
        })?;
        self.convert(serde_json::from_value(first)?, format)
    }

    /// List one window of pages in a space.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or any page is malformed.
    pub fn space_pages(
        &self,
        space_key: &str,
        start: usize,
        limit: usize,
        format: BodyFormat,
    ) -> Result<Vec<ConfluencePage>, ConfluenceError> {
        info!("Listing pages in space {} (start={}, limit={})", space_key, start, limit);
        let url = format!("{}/content", self.client.rest_api_url());
        let response = self.client.get(
            &url,
            &[
                ("type", "page".to_owned()),
                ("spaceKey", space_key.to_owned()),
                ("start", start.to_string()),
                ("limit", limit.to_string()),
                ("expand", PAGE_EXPAND.to_owned()),
            ],
        )?;

        results(response)?
            .into_iter()
            .map(|value| self.convert(serde_json::from_value(value)?, format))
            .collect()
    }

    /// Fetch every direct child page, in server order.
    ///
    /// # Errors
    ///
    /// Returns [`PartialFetch`] with the pages collected before the failure.
    pub fn children(
        &self,
        page_id: &str,
        format: BodyFormat,
    ) -> Result<Vec<ConfluencePage>, PartialFetch<ConfluencePage>> {
        const WHAT: &str = "child pages";

        let page_id =
            content_id(page_id).map_err(|e| fail(WHAT, e, FetchStage::Page(1), Vec::new()))?;
        info!("Getting child pages of {}", page_id);
        let url = format!("{}/content/{page_id}/child/page", self.client.rest_api_url());
        let query = [
            ("expand", PAGE_EXPAND.to_owned()),
            ("limit", PAGE_SIZE.to_string()),
        ];
        fetch_all(self.client, WHAT, &url, &query, |value| {
            self.convert(serde_json::from_value(value)?, format)
        })
    }

    /// Create a page.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is empty or the server rejects the page.
    pub fn create_page(
        &self,
        draft: &PageDraft<'_>,
        format: BodyFormat,
    ) -> Result<ConfluencePage, ConfluenceError> {
        if draft.title.trim().is_empty() {
            return Err(ConfluenceError::InvalidInput(
                "page title cannot be empty".to_owned(),
            ));
        }

        info!("Creating page '{}' in space {}", draft.title, draft.space_key);
        let mut body = json!({
            "type": "page",
            "title": draft.title,
            "space": {"key": draft.space_key},
            "body": storage_body(draft.body),
        });
        if let Some(parent_id) = draft.parent_id {
            body["ancestors"] = json!([{"id": parent_id}]);
        }

        let url = format!("{}/content", self.client.rest_api_url());
        let raw: ContentPage = self.client.post_as(&url, body)?;
        self.convert(raw, format)
    }

    /// Replace a page's title and body, bumping its version.
    ///
    /// The current version is read first; the update is sent as the next
    /// version number.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be read or the update is rejected
    /// (for example on a concurrent edit).
    pub fn update_page(
        &self,
        page_id: &str,
        title: &str,
        storage: &str,
        message: Option<&str>,
        format: BodyFormat,
    ) -> Result<ConfluencePage, ConfluenceError> {
        #[derive(Deserialize)]
        struct Current {
            version: Option<CurrentVersion>,
        }
        #[derive(Deserialize)]
        struct CurrentVersion {
            number: u32,
        }

        let page_id = content_id(page_id)?;
        let url = format!("{}/content/{page_id}", self.client.rest_api_url());
        let current: Current = self
            .client
            .get_as(&url, &[("expand", "version".to_owned())])?;
        let current_version = current
            .version
            .ok_or_else(|| ConfluenceError::malformed("version.number"))?
            .number;

        info!(
            "Updating page {} from version {} to {}",
            page_id,
            current_version,
            current_version + 1
        );
        let mut version = json!({"number": current_version + 1});
        if let Some(message) = message {
            version["message"] = Value::from(message);
        }
        let body = json!({
            "id": page_id,
            "type": "page",
            "title": title,
            "version": version,
            "body": storage_body(storage),
        });

        let raw: ContentPage = self.client.put_as(&url, body)?;
        self.convert(raw, format)
    }

    fn convert(&self, raw: ContentPage, format: BodyFormat) -> Result<ConfluencePage, ConfluenceError> {
        let web_url = self.client.web_url();
        let space_key = raw
            .space
            .as_ref()
            .and_then(|s| s.key.clone())
            .unwrap_or_default();
        let context = PageContext::new(space_key, web_url.clone());
        ConfluencePage::from_content(raw, &web_url, |html| {
            self.client.process(html, &context).into_body(format)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::client::{MockTransport, Method};
    use crate::client::test_support::cloud_client;

    fn page_json(id: &str, title: &str, version: u32) -> Value {
        json!({
            "id": id,
            "type": "page",
            "status": "current",
            "title": title,
            "space": {"key": "DEV"},
            "version": {"number": version},
            "body": {"storage": {"value": "<h1>Intro</h1><p>Text</p>", "representation": "storage"}},
            "_links": {"webui": format!("/spaces/DEV/pages/{id}")}
        })
    }

    #[test]
    fn test_page_markdown() {
        let mock = Arc::new(MockTransport::new().with_json(page_json("1", "Home", 3)));
        let client = cloud_client(&mock);

        let page = Pages::new(&client).page("1", BodyFormat::Markdown).unwrap();

        assert_eq!(page.title, "Home");
        assert_eq!(page.space_key, "DEV");
        assert_eq!(page.body.as_deref(), Some("# Intro\n\nText"));
        assert_eq!(mock.requests()[0].query_param("expand"), Some(PAGE_EXPAND));
    }

    #[test]
    fn test_page_by_title_not_found() {
        let mock = Arc::new(MockTransport::new().with_json(json!({"results": [], "size": 0})));
        let client = cloud_client(&mock);

        let err = Pages::new(&client)
            .page_by_title("DEV", "Missing", BodyFormat::Markdown)
            .unwrap_err();

        assert!(matches!(err, ConfluenceError::NotFound(_)));
        let request = &mock.requests()[0];
        assert_eq!(request.query_param("title"), Some("Missing"));
        assert_eq!(request.query_param("spaceKey"), Some("DEV"));
    }

    #[test]
    fn test_page_by_title_found() {
        let mock = Arc::new(
            MockTransport::new().with_json(json!({"results": [page_json("7", "Guide", 1)]})),
        );
        let client = cloud_client(&mock);

        let page = Pages::new(&client)
            .page_by_title("DEV", "Guide", BodyFormat::Storage)
            .unwrap();

        assert_eq!(page.id, "7");
        assert_eq!(page.body.as_deref(), Some("<h1>Intro</h1><p>Text</p>"));
    }

    #[test]
    fn test_space_pages_window() {
        let mock = Arc::new(MockTransport::new().with_json(json!({
            "results": [page_json("1", "A", 1), page_json("2", "B", 1)],
            "start": 25,
            "limit": 2,
            "size": 2
        })));
        let client = cloud_client(&mock);

        let pages = Pages::new(&client)
            .space_pages("DEV", 25, 2, BodyFormat::Markdown)
            .unwrap();

        assert_eq!(pages.iter().map(|p| p.title.as_str()).collect::<Vec<_>>(), vec!["A", "B"]);
        let request = &mock.requests()[0];
        assert_eq!(request.query_param("start"), Some("25"));
        assert_eq!(request.query_param("limit"), Some("2"));
    }

    #[test]
    fn test_children_follow_next() {
        let mock = Arc::new(
            MockTransport::new()
                .with_json(json!({
                    "results": [page_json("2", "Child A", 1)],
                    "_links": {"next": "/rest/api/content/1/child/page?start=1"}
                }))
                .with_json(json!({"results": [page_json("3", "Child B", 1)]})),
        );
        let client = cloud_client(&mock);

        let children = Pages::new(&client).children("1", BodyFormat::Markdown).unwrap();

        assert_eq!(children.len(), 2);
        assert_eq!(
            mock.urls()[1],
            "https://example.atlassian.net/wiki/rest/api/content/1/child/page?start=1"
        );
    }

    #[test]
    fn test_create_page_with_parent() {
        let mock = Arc::new(MockTransport::new().with_json(page_json("9", "New", 1)));
        let client = cloud_client(&mock);

        let page = Pages::new(&client)
            .create_page(
                &PageDraft {
                    space_key: "DEV",
                    title: "New",
                    body: "<p>Text</p>",
                    parent_id: Some("1"),
                },
                BodyFormat::Markdown,
            )
            .unwrap();

        assert_eq!(page.id, "9");
        let request = &mock.requests()[0];
        assert_eq!(request.method, Method::Post);
        let body = request.body.as_ref().unwrap();
        assert_eq!(body["space"]["key"], "DEV");
        assert_eq!(body["ancestors"][0]["id"], "1");
    }

    #[test]
    fn test_create_page_requires_title() {
        let mock = Arc::new(MockTransport::new());
        let result = Pages::new(&cloud_client(&mock)).create_page(
            &PageDraft {
                space_key: "DEV",
                title: "",
                body: "",
                parent_id: None,
            },
            BodyFormat::Markdown,
        );
        assert!(matches!(result, Err(ConfluenceError::InvalidInput(_))));
    }

    #[test]
    fn test_non_numeric_page_id_sends_nothing() {
        let mock = Arc::new(MockTransport::new());
        let client = cloud_client(&mock);
        let pages = Pages::new(&client);

        assert!(matches!(
            pages.page("1?expand=history", BodyFormat::Markdown),
            Err(ConfluenceError::InvalidInput(_))
        ));
        assert!(matches!(
            pages.update_page("../2", "T", "<p>x</p>", None, BodyFormat::Markdown),
            Err(ConfluenceError::InvalidInput(_))
        ));
        let err = pages.children("", BodyFormat::Markdown).unwrap_err();
        assert!(matches!(err.error(), ConfluenceError::InvalidInput(_)));
        assert!(err.partial().is_empty());
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_update_page_increments_version() {
        let mock = Arc::new(
            MockTransport::new()
                .with_json(json!({"id": "1", "version": {"number": 4}}))
                .with_json(page_json("1", "Home v5", 5)),
        );
        let client = cloud_client(&mock);

        let page = Pages::new(&client)
            .update_page("1", "Home v5", "<p>new</p>", Some("sync"), BodyFormat::Markdown)
            .unwrap();

        assert_eq!(page.version, Some(5));
        let requests = mock.requests();
        assert_eq!(requests[0].query_param("expand"), Some("version"));
        assert_eq!(requests[1].method, Method::Put);
        let body = requests[1].body.as_ref().unwrap();
        assert_eq!(body["version"], json!({"number": 5, "message": "sync"}));
        assert_eq!(body["title"], "Home v5");
    }

    #[test]
    fn test_update_conflict_surfaces_status() {
        let mock = Arc::new(
            MockTransport::new()
                .with_json(json!({"id": "1", "version": {"number": 4}}))
                .with_status(409, "Version must be incremented"),
        );
        let client = cloud_client(&mock);

        let err = Pages::new(&client)
            .update_page("1", "T", "<p/>", None, BodyFormat::Markdown)
            .unwrap_err();

        assert!(matches!(err, ConfluenceError::HttpResponse { status: 409, .. }));
    }
}
