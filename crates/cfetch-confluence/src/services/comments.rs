//! Comment operations.

use serde_json::{Value, json};
use tracing::{info, warn};

use super::storage_body;
use crate::client::ConfluenceClient;
use crate::error::{ConfluenceError, FetchStage, PartialFetch};
use crate::models::ConfluenceComment;
use crate::pagination::{PAGE_SIZE, fail, fetch_all};
use crate::preprocess::{BodyFormat, PageContext};
use crate::types::{Body, ContentComment, InlineComment};

/// Expansions needed to build a comment from v1 content.
const COMMENT_EXPAND: &str =
    "body.storage,version,history,extensions.inlineProperties,extensions.resolution";

/// Footer and inline comments on pages.
pub struct Comments<'a> {
    client: &'a ConfluenceClient,
}

impl<'a> Comments<'a> {
    pub(crate) fn new(client: &'a ConfluenceClient) -> Self {
        Self { client }
    }

    /// Fetch every inline comment on a page, in server order.
    ///
    /// Looks up the page's space first so links inside comment bodies
    /// resolve, then follows the v2 `inline-comments` cursor until the
    /// server stops returning a next link. Bodies are rendered in `format`.
    ///
    /// # Errors
    ///
    /// Returns [`PartialFetch`] with the comments collected before the
    /// failure if the lookup, any page request, or any item fails.
    pub fn inline_comments(
        &self,
        page_id: &str,
        format: BodyFormat,
    ) -> Result<Vec<ConfluenceComment>, PartialFetch<ConfluenceComment>> {
        const WHAT: &str = "inline comments";

        let context = self.context(page_id, WHAT)?;
        if !self.client.is_cloud() {
            warn!("Inline comments use the v2 API, which only Confluence Cloud provides");
        }

        info!("Getting inline comments for page {}", page_id);
        let url = format!("{}/pages/{page_id}/inline-comments", self.client.v2_api_url());
        let query = [
            ("limit", PAGE_SIZE.to_string()),
            ("body-format", "storage".to_owned()),
        ];
        let web_url = self.client.web_url();

        fetch_all(self.client, WHAT, &url, &query, |value| {
            let raw: InlineComment = serde_json::from_value(value)?;
            ConfluenceComment::from_inline(raw, &web_url, |html| {
                self.client.process(html, &context).into_body(format)
            })
        })
    }

    /// Fetch every footer comment on a page, including replies.
    ///
    /// # Errors
    ///
    /// Returns [`PartialFetch`] with the comments collected before the failure.
    pub fn page_comments(
        &self,
        page_id: &str,
        format: BodyFormat,
    ) -> Result<Vec<ConfluenceComment>, PartialFetch<ConfluenceComment>> {
        const WHAT: &str = "page comments";

        let context = self.context(page_id, WHAT)?;

        info!("Getting comments for page {}", page_id);
        let url = format!(
            "{}/content/{page_id}/child/comment",
            self.client.rest_api_url()
        );
        let query = [
            ("expand", COMMENT_EXPAND.to_owned()),
            ("depth", "all".to_owned()),
            ("limit", PAGE_SIZE.to_string()),
        ];
        let web_url = self.client.web_url();

        fetch_all(self.client, WHAT, &url, &query, |value| {
            self.convert_content(value, &web_url, &context, format)
        })
    }

    /// Add a footer comment to a page.
    ///
    /// `storage` is the comment body in storage format.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be looked up or the comment is rejected.
    pub fn add_comment(
        &self,
        page_id: &str,
        storage: &str,
        format: BodyFormat,
    ) -> Result<ConfluenceComment, ConfluenceError> {
        if storage.trim().is_empty() {
            return Err(ConfluenceError::InvalidInput(
                "comment body cannot be empty".to_owned(),
            ));
        }
        let context = self.client.page_context(page_id)?;

        info!("Adding comment to page {}", page_id);
        let url = format!("{}/content", self.client.rest_api_url());
        let body = json!({
            "type": "comment",
            "container": {"id": page_id, "type": "page", "status": "current"},
            "body": storage_body(storage),
        });
        let created: Value = self.client.post_as(&url, body)?;

        // Creation responses do not always echo the body back.
        let mut raw: ContentComment = serde_json::from_value(created)?;
        if raw.body.as_ref().and_then(Body::storage_value).is_none() {
            raw.body = Some(serde_json::from_value(storage_body(storage))?);
        }
        ConfluenceComment::from_content(raw, &self.client.web_url(), |html| {
            self.client.process(html, &context).into_body(format)
        })
    }

    fn context<T>(&self, page_id: &str, what: &str) -> Result<PageContext, PartialFetch<T>> {
        self.client
            .page_context(page_id)
            .map_err(|e| fail(what, e, FetchStage::ResolveContext, Vec::new()))
    }

    fn convert_content(
        &self,
        value: Value,
        web_url: &str,
        context: &PageContext,
        format: BodyFormat,
    ) -> Result<ConfluenceComment, ConfluenceError> {
        let raw: ContentComment = serde_json::from_value(value)?;
        ConfluenceComment::from_content(raw, web_url, |html| {
            self.client.process(html, context).into_body(format)
        })
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
    use crate::models::CommentLocation;

    fn space_lookup() -> Value {
        json!({"id": "1", "type": "page", "space": {"key": "DEV"}})
    }

    fn inline_item(id: &str, body: &str) -> Value {
        json!({
            "id": id,
            "status": "current",
            "title": format!("Re: Page {id}"),
            "resolutionStatus": "open",
            "version": {"number": 1, "createdAt": "2024-05-01T10:00:00.000Z", "authorId": "acc-1"},
            "body": {"storage": {"value": body, "representation": "storage"}},
            "properties": {"inlineMarkerRef": format!("ref-{id}"), "inlineOriginalSelection": "text"},
            "_links": {"webui": format!("/spaces/DEV/pages/1?focusedCommentId={id}")}
        })
    }

    fn page_of(ids: &[&str], next: Option<&str>) -> Value {
        let results: Vec<Value> = ids
            .iter()
            .map(|id| inline_item(id, "<p>Hello <strong>there</strong></p>"))
            .collect();
        match next {
            Some(next) => json!({"results": results, "_links": {"next": next}}),
            None => json!({"results": results, "_links": {}}),
        }
    }

    fn ids(comments: &[ConfluenceComment]) -> Vec<&str> {
        comments.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_zero_comments() {
        let mock = Arc::new(
            MockTransport::new()
                .with_json(space_lookup())
                .with_json(json!({"results": [], "_links": {}})),
        );
        let client = cloud_client(&mock);

        let comments = Comments::new(&client)
            .inline_comments("1", BodyFormat::Markdown)
            .unwrap();

        assert!(comments.is_empty());
        assert_eq!(mock.requests().len(), 2);
    }

    #[test]
    fn test_first_request_shape() {
        let mock = Arc::new(
            MockTransport::new()
                .with_json(space_lookup())
                .with_json(page_of(&["c1"], None)),
        );
        let client = cloud_client(&mock);

        Comments::new(&client)
            .inline_comments("1", BodyFormat::Markdown)
            .unwrap();

        let requests = mock.requests();
        assert_eq!(
            requests[0].url,
            "https://example.atlassian.net/wiki/rest/api/content/1"
        );
        assert_eq!(requests[0].query_param("expand"), Some("space"));
        assert_eq!(
            requests[1].url,
            "https://example.atlassian.net/wiki/api/v2/pages/1/inline-comments"
        );
        assert_eq!(requests[1].query_param("limit"), Some("100"));
        assert_eq!(requests[1].query_param("body-format"), Some("storage"));
    }

    #[test]
    fn test_multiple_pages_in_order() {
        let first: Vec<String> = (0..100).map(|i| format!("a{i}")).collect();
        let first_refs: Vec<&str> = first.iter().map(String::as_str).collect();
        let mock = Arc::new(
            MockTransport::new()
                .with_json(space_lookup())
                .with_json(page_of(
                    &first_refs,
                    Some("/wiki/api/v2/pages/1/inline-comments?cursor=p2&limit=100&body-format=storage"),
                ))
                .with_json(page_of(
                    &["b0", "b1"],
                    Some("https://example.atlassian.net/wiki/api/v2/pages/1/inline-comments?cursor=p3"),
                ))
                .with_json(page_of(&["c0"], None)),
        );
        let client = cloud_client(&mock);

        let comments = Comments::new(&client)
            .inline_comments("1", BodyFormat::Markdown)
            .unwrap();

        assert_eq!(comments.len(), 103);
        assert_eq!(comments[0].id, "a0");
        assert_eq!(comments[99].id, "a99");
        assert_eq!(ids(&comments[100..]), vec!["b0", "b1", "c0"]);

        let urls = mock.urls();
        assert_eq!(urls.len(), 4);
        assert_eq!(
            urls[2],
            "https://example.atlassian.net/wiki/api/v2/pages/1/inline-comments?cursor=p2&limit=100&body-format=storage"
        );
        assert_eq!(
            urls[3],
            "https://example.atlassian.net/wiki/api/v2/pages/1/inline-comments?cursor=p3"
        );
    }

    #[test]
    fn test_markdown_and_storage_differ_only_in_body() {
        let script = || {
            Arc::new(
                MockTransport::new()
                    .with_json(space_lookup())
                    .with_json(page_of(&["c1"], None)),
            )
        };

        let markdown_mock = script();
        let markdown = Comments::new(&cloud_client(&markdown_mock))
            .inline_comments("1", BodyFormat::Markdown)
            .unwrap();
        let storage_mock = script();
        let storage = Comments::new(&cloud_client(&storage_mock))
            .inline_comments("1", BodyFormat::Storage)
            .unwrap();

        assert_eq!(markdown[0].body, "Hello **there**");
        assert_eq!(storage[0].body, "<p>Hello <strong>there</strong></p>");
        let mut same_body = storage[0].clone();
        same_body.body.clone_from(&markdown[0].body);
        assert_eq!(same_body, markdown[0]);
    }

    #[test]
    fn test_links_rewritten_with_page_space() {
        let mock = Arc::new(
            MockTransport::new()
                .with_json(space_lookup())
                .with_json(json!({
                    "results": [inline_item(
                        "c1",
                        r#"<p>See <ac:link><ri:page ri:content-title="Setup Guide" /></ac:link></p>"#
                    )]
                })),
        );
        let client = cloud_client(&mock);

        let comments = Comments::new(&client)
            .inline_comments("1", BodyFormat::Markdown)
            .unwrap();

        assert_eq!(
            comments[0].body,
            "See [Setup Guide](https://example.atlassian.net/wiki/display/DEV/Setup+Guide)"
        );
    }

    #[test]
    fn test_lookup_failure_issues_no_page_requests() {
        let mock = Arc::new(MockTransport::new().with_status(404, "No content found"));
        let client = cloud_client(&mock);

        let err = Comments::new(&client)
            .inline_comments("404", BodyFormat::Markdown)
            .unwrap_err();

        assert_eq!(err.stage(), FetchStage::ResolveContext);
        assert!(err.partial().is_empty());
        assert!(matches!(
            err.error(),
            ConfluenceError::HttpResponse { status: 404, .. }
        ));
        assert_eq!(mock.requests().len(), 1);
    }

    #[test]
    fn test_second_page_failure_keeps_first_page() {
        let mock = Arc::new(
            MockTransport::new()
                .with_json(space_lookup())
                .with_json(page_of(&["a", "b"], Some("/wiki/api/v2/pages/1/inline-comments?cursor=2")))
                .with_status(500, "Internal Server Error")
                .with_json(page_of(&["never"], None)),
        );
        let client = cloud_client(&mock);

        let err = Comments::new(&client)
            .inline_comments("1", BodyFormat::Markdown)
            .unwrap_err();

        assert_eq!(err.stage(), FetchStage::Page(2));
        assert_eq!(ids(err.partial()), vec!["a", "b"]);
        assert_eq!(mock.requests().len(), 3);
        assert_eq!(ids(&err.into_partial()), vec!["a", "b"]);
    }

    #[test]
    fn test_malformed_item_stops_fetch() {
        let mut broken = inline_item("b", "<p>x</p>");
        broken["body"] = json!({});
        let mock = Arc::new(
            MockTransport::new()
                .with_json(space_lookup())
                .with_json(json!({
                    "results": [inline_item("a", "<p>x</p>"), broken, inline_item("c", "<p>x</p>")],
                    "_links": {"next": "/wiki/api/v2/pages/1/inline-comments?cursor=2"}
                })),
        );
        let client = cloud_client(&mock);

        let err = Comments::new(&client)
            .inline_comments("1", BodyFormat::Markdown)
            .unwrap_err();

        assert_eq!(err.stage(), FetchStage::Page(1));
        assert_eq!(ids(err.partial()), vec!["a"]);
        assert!(matches!(err.error(), ConfluenceError::Malformed { .. }));
        assert_eq!(mock.requests().len(), 2);
    }

    #[test]
    fn test_empty_page_id_rejected() {
        let mock = Arc::new(MockTransport::new());
        let client = cloud_client(&mock);

        let err = Comments::new(&client)
            .inline_comments("  ", BodyFormat::Markdown)
            .unwrap_err();

        assert!(matches!(err.error(), ConfluenceError::InvalidInput(_)));
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_path_like_page_id_rejected() {
        let mock = Arc::new(MockTransport::new());
        let client = cloud_client(&mock);

        let err = Comments::new(&client)
            .inline_comments("1/../2", BodyFormat::Markdown)
            .unwrap_err();

        assert_eq!(err.stage(), FetchStage::ResolveContext);
        assert!(matches!(err.error(), ConfluenceError::InvalidInput(_)));
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_page_comments_paginated() {
        let footer = |id: &str| {
            json!({
                "id": id,
                "type": "comment",
                "title": "Re: Home",
                "body": {"storage": {"value": "<p>ok</p>"}},
                "version": {"number": 1, "by": {"accountId": "acc-9", "displayName": "Bo"}},
                "extensions": {"location": "footer"}
            })
        };
        let mock = Arc::new(
            MockTransport::new()
                .with_json(space_lookup())
                .with_json(json!({
                    "results": [footer("10")],
                    "_links": {"next": "/rest/api/content/1/child/comment?start=1&limit=100"}
                }))
                .with_json(json!({"results": [footer("11")], "_links": {}})),
        );
        let client = cloud_client(&mock);

        let comments = Comments::new(&client)
            .page_comments("1", BodyFormat::Markdown)
            .unwrap();

        assert_eq!(ids(&comments), vec!["10", "11"]);
        assert_eq!(comments[0].location, CommentLocation::Footer);
        assert_eq!(comments[0].body, "ok");

        let requests = mock.requests();
        assert_eq!(
            requests[1].url,
            "https://example.atlassian.net/wiki/rest/api/content/1/child/comment"
        );
        assert_eq!(requests[1].query_param("depth"), Some("all"));
        assert_eq!(
            requests[2].url,
            "https://example.atlassian.net/wiki/rest/api/content/1/child/comment?start=1&limit=100"
        );
    }

    #[test]
    fn test_add_comment() {
        let mock = Arc::new(
            MockTransport::new()
                .with_json(space_lookup())
                .with_json(json!({"id": "500", "type": "comment", "title": "Re: Home"})),
        );
        let client = cloud_client(&mock);

        let comment = Comments::new(&client)
            .add_comment("1", "<p>Ship <em>it</em></p>", BodyFormat::Markdown)
            .unwrap();

        assert_eq!(comment.id, "500");
        assert_eq!(comment.body, "Ship *it*");

        let request = &mock.requests()[1];
        assert_eq!(request.url, "https://example.atlassian.net/wiki/rest/api/content");
        let body = request.body.as_ref().unwrap();
        assert_eq!(body["container"]["id"], "1");
        assert_eq!(body["body"]["storage"]["value"], "<p>Ship <em>it</em></p>");
    }

    #[test]
    fn test_add_empty_comment_rejected() {
        let mock = Arc::new(MockTransport::new());
        let result = Comments::new(&cloud_client(&mock)).add_comment("1", " ", BodyFormat::Markdown);
        assert!(matches!(result, Err(ConfluenceError::InvalidInput(_))));
        assert!(mock.requests().is_empty());
    }
}
