//! Page model.

use serde::Serialize;

use super::comment::web_link;
use crate::error::ConfluenceError;
use crate::types::{Body, ContentPage};

/// A Confluence page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfluencePage {
    /// Page ID.
    pub id: String,
    /// Page title.
    pub title: String,
    /// Key of the owning space. Empty when not expanded.
    pub space_key: String,
    /// Content type (`page`, `blogpost`).
    pub content_type: String,
    /// Content status.
    pub status: String,
    /// Current version number.
    pub version: Option<u32>,
    /// Timestamp of the current version.
    pub updated: Option<String>,
    /// Body in the requested format, when it was requested.
    pub body: Option<String>,
    /// Web link to the page.
    pub url: Option<String>,
}

impl ConfluencePage {
    /// Build from v1 content.
    ///
    /// `render` is only called when the response carries a storage body.
    pub(crate) fn from_content(
        raw: ContentPage,
        web_url: &str,
        render: impl FnOnce(&str) -> String,
    ) -> Result<Self, ConfluenceError> {
        let id = raw.id.ok_or_else(|| ConfluenceError::malformed("id"))?;
        let body = raw.body.as_ref().and_then(Body::storage_value).map(render);
        let version = raw.version.as_ref();

        Ok(Self {
            id,
            title: raw.title.unwrap_or_default(),
            space_key: raw.space.and_then(|s| s.key).unwrap_or_default(),
            content_type: raw.content_type.unwrap_or_else(|| "page".to_owned()),
            status: raw.status.unwrap_or_else(|| "current".to_owned()),
            version: version.and_then(|v| v.number),
            updated: version.and_then(|v| v.when.clone()),
            body,
            url: web_link(raw.links.as_ref(), web_url),
        })
    }
}
