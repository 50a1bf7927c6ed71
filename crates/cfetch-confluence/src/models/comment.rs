//! Comment model.

use serde::Serialize;

use crate::error::ConfluenceError;
use crate::types::{Body, ContentComment, InlineComment, Links, UserRaw};
use crate::url;

/// A footer or inline comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfluenceComment {
    /// Comment ID.
    pub id: String,
    /// Comment title (usually `Re: <page title>`).
    pub title: String,
    /// Body in the requested format.
    pub body: String,
    /// Comment author, when the server reports one.
    pub author: Option<CommentAuthor>,
    /// Creation timestamp.
    pub created: Option<String>,
    /// Version number.
    pub version: Option<u32>,
    /// Content status (`current`, `draft`, ...).
    pub status: String,
    /// Where the comment is attached.
    pub location: CommentLocation,
    /// Web link to the comment.
    pub url: Option<String>,
    /// Anchor details for inline comments.
    pub inline: Option<InlineAnchor>,
}

/// Comment author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentAuthor {
    /// Account ID (Cloud) or user key (Server).
    pub account_id: String,
    /// Display name, when included in the response.
    pub display_name: Option<String>,
}

/// Where a comment is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentLocation {
    /// Anchored to a text selection.
    Inline,
    /// Page-level comment.
    Footer,
}

/// Text selection an inline comment is anchored to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineAnchor {
    /// Text that was selected when the comment was made.
    pub original_selection: Option<String>,
    /// Marker reference tying the comment to the page markup.
    pub marker_ref: Option<String>,
    /// `open`, `resolved`, `reopened` or `dangling`.
    pub resolution_status: Option<String>,
}

impl ConfluenceComment {
    /// Build from a v2 inline comment.
    ///
    /// `render` receives the storage body and returns the body to keep.
    pub(crate) fn from_inline(
        raw: InlineComment,
        web_url: &str,
        render: impl FnOnce(&str) -> String,
    ) -> Result<Self, ConfluenceError> {
        let id = raw.id.ok_or_else(|| ConfluenceError::malformed("id"))?;
        let body = render(storage_body(raw.body.as_ref())?);
        let version = raw.version.as_ref();
        let properties = raw.properties.as_ref();

        Ok(Self {
            id,
            title: raw.title.unwrap_or_default(),
            body,
            author: version
                .and_then(|v| v.author_id.clone())
                .map(|account_id| CommentAuthor {
                    account_id,
                    display_name: None,
                }),
            created: version.and_then(|v| v.created_at.clone()),
            version: version.and_then(|v| v.number),
            status: raw.status.unwrap_or_else(|| "current".to_owned()),
            location: CommentLocation::Inline,
            url: web_link(raw.links.as_ref(), web_url),
            inline: Some(InlineAnchor {
                original_selection: properties.and_then(|p| p.inline_original_selection.clone()),
                marker_ref: properties.and_then(|p| p.inline_marker_ref.clone()),
                resolution_status: raw.resolution_status,
            }),
        })
    }

    /// Build from a v1 content comment.
    pub(crate) fn from_content(
        raw: ContentComment,
        web_url: &str,
        render: impl FnOnce(&str) -> String,
    ) -> Result<Self, ConfluenceError> {
        let id = raw.id.ok_or_else(|| ConfluenceError::malformed("id"))?;
        let body = render(storage_body(raw.body.as_ref())?);
        let extensions = raw.extensions.as_ref();
        let location = match extensions.and_then(|e| e.location.as_deref()) {
            Some("inline") => CommentLocation::Inline,
            _ => CommentLocation::Footer,
        };

        let author = raw
            .history
            .as_ref()
            .and_then(|h| h.created_by.as_ref())
            .or_else(|| raw.version.as_ref().and_then(|v| v.by.as_ref()))
            .and_then(comment_author);
        let created = raw
            .history
            .as_ref()
            .and_then(|h| h.created_date.clone())
            .or_else(|| raw.version.as_ref().and_then(|v| v.when.clone()));

        let inline = (location == CommentLocation::Inline).then(|| {
            let properties = extensions.and_then(|e| e.inline_properties.as_ref());
            InlineAnchor {
                original_selection: properties.and_then(|p| p.original_selection.clone()),
                marker_ref: properties.and_then(|p| p.marker_ref.clone()),
                resolution_status: extensions
                    .and_then(|e| e.resolution.as_ref())
                    .and_then(|r| r.status.clone()),
            }
        });

        Ok(Self {
            id,
            title: raw.title.unwrap_or_default(),
            body,
            author,
            created,
            version: raw.version.as_ref().and_then(|v| v.number),
            status: raw.status.unwrap_or_else(|| "current".to_owned()),
            location,
            url: web_link(raw.links.as_ref(), web_url),
            inline,
        })
    }
}

fn storage_body(body: Option<&Body>) -> Result<&str, ConfluenceError> {
    body.and_then(Body::storage_value)
        .ok_or_else(|| ConfluenceError::malformed("body.storage.value"))
}

fn comment_author(user: &UserRaw) -> Option<CommentAuthor> {
    Some(CommentAuthor {
        account_id: user.identifier()?.to_owned(),
        display_name: user.name().map(str::to_owned),
    })
}

/// Absolute web link from a `_links.webui` entry.
pub(crate) fn web_link(links: Option<&Links>, web_url: &str) -> Option<String> {
    links
        .and_then(|l| l.webui.as_deref())
        .map(|webui| url::resolve(web_url, webui))
}
