//! Confluence comment types.

use serde::Deserialize;

use super::{Body, Links, UserRaw, flexible_id};

/// Inline comment from the v2 `pages/{id}/inline-comments` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineComment {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<Body>,
    #[serde(default)]
    pub version: Option<V2Version>,
    #[serde(default)]
    pub resolution_status: Option<String>,
    #[serde(default)]
    pub properties: Option<InlineMarkerProperties>,
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

/// v2 version block; carries author and timestamp.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct V2Version {
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
}

/// Inline anchor properties of a v2 comment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineMarkerProperties {
    #[serde(default)]
    pub inline_marker_ref: Option<String>,
    #[serde(default)]
    pub inline_original_selection: Option<String>,
}

/// Comment as v1 content (`content/{id}/child/comment`).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentComment {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<Body>,
    #[serde(default)]
    pub version: Option<V1Version>,
    #[serde(default)]
    pub history: Option<History>,
    #[serde(default)]
    pub extensions: Option<CommentExtensions>,
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

/// v1 version block.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct V1Version {
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub when: Option<String>,
    #[serde(default)]
    pub by: Option<UserRaw>,
}

/// v1 history block.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct History {
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub created_by: Option<UserRaw>,
}

/// v1 comment extensions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentExtensions {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub inline_properties: Option<V1InlineProperties>,
    #[serde(default)]
    pub resolution: Option<Resolution>,
}

/// v1 inline anchor properties.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct V1InlineProperties {
    #[serde(default)]
    pub original_selection: Option<String>,
    #[serde(default)]
    pub marker_ref: Option<String>,
}

/// v1 resolution block.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Resolution {
    #[serde(default)]
    pub status: Option<String>,
}
