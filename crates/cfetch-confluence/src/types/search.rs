//! Confluence search types.

use serde::Deserialize;

use super::{Links, SpaceRef, flexible_id};

/// One hit from `GET /search`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchItem {
    #[serde(default)]
    pub content: Option<SearchContent>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub last_modified: Option<String>,
}

/// Content embedded in a search hit.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchContent {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub space: Option<SpaceRef>,
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}
