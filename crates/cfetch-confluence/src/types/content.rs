//! Confluence page, space and label types.

use serde::Deserialize;

use super::{Body, Links, SpaceRef, flexible_id};

/// Page as v1 content.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentPage {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub space: Option<SpaceRef>,
    #[serde(default)]
    pub version: Option<PageVersion>,
    #[serde(default)]
    pub body: Option<Body>,
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

/// Page version.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PageVersion {
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub when: Option<String>,
}

/// Space as returned by `GET /space`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SpaceRaw {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub space_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

/// Content label.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Label {
    #[serde(default, deserialize_with = "flexible_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
}
