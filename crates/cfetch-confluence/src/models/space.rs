//! Space and label models.

use serde::Serialize;

use super::comment::web_link;
use crate::error::ConfluenceError;
use crate::types::{Label, SpaceRaw};

/// A Confluence space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfluenceSpace {
    /// Space ID.
    pub id: Option<String>,
    /// Space key.
    pub key: String,
    /// Display name.
    pub name: String,
    /// `global` or `personal`.
    pub space_type: String,
    /// `current` or `archived`.
    pub status: String,
    /// Web link to the space.
    pub url: Option<String>,
}

impl ConfluenceSpace {
    pub(crate) fn from_raw(raw: SpaceRaw, web_url: &str) -> Result<Self, ConfluenceError> {
        let key = raw.key.ok_or_else(|| ConfluenceError::malformed("key"))?;
        Ok(Self {
            id: raw.id,
            name: raw.name.unwrap_or_else(|| key.clone()),
            key,
            space_type: raw.space_type.unwrap_or_default(),
            status: raw.status.unwrap_or_default(),
            url: web_link(raw.links.as_ref(), web_url),
        })
    }
}

/// A content label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfluenceLabel {
    /// Label ID.
    pub id: Option<String>,
    /// Label name.
    pub name: String,
    /// Label prefix (`global`, `my`, `team`).
    pub prefix: String,
}

impl ConfluenceLabel {
    pub(crate) fn from_raw(raw: Label) -> Result<Self, ConfluenceError> {
        Ok(Self {
            id: raw.id,
            name: raw.name.ok_or_else(|| ConfluenceError::malformed("name"))?,
            prefix: raw.prefix.unwrap_or_else(|| "global".to_owned()),
        })
    }
}
