//! Raw Confluence API response shapes.
//!
//! Only fields that are actually used are declared; serde ignores the
//! rest. Anything the server may omit is optional so that a missing field
//! surfaces as [`ConfluenceError::Malformed`](crate::ConfluenceError::Malformed)
//! at conversion time rather than as a decode failure for the whole page.

mod comment;
mod content;
mod search;
mod user;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) use comment::{ContentComment, InlineComment};
pub(crate) use content::{ContentPage, Label, SpaceRaw};
pub(crate) use search::SearchItem;
pub(crate) use user::UserRaw;

/// Body container (`{"storage": {"value": "..."}}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Body {
    #[serde(default)]
    pub storage: Option<Storage>,
}

/// Storage format representation.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Storage {
    #[serde(default)]
    pub value: Option<String>,
}

impl Body {
    pub(crate) fn storage_value(&self) -> Option<&str> {
        self.storage.as_ref()?.value.as_deref()
    }
}

/// Hypermedia links.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Links {
    #[serde(default)]
    pub webui: Option<String>,
}

/// Reference to a space embedded in another resource.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SpaceRef {
    #[serde(default)]
    pub key: Option<String>,
}

/// Accept identifiers encoded either as strings or as numbers.
pub(crate) fn flexible_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
