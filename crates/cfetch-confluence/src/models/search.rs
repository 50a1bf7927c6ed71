//! Search result model.

use serde::Serialize;

use super::comment::web_link;
use crate::error::ConfluenceError;
use crate::types::SearchItem;
use crate::url;

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Content ID, for content hits.
    pub id: Option<String>,
    /// Title.
    pub title: String,
    /// Content type (`page`, `blogpost`, `comment`) or entity type.
    pub content_type: String,
    /// Owning space key, when expanded.
    pub space_key: Option<String>,
    /// Web link.
    pub url: Option<String>,
    /// Highlighted excerpt.
    pub excerpt: String,
    /// Last modification timestamp.
    pub last_modified: Option<String>,
}

impl SearchResult {
    pub(crate) fn from_raw(raw: SearchItem, web_url: &str) -> Result<Self, ConfluenceError> {
        let content = raw.content.as_ref();
        let title = raw
            .title
            .clone()
            .or_else(|| content.and_then(|c| c.title.clone()))
            .ok_or_else(|| ConfluenceError::malformed("title"))?;

        Ok(Self {
            id: content.and_then(|c| c.id.clone()),
            title,
            content_type: content
                .and_then(|c| c.content_type.clone())
                .or(raw.entity_type)
                .unwrap_or_default(),
            space_key: content
                .and_then(|c| c.space.as_ref())
                .and_then(|s| s.key.clone()),
            url: content
                .and_then(|c| web_link(c.links.as_ref(), web_url))
                .or_else(|| raw.url.as_deref().map(|u| url::resolve(web_url, u))),
            excerpt: raw.excerpt.unwrap_or_default(),
            last_modified: raw.last_modified,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    const WEB: &str = "https://example.atlassian.net/wiki";

    #[test]
    fn test_content_hit() {
        let raw: SearchItem = serde_json::from_value(json!({
            "content": {
                "id": "55",
                "type": "page",
                "title": "Runbook",
                "space": {"key": "OPS"},
                "_links": {"webui": "/spaces/OPS/pages/55/Runbook"}
            },
            "title": "Runbook",
            "excerpt": "restart the @@@hl@@@service@@@endhl@@@",
            "url": "/spaces/OPS/pages/55/Runbook",
            "entityType": "content",
            "lastModified": "2024-04-04T00:00:00.000Z"
        }))
        .unwrap();

        let result = SearchResult::from_raw(raw, WEB).unwrap();

        assert_eq!(result.id.as_deref(), Some("55"));
        assert_eq!(result.content_type, "page");
        assert_eq!(result.space_key.as_deref(), Some("OPS"));
        assert_eq!(
            result.url.as_deref(),
            Some("https://example.atlassian.net/wiki/spaces/OPS/pages/55/Runbook")
        );
    }

    #[test]
    fn test_space_hit_uses_entity_type_and_url() {
        let raw: SearchItem = serde_json::from_value(json!({
            "title": "Operations",
            "excerpt": "",
            "url": "/spaces/OPS",
            "entityType": "space"
        }))
        .unwrap();

        let result = SearchResult::from_raw(raw, WEB).unwrap();

        assert_eq!(result.id, None);
        assert_eq!(result.content_type, "space");
        assert_eq!(
            result.url.as_deref(),
            Some("https://example.atlassian.net/wiki/spaces/OPS")
        );
    }
}
