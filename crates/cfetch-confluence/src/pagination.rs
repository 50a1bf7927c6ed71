//! Cursor-following collection fetch.
//!
//! Confluence list endpoints (v1 and v2) return
//! `{"results": [...], "_links": {"next": "..."}}`. The next link carries
//! its own query string, so only the first request sends parameters.

use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use crate::client::ConfluenceClient;
use crate::error::{ConfluenceError, FetchStage, PartialFetch};

/// Page size requested from list endpoints.
pub(crate) const PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(rename = "_links", default)]
    links: Option<EnvelopeLinks>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeLinks {
    #[serde(default)]
    next: Option<String>,
}

/// Fetch every page of a collection, converting items in server order.
///
/// Stops at the first failed request, undecodable page, or item that
/// `convert` rejects. Items converted before the failure are returned
/// inside the [`PartialFetch`].
pub(crate) fn fetch_all<T>(
    client: &ConfluenceClient,
    what: &str,
    url: &str,
    query: &[(&str, String)],
    mut convert: impl FnMut(Value) -> Result<T, ConfluenceError>,
) -> Result<Vec<T>, PartialFetch<T>> {
    let mut items = Vec::new();
    let mut page = 1;
    let mut response = client.get(url, query);

    loop {
        let stage = FetchStage::Page(page);
        let envelope = match response.and_then(|value| Ok(serde_json::from_value::<Envelope>(value)?)) {
            Ok(envelope) => envelope,
            Err(e) => return Err(fail(what, e, stage, items)),
        };

        for raw in envelope.results {
            match convert(raw) {
                Ok(item) => items.push(item),
                Err(e) => return Err(fail(what, e, stage, items)),
            }
        }

        let Some(next) = envelope
            .links
            .and_then(|links| links.next)
            .filter(|next| !next.is_empty())
        else {
            break;
        };
        page += 1;
        response = client.get(&client.resolve_link(&next), &[]);
    }

    info!("Fetched {} {} across {} pages", items.len(), what, page);
    Ok(items)
}

/// Items of a single, non-followed list response.
pub(crate) fn results(response: Value) -> Result<Vec<Value>, ConfluenceError> {
    Ok(serde_json::from_value::<Envelope>(response)?.results)
}

/// Log a failed fetch and wrap it with what was collected.
pub(crate) fn fail<T>(
    what: &str,
    err: ConfluenceError,
    stage: FetchStage,
    items: Vec<T>,
) -> PartialFetch<T> {
    error!(
        "Failed to fetch {} at {}: {}; {} items collected",
        what,
        stage,
        err,
        items.len()
    );
    PartialFetch::new(err, stage, items)
}
