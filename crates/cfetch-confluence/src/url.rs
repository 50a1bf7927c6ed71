//! URL helpers shared by pagination, link rewriting and request paths.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::error::ConfluenceError;

/// Characters escaped inside a `/display/{space}/{title}` path segment.
const TITLE_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Resolve a link from a response or document against a base URL.
///
/// `base` may carry a context path (`https://example.atlassian.net/wiki`).
/// Absolute links pass through. Links that already start with the context
/// path are joined to the origin, other root-relative links to `base`.
/// Anything else (fragments, `mailto:`) is returned unchanged.
pub(crate) fn resolve(base: &str, reference: &str) -> String {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return reference.to_owned();
    }
    if reference.starts_with("//") || !reference.starts_with('/') {
        return reference.to_owned();
    }

    let base = base.trim_end_matches('/');
    let (origin, context_path) = split_origin(base);
    if !context_path.is_empty()
        && (reference == context_path || reference.starts_with(&format!("{context_path}/")))
    {
        return format!("{origin}{reference}");
    }
    format!("{base}{reference}")
}

/// Split `scheme://host[:port]` from the remaining path.
fn split_origin(url: &str) -> (&str, &str) {
    let after_scheme = url.find("://").map_or(0, |i| i + 3);
    match url[after_scheme..].find('/') {
        Some(i) => url.split_at(after_scheme + i),
        None => (url, ""),
    }
}

/// Web URL of a page addressed by space key and title.
pub(crate) fn display_url(base: &str, space_key: &str, title: &str) -> String {
    let title = utf8_percent_encode(title, TITLE_SEGMENT)
        .to_string()
        .replace("%20", "+");
    let space = utf8_percent_encode(space_key, TITLE_SEGMENT);
    format!("{}/display/{space}/{title}", base.trim_end_matches('/'))
}

/// Check that a content ID is numeric before it goes into a request path.
///
/// # Errors
///
/// Returns [`ConfluenceError::InvalidInput`] for an empty or non-numeric ID.
pub(crate) fn content_id(id: &str) -> Result<&str, ConfluenceError> {
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        Ok(id)
    } else {
        Err(ConfluenceError::InvalidInput(format!(
            "content id must be numeric, got '{id}'"
        )))
    }
}
