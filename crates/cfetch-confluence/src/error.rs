//! Error types for Confluence fetching.

use std::fmt;

use cfetch_config::ConfigError;

/// Error while parsing storage markup.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PreprocessError {
    /// XML parsing error.
    #[error("XML parse error")]
    XmlParse(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    /// Encoding error during XML parsing.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Elements nested deeper than the parser accepts.
    #[error("elements nested deeper than {limit} levels")]
    TooDeep {
        /// Maximum accepted nesting depth.
        limit: usize,
    },
}

/// Error from Confluence API operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfluenceError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response was valid JSON but lacked a required field.
    #[error("malformed response: missing or invalid `{field}`")]
    Malformed {
        /// Dotted path of the offending field.
        field: String,
    },

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller supplied an unusable argument.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ConfluenceError {
    pub(crate) fn malformed(field: impl Into<String>) -> Self {
        Self::Malformed {
            field: field.into(),
        }
    }
}

/// Point in a paginated fetch where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    /// Looking up the context (owning space) before any page request.
    ResolveContext,
    /// Requesting or decoding the n-th page of results (1-based).
    Page(usize),
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResolveContext => f.write_str("context lookup"),
            Self::Page(n) => write!(f, "page {n}"),
        }
    }
}

/// A paginated fetch that failed part way through.
///
/// Keeps everything collected before the failure so callers can decide
/// whether a truncated result is acceptable.
#[derive(Debug)]
pub struct PartialFetch<T> {
    source: ConfluenceError,
    stage: FetchStage,
    partial: Vec<T>,
}

impl<T> PartialFetch<T> {
    pub(crate) fn new(source: ConfluenceError, stage: FetchStage, partial: Vec<T>) -> Self {
        Self {
            source,
            stage,
            partial,
        }
    }

    /// Stage at which the fetch stopped.
    #[must_use]
    pub fn stage(&self) -> FetchStage {
        self.stage
    }

    /// Underlying error.
    #[must_use]
    pub fn error(&self) -> &ConfluenceError {
        &self.source
    }

    /// Items collected before the failure, in server order.
    #[must_use]
    pub fn partial(&self) -> &[T] {
        &self.partial
    }

    /// Discard the error and keep the collected items.
    #[must_use]
    pub fn into_partial(self) -> Vec<T> {
        self.partial
    }

    /// Split into error, stage and collected items.
    #[must_use]
    pub fn into_parts(self) -> (ConfluenceError, FetchStage, Vec<T>) {
        (self.source, self.stage, self.partial)
    }

    /// Convert the collected items, keeping error and stage.
    pub(crate) fn map<U>(self, f: impl FnMut(T) -> U) -> PartialFetch<U> {
        PartialFetch {
            source: self.source,
            stage: self.stage,
            partial: self.partial.into_iter().map(f).collect(),
        }
    }
}

impl<T> fmt::Display for PartialFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fetch stopped at {} after {} items: {}",
            self.stage,
            self.partial.len(),
            self.source
        )
    }
}

impl<T: fmt::Debug> std::error::Error for PartialFetch<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl<T> From<PartialFetch<T>> for ConfluenceError {
    fn from(err: PartialFetch<T>) -> Self {
        err.source
    }
}
