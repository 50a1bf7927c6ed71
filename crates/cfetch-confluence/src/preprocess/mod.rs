//! Storage-format preprocessing.
//!
//! Comment and page bodies arrive in Confluence storage format. The
//! [`ContentPreprocessor`] turns them into two views: HTML with
//! Confluence-specific elements (page links, mentions, macros) rewritten
//! to plain HTML, and Markdown rendered from the same tree.
//!
//! [`StoragePreprocessor`] is the default implementation. Input that
//! cannot be parsed degrades to tag-stripped text instead of failing.

mod entities;
mod html;
mod markdown;
mod parser;
mod rewrite;
mod tree;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PreprocessError;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("invalid tag regex"));

/// Which rendering of a body the caller wants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyFormat {
    /// Markdown rendered from the storage markup.
    #[default]
    Markdown,
    /// Storage markup with links and macros rewritten to HTML.
    Storage,
}

/// Context needed to resolve links inside a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    /// Key of the space owning the page. Empty when unknown.
    pub space_key: String,
    /// Web base URL that wiki-relative links resolve against.
    pub base_url: String,
}

impl PageContext {
    /// Create a context for the given space and web base URL.
    pub fn new(space_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            space_key: space_key.into(),
            base_url: base_url.into(),
        }
    }
}

/// Both renderings of one body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedContent {
    /// Rewritten HTML.
    pub html: String,
    /// Markdown.
    pub markdown: String,
}

impl ProcessedContent {
    /// Take the rendering matching `format`.
    #[must_use]
    pub fn into_body(self, format: BodyFormat) -> String {
        match format {
            BodyFormat::Markdown => self.markdown,
            BodyFormat::Storage => self.html,
        }
    }
}

/// Converts storage-format bodies into HTML and Markdown.
pub trait ContentPreprocessor: Send + Sync {
    /// Process one body in the given context.
    fn process(&self, html: &str, context: &PageContext) -> ProcessedContent;
}

/// Default preprocessor for Confluence storage format.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoragePreprocessor;

impl StoragePreprocessor {
    /// Create a new preprocessor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn try_process(html: &str, context: &PageContext) -> Result<ProcessedContent, PreprocessError> {
        let mut root = parser::parse_storage(html)?;
        rewrite::rewrite(&mut root, context);
        Ok(ProcessedContent {
            html: html::to_html(&root),
            markdown: markdown::to_markdown(&root),
        })
    }
}

impl ContentPreprocessor for StoragePreprocessor {
    fn process(&self, html: &str, context: &PageContext) -> ProcessedContent {
        Self::try_process(html, context).unwrap_or_else(|e| {
            warn!("Storage markup could not be parsed, falling back to plain text: {e}");
            let html = entities::replace_html_entities(html);
            let text = TAG_PATTERN.replace_all(&html, " ");
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            ProcessedContent {
                html,
                markdown: text,
            }
        })
    }
}
