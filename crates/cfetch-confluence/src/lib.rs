//! Confluence fetch layer.
//!
//! This crate reads pages, comments, spaces, labels, users and search
//! results from Confluence and turns them into typed, Markdown-ready models:
//! - [`ConfluenceClient`]: shared session over a [`Transport`]
//! - [`ConfluenceFetcher`]: facade handing out per-resource services
//! - [`StoragePreprocessor`]: storage format to HTML and Markdown
//!
//! # Inline comments
//!
//! ```ignore
//! use cfetch_config::ConfluenceConfig;
//! use cfetch_confluence::{BodyFormat, ConfluenceFetcher};
//!
//! let fetcher = ConfluenceFetcher::from_config(&config)?;
//! match fetcher.comments().inline_comments("123456", BodyFormat::Markdown) {
//!     Ok(comments) => println!("{} comments", comments.len()),
//!     Err(partial) => {
//!         eprintln!("{partial}");
//!         let comments = partial.into_partial();
//!     }
//! }
//! ```

// API client and transport
mod client;
pub use client::{ApiRequest, ConfluenceClient, HttpTransport, Method, Transport};
#[cfg(any(test, feature = "mock"))]
pub use client::MockTransport;

// Facade
mod fetcher;
pub use fetcher::ConfluenceFetcher;

// Result models
pub mod models;
pub use models::{
    CommentAuthor, CommentLocation, ConfluenceComment, ConfluenceLabel, ConfluencePage,
    ConfluenceSpace, ConfluenceUser, InlineAnchor, SearchResult,
};

// Pagination (internal)
mod pagination;

// Storage format preprocessing
pub mod preprocess;
pub use preprocess::{
    BodyFormat, ContentPreprocessor, PageContext, ProcessedContent, StoragePreprocessor,
};

// Resource services
pub mod services;

// Types (internal, exposed via models)
mod types;
mod url;

// Errors
pub mod error;
pub use error::{ConfluenceError, FetchStage, PartialFetch, PreprocessError};
