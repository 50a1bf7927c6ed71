//! Typed results handed to callers.
//!
//! Each model is built once from the named fields of a decoded response and
//! never mutated afterwards.

mod comment;
mod page;
mod search;
mod space;
mod user;

pub use comment::{CommentAuthor, CommentLocation, ConfluenceComment, InlineAnchor};
pub use page::ConfluencePage;
pub use search::SearchResult;
pub use space::{ConfluenceLabel, ConfluenceSpace};
pub use user::ConfluenceUser;
