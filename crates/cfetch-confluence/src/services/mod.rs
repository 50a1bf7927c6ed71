//! Resource services.
//!
//! Each service borrows the shared [`ConfluenceClient`](crate::ConfluenceClient)
//! and covers one resource category. Obtain them from
//! [`ConfluenceFetcher`](crate::ConfluenceFetcher).

mod comments;
mod labels;
mod pages;
mod search;
mod spaces;
mod users;

pub use comments::Comments;
pub use labels::Labels;
pub use pages::{PageDraft, Pages};
pub use search::{Search, to_cql};
pub use spaces::Spaces;
pub use users::Users;

use serde_json::{Value, json};

/// `{"storage": {"value": ..., "representation": "storage"}}` request body.
fn storage_body(value: &str) -> Value {
    json!({
        "storage": {
            "value": value,
            "representation": "storage",
        }
    })
}
