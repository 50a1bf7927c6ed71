//! Scripted transport for tests.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use super::transport::{ApiRequest, Transport};
use crate::error::ConfluenceError;

/// Transport that replays scripted responses in order and records requests.
///
/// When the script runs out every further request fails with a 404.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Value, ConfluenceError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    /// Create a transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful JSON response.
    #[must_use]
    pub fn with_json(self, value: Value) -> Self {
        self.push(Ok(value));
        self
    }

    /// Queue an error status response.
    #[must_use]
    pub fn with_status(self, status: u16, body: &str) -> Self {
        self.push(Err(ConfluenceError::HttpResponse {
            status,
            body: body.to_owned(),
        }));
        self
    }

    /// Queue an arbitrary result.
    pub fn push(&self, response: Result<Value, ConfluenceError>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }

    /// Requests executed so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// URLs requested so far, in order.
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &ApiRequest) -> Result<Value, ConfluenceError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                Err(ConfluenceError::HttpResponse {
                    status: 404,
                    body: format!("no scripted response for {}", request.url),
                })
            })
    }
}
