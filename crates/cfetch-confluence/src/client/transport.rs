//! HTTP transport for Confluence REST calls.

use std::fmt;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cfetch_config::Credentials;
use serde_json::Value;
use tracing::info;
use ureq::{Agent, RequestBuilder};

use crate::error::ConfluenceError;

/// HTTP method of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        })
    }
}

/// A single JSON API request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL, possibly already carrying a query string.
    pub url: String,
    /// Extra query parameters appended to `url`.
    pub query: Vec<(String, String)>,
    /// JSON body for `POST`/`PUT`.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// A `GET` request.
    pub fn get(url: impl Into<String>, query: &[(&str, String)]) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_owned(), v.clone()))
                .collect(),
            body: None,
        }
    }

    /// A request with a JSON body.
    pub fn with_body(method: Method, url: impl Into<String>, body: Value) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Value of a query parameter, if set.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Executes API requests and returns decoded JSON.
///
/// Implementations must map error statuses to
/// [`ConfluenceError::HttpResponse`]. An empty response body decodes to
/// [`Value::Null`].
pub trait Transport: Send + Sync {
    /// Execute one request.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, error status, or invalid JSON.
    fn execute(&self, request: &ApiRequest) -> Result<Value, ConfluenceError>;
}

/// Blocking `ureq` transport with a fixed per-request timeout.
pub struct HttpTransport {
    agent: Agent,
    authorization: String,
}

impl HttpTransport {
    /// Create a transport authenticating with `credentials`.
    #[must_use]
    pub fn new(credentials: &Credentials, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            authorization: authorization_header(credentials),
        }
    }

    fn prepare<B>(&self, builder: RequestBuilder<B>, request: &ApiRequest) -> RequestBuilder<B> {
        let mut builder = builder
            .header("Authorization", &self.authorization)
            .header("Accept", "application/json");
        for (key, value) in &request.query {
            builder = builder.query(key, value);
        }
        builder
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &ApiRequest) -> Result<Value, ConfluenceError> {
        info!("{} {}", request.method, request.url);

        let null = Value::Null;
        let body = request.body.as_ref().unwrap_or(&null);
        let response = match request.method {
            Method::Get => self.prepare(self.agent.get(&request.url), request).call()?,
            Method::Post => self
                .prepare(self.agent.post(&request.url), request)
                .send_json(body)?,
            Method::Put => self
                .prepare(self.agent.put(&request.url), request)
                .send_json(body)?,
        };

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(ConfluenceError::HttpResponse {
                status,
                body: error_body,
            });
        }

        let text = body_reader.read_to_string()?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Build the `Authorization` header value for `credentials`.
pub(crate) fn authorization_header(credentials: &Credentials) -> String {
    match credentials {
        Credentials::Basic {
            username,
            api_token,
        } => format!("Basic {}", STANDARD.encode(format!("{username}:{api_token}"))),
        Credentials::PersonalToken(token) => format!("Bearer {token}"),
    }
}
