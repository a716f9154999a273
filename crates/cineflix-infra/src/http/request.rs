//! JSON request wrapper around `reqwest`.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Upper bound on a whole outbound call, connect through body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from [`HttpClient::make_request`].
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Non-success status. `message` is the server's `message`/`error`
    /// field when it sent one.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid JSON response: {0}")]
    Decode(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl RequestError {
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// One outbound call. Built once, then only read.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    url: String,
    method: Method,
    body: Option<Value>,
    headers: Vec<(String, String)>,
    token: Option<String>,
}

impl RequestConfig {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            body: None,
            headers: Vec::new(),
            token: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Body to put on the wire. Always `None` for GET and HEAD.
    pub fn body_for_send(&self) -> Option<&Value> {
        if self.method == Method::GET || self.method == Method::HEAD {
            return None;
        }
        self.body.as_ref()
    }

    /// `Content-Type: application/json`, then caller headers (caller wins),
    /// then the bearer token.
    fn header_map(&self) -> Result<HeaderMap, RequestError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| RequestError::InvalidHeader(e.to_string()))?;
            let value =
                HeaderValue::from_str(value).map_err(|e| RequestError::InvalidHeader(e.to_string()))?;
            headers.insert(name, value);
        }

        if let Some(token) = &self.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| RequestError::InvalidHeader(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }
}

/// `reqwest` client bounded by [`DEFAULT_TIMEOUT`].
pub(crate) fn default_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to reqwest defaults without a timeout");
            reqwest::Client::new()
        })
}

/// Shared HTTP client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: default_client(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RequestError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Perform the call and parse the JSON response.
    ///
    /// `Ok(None)` for `204 No Content` and for HEAD. Any non-success status
    /// is an error.
    pub async fn make_request(&self, config: &RequestConfig) -> Result<Option<Value>, RequestError> {
        tracing::debug!(method = %config.method, url = %config.url, "Outbound request");

        let mut request = self
            .client
            .request(config.method.clone(), &config.url)
            .headers(config.header_map()?);

        if let Some(body) = config.body_for_send() {
            let bytes = serde_json::to_vec(body).map_err(|e| RequestError::Decode(e.to_string()))?;
            request = request.body(bytes);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))?;
        let status = response.status();

        if !status.is_success() {
            let fallback = format!("Request failed with status {}", status.as_u16());
            let message = match response.json::<Value>().await {
                Ok(body) => error_description(&body).unwrap_or(fallback),
                Err(_) => fallback,
            };
            tracing::debug!(status = status.as_u16(), %message, "Request failed");
            return Err(RequestError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT || config.method == Method::HEAD {
            return Ok(None);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| RequestError::Decode(e.to_string()))
    }
}

/// `message`, else `error`, when present and non-empty.
fn error_description(body: &Value) -> Option<String> {
    ["message", "error"].iter().find_map(|field| {
        body.get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from)
    })
}
