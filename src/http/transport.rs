//! Transport capability and its reqwest implementation.
//!
//! # Responsibilities
//! - Define the seam between the gateway and the network (`Transport`)
//! - Execute requests over HTTP with timeouts and default headers
//! - Surface network and HTTP failures as `TransportError`, untranslated
//!
//! # Design Decisions
//! - Bodies are decoded as JSON; an empty body decodes to `Value::Null`
//! - Non-2xx responses are errors carrying status and raw body
//! - No retries at this layer

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::ApiConfig;
use crate::encoding::{FormFieldValue, FormPayload};
use crate::http::request::{ApiRequest, RequestBody, X_REQUEST_ID};
use crate::observability::metrics;

/// Errors raised while talking to the remote API.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    /// The request URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A configured or caller-supplied header is malformed.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Connection, TLS or I/O failure.
    #[error("Request failed: {0}")]
    Request(String),

    /// The request did not complete in time.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("Server returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("Failed to decode response body: {0}")]
    Decode(String),
}

impl TransportError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::InvalidUrl(_) => "invalid_url",
            TransportError::InvalidHeader(_) => "invalid_header",
            TransportError::Request(_) => "request",
            TransportError::Timeout => "timeout",
            TransportError::Status { .. } => "status",
            TransportError::Decode(_) => "decode",
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Sends a resolved request and returns the decoded response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> TransportResult<Value>;
}

/// HTTP transport backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport from API configuration.
    pub fn new(config: &ApiConfig) -> TransportResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        for (name, value) in &config.default_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::InvalidHeader(format!("{}: {}", name, e)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::InvalidHeader(format!("{}: {}", name, e)))?;
            headers.insert(header_name, header_value);
        }

        if let Some(token) = &config.bearer_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| TransportError::InvalidHeader("authorization token".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client })
    }

    /// Wrap an existing client, e.g. one shared with other subsystems.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn execute(&self, request: ApiRequest) -> TransportResult<Value> {
        let url: url::Url = request
            .url
            .parse()
            .map_err(|e| TransportError::InvalidUrl(format!("'{}': {}", request.url, e)))?;

        let mut builder = self
            .client
            .request(request.method.into(), url)
            .header(X_REQUEST_ID, request.id.to_string());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(form) => builder.multipart(to_multipart(form)?),
        };

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> TransportResult<Value> {
        let method = request.method;
        let request_id = request.id;
        let started = Instant::now();

        let result = self.execute(request).await;
        let elapsed = started.elapsed();

        match &result {
            Ok(_) => metrics::record_request(method, "ok", elapsed),
            Err(e) => {
                tracing::warn!(request_id = %request_id, method = %method, error = %e, "API request failed");
                metrics::record_request(method, e.kind(), elapsed);
            }
        }

        result
    }
}

fn to_multipart(payload: FormPayload) -> TransportResult<Form> {
    let mut form = Form::new();

    for field in payload {
        form = match field.value {
            FormFieldValue::Text(text) => form.text(field.name, text),
            FormFieldValue::File(file) => {
                let (file_name, bytes, mime_type) = file.into_parts();
                let mut part = Part::bytes(bytes).file_name(file_name);
                if let Some(mime) = mime_type {
                    part = part
                        .mime_str(&mime)
                        .map_err(|e| TransportError::InvalidHeader(format!("content type '{}': {}", mime, e)))?;
                }
                form.part(field.name, part)
            }
        };
    }

    Ok(form)
}
