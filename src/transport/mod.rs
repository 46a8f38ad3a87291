//! HTTP transport seam.
//!
//! The client only needs one primitive: POST a JSON body and get back the
//! status, headers and body. [`HttpTransport`] implements it with `reqwest`;
//! tests swap in their own [`Transport`].

mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// A JSON POST to send.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub body: Value,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Request carrying the two headers every inference call sends.
    pub fn json_post(url: impl Into<String>, body: Value, api_key: &str) -> Self {
        Self {
            url: url.into(),
            body,
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), api_key.to_string()),
            ],
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A received response, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub url: String,
    pub status: u16,
    pub headers: HashMap<String, String>,
    /// Parsed JSON, or the raw text as a JSON string when the body is not JSON.
    pub body: Value,
}

impl HttpResponse {
    pub fn new(url: impl Into<String>, status: u16, body: Value) -> Self {
        Self {
            url: url.into(),
            status,
            headers: HashMap::new(),
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Sends inference requests. Only connection-level failures are errors;
/// a non-200 status is still an `Ok` response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
