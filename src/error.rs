//! 错误类型：本地校验错误与按 HTTP 状态码分类的 API 错误。
//!
//! Error taxonomy for the OxAPI client.
//!
//! Local precondition failures (missing API key, unknown model, unsupported
//! output format) are separate variants of [`Error`]. Every non-200 response
//! becomes an [`ApiError`] record whose [`ApiErrorKind`] is derived from the
//! HTTP status.

use crate::catalog::Capability;
use crate::transport::{HttpResponse, TransportError};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Structured error context for configuration and response-shape errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "config.base_url", "result.results[2]")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "config_validator", "classification_formatter")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Classification of a non-200 response by its HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// 401: the API key was rejected.
    InvalidCredential,
    /// 403: the key is valid but may not call this endpoint.
    NotAllowed,
    /// 404: unknown endpoint, model or version.
    NotFound,
    /// Any other non-200 status.
    Other,
}

impl ApiErrorKind {
    /// Map an HTTP status to an error kind. `None` means success (200).
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200 => None,
            401 => Some(Self::InvalidCredential),
            403 => Some(Self::NotAllowed),
            404 => Some(Self::NotFound),
            _ => Some(Self::Other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredential => "invalid_credential",
            Self::NotAllowed => "not_allowed",
            Self::NotFound => "not_found",
            Self::Other => "api_error",
        }
    }
}

/// Immutable record of a failed API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// The `message` field of the response body, when present.
    pub message: Option<String>,
    pub http_status: u16,
    /// Parsed JSON body, or the raw text as a JSON string.
    pub http_body: Value,
    pub headers: HashMap<String, String>,
    /// URL of the failed request.
    pub url: String,
}

impl ApiError {
    /// Build an error record from a received response. Returns `None` for status 200.
    pub fn from_response(response: &HttpResponse) -> Option<Self> {
        let kind = ApiErrorKind::from_status(response.status)?;
        let message = match &response.body {
            Value::Object(map) => match map.get("message") {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(other) => Some(other.to_string()),
            },
            Value::String(raw) if !raw.is_empty() => Some(raw.clone()),
            _ => None,
        };
        Some(Self {
            kind,
            message,
            http_status: response.status,
            http_body: response.body.clone(),
            headers: response.headers.clone(),
            url: response.url.clone(),
        })
    }

    /// The message, or a placeholder when the body carried none.
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or("<empty message>")
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error code: {}, Error message: {}",
            self.http_status,
            self.message()
        )
    }
}

impl std::error::Error for ApiError {}

/// Unified error type for the OxAPI client.
#[derive(Debug, Error)]
pub enum Error {
    /// No API key is configured. Raised before any network I/O.
    #[error("Invalid API key: {message}")]
    InvalidApiKey { message: String },

    /// The API answered with a non-200 status.
    #[error("{0}")]
    Api(ApiError),

    #[error("'{model}' is not a valid model for OxAPI {capability}. Available models are {available:?}")]
    ModelNotFound {
        capability: Capability,
        model: String,
        available: Vec<&'static str>,
    },

    #[error("'{format}' is not a valid format for the output. Available formats: {available:?}")]
    InvalidFormat {
        format: String,
        available: Vec<&'static str>,
    },

    #[error("Unexpected response shape: {message}{}", format_context(.context))]
    UnexpectedResponse {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Api(err)
    }
}

impl Error {
    pub fn invalid_api_key(msg: impl Into<String>) -> Self {
        Error::InvalidApiKey {
            message: msg.into(),
        }
    }

    pub fn model_not_found(
        capability: Capability,
        model: impl Into<String>,
        available: Vec<&'static str>,
    ) -> Self {
        Error::ModelNotFound {
            capability,
            model: model.into(),
            available,
        }
    }

    pub fn invalid_format(format: impl Into<String>, available: Vec<&'static str>) -> Self {
        Error::InvalidFormat {
            format: format.into(),
            available,
        }
    }

    pub fn unexpected_response_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::UnexpectedResponse {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::UnexpectedResponse { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// The API error record, for errors that came back from the server.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }

    pub fn http_status(&self) -> Option<u16> {
        self.api_error().map(|e| e.http_status)
    }

    /// True for a missing key (local) and for a 401 from the server.
    pub fn is_invalid_credential(&self) -> bool {
        match self {
            Error::InvalidApiKey { .. } => true,
            Error::Api(err) => err.kind == ApiErrorKind::InvalidCredential,
            _ => false,
        }
    }

    pub fn is_not_allowed(&self) -> bool {
        matches!(self, Error::Api(err) if err.kind == ApiErrorKind::NotAllowed)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api(err) if err.kind == ApiErrorKind::NotFound)
    }

    pub fn is_model_not_found(&self) -> bool {
        matches!(self, Error::ModelNotFound { .. })
    }

    pub fn is_invalid_format(&self) -> bool {
        matches!(self, Error::InvalidFormat { .. })
    }
}
