//! Typed API errors and the status-code mapping table.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde_json::{Value, json};

/// Closed set of error kinds produced from API responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// 401, or a failed token exchange.
    Authentication,
    /// 403
    Authorization,
    /// 404
    NotFound,
    /// 400 and 422
    Validation,
    /// 429
    RateLimit {
        /// Parsed from the `Retry-After` response header.
        retry_after: Option<Duration>,
    },
    /// 409
    Conflict,
    /// 5xx
    Server,
    /// Any other non-success status, or a malformed platform response.
    Generic,
}

impl ErrorKind {
    /// Maps a final HTTP status onto its kind. `Retry-After` is only
    /// consulted for 429.
    pub fn from_status(status: u16, headers: &HeaderMap) -> Self {
        match status {
            401 => Self::Authentication,
            403 => Self::Authorization,
            404 => Self::NotFound,
            409 => Self::Conflict,
            400 | 422 => Self::Validation,
            429 => Self::RateLimit {
                retry_after: parse_retry_after(headers),
            },
            s if s >= 500 => Self::Server,
            _ => Self::Generic,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::RateLimit { .. } => "rate_limit",
            Self::Conflict => "conflict",
            Self::Server => "server",
            Self::Generic => "generic",
        }
    }

    pub(crate) fn default_message(&self) -> &'static str {
        match self {
            Self::Authentication => "Authentication failed",
            Self::Authorization => "Authorization failed",
            Self::NotFound => "Resource not found",
            Self::Validation => "Validation failed",
            Self::RateLimit { .. } => "Rate limit exceeded",
            Self::Conflict => "Resource conflict",
            Self::Server => "Server error",
            Self::Generic => "Request failed",
        }
    }
}

/// Where a failed request was headed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    pub operation: Option<String>,
    /// Uppercased HTTP method.
    pub method: Option<String>,
    pub path: Option<String>,
    pub url: Option<String>,
}

impl ErrorContext {
    pub fn request(method: &reqwest::Method, path: &str, url: &str) -> Self {
        Self {
            operation: None,
            method: Some(method.as_str().to_uppercase()),
            path: Some(path.to_string()),
            url: Some(url.to_string()),
        }
    }

    pub fn operation(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }
}

/// Error raised for a non-success API response.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: Option<u16>,
    /// Parsed JSON body, or the raw text when the body was not JSON.
    pub body: Option<Value>,
    pub context: ErrorContext,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            body: None,
            context: ErrorContext::default(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = context;
        self
    }

    /// Builds the typed error for a completed non-success response.
    pub fn from_response(
        status: StatusCode,
        headers: &HeaderMap,
        body: Option<Value>,
        context: ErrorContext,
    ) -> Self {
        let code = status.as_u16();
        let kind = ErrorKind::from_status(code, headers);
        let message = extract_message(body.as_ref(), status)
            .unwrap_or_else(|| format!("Request failed with status {code}"));

        Self::new(kind, message)
            .with_status(code)
            .with_body(body)
            .with_context(context)
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self.kind {
            ErrorKind::RateLimit { retry_after } => retry_after,
            _ => None,
        }
    }

    pub fn is_authentication(&self) -> bool {
        self.kind == ErrorKind::Authentication
    }

    /// Flat JSON view of the error, for logs and diagnostics.
    pub fn summary(&self) -> Value {
        json!({
            "kind": self.kind.name(),
            "message": self.message,
            "status_code": self.status,
            "operation": self.context.operation,
            "context": {
                "method": self.context.method,
                "path": self.context.path,
                "url": self.context.url,
                "status_code": self.status,
            },
            "retry_after": self.retry_after().map(|d| d.as_secs_f64()),
            "response": self.body,
        })
    }
}

/// `message`, then `error`, then the status line text.
pub(crate) fn extract_message(body: Option<&Value>, status: StatusCode) -> Option<String> {
    if let Some(Value::Object(map)) = body {
        if let Some(Value::String(message)) = map.get("message") {
            return Some(message.clone());
        }
        if let Some(Value::String(error)) = map.get("error") {
            return Some(error.clone());
        }
    }
    status.canonical_reason().map(str::to_string)
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?;
    parse_seconds(value)
}

/// Parses a non-negative number of seconds, as sent in `Retry-After`.
pub(crate) fn parse_seconds(value: &str) -> Option<Duration> {
    let secs: f64 = value.trim().parse().ok()?;
    if secs < 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(secs).ok()
}
