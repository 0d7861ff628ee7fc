//! # nexla-sdk
//!
//! Typed Rust client for the Nexla data-integration REST API.
//!
//! The client turns declared API operations into async methods, keeps the
//! session token fresh behind the scenes, retries transient failures, and maps
//! every error response onto a closed set of [`ErrorKind`]s.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nexla_sdk::{Client, RequestOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), nexla_sdk::Error> {
//!     let client = Client::builder()
//!         .service_key("my-service-key")
//!         .build()?;
//!
//!     let sources = client.sources().list(RequestOptions::new().query("page", 1)).await?;
//!     println!("{} sources", sources.len());
//!
//!     let flow = client
//!         .execute(
//!             reqwest::Method::GET,
//!             "/flows/{flow_id}",
//!             RequestOptions::new().path_param("flow_id", 42),
//!         )
//!         .await?;
//!     println!("{flow}");
//!
//!     client.logout().await;
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod auth;
pub mod client;
pub mod config;
pub mod prelude;
pub mod resources;

pub use auth::{AccessTokenProvider, CachedToken, CredentialProvider, ServiceKeyProvider};
pub use client::{
    ApiError, Client, ClientBuilder, ClientConfig, CredentialSource, DEFAULT_API_VERSION,
    DEFAULT_BASE_URL, ErrorContext, ErrorKind, ExponentialBackoff, HttpTransport, Operation,
    OperationId, RequestOptions, RetryConfig, RetryingTransport, SKIP_AUTH_HEADER,
};
pub use config::EnvSettings;

/// Error type for nexla-sdk operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The API answered with a non-success status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No response was obtained, even after transport retries.
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request parameters are invalid.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Error::Api(ApiError::new(ErrorKind::Authentication, message))
    }

    /// Taxonomy kind, for errors produced from an API response.
    pub fn kind(&self) -> Option<&ErrorKind> {
        match self {
            Error::Api(e) => Some(&e.kind),
            _ => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api(e) => e.status,
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.kind(), Some(ErrorKind::Authentication))
    }

    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self.kind() {
            Some(ErrorKind::RateLimit { retry_after }) => *retry_after,
            _ => None,
        }
    }
}

/// Result type for nexla-sdk operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_helpers() {
        let err = Error::authentication("bad token");
        assert!(err.is_unauthorized());
        assert_eq!(err.kind(), Some(&ErrorKind::Authentication));
        assert_eq!(err.status_code(), None);

        let err = Error::config("missing credential");
        assert!(!err.is_unauthorized());
        assert!(err.kind().is_none());
        assert!(err.to_string().contains("missing credential"));
    }

    #[test]
    fn test_rate_limit_retry_after() {
        let err = Error::Api(ApiError::new(
            ErrorKind::RateLimit {
                retry_after: Some(std::time::Duration::from_secs(7)),
            },
            "slow down",
        ));
        assert_eq!(err.retry_after(), Some(std::time::Duration::from_secs(7)));
        assert_eq!(err.to_string(), "slow down");
    }
}
