//! Client configuration.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use super::resilience::RetryConfig;
use crate::{Error, Result};

/// Default Nexla API base URL.
pub const DEFAULT_BASE_URL: &str = "https://dataops.nexla.io/nexla-api";
pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(3600);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Versioned media type sent as `Accept`.
pub fn accept_header(api_version: &str) -> String {
    format!("application/vnd.nexla.api.{api_version}+json")
}

pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// How the client authenticates.
#[derive(Clone)]
pub enum CredentialSource {
    /// Long-lived key exchanged for renewable session tokens.
    ServiceKey(SecretString),
    /// Fixed bearer token.
    AccessToken(SecretString),
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ServiceKey(_) => f.write_str("ServiceKey([REDACTED])"),
            Self::AccessToken(_) => f.write_str("AccessToken([REDACTED])"),
        }
    }
}

impl CredentialSource {
    /// Exactly one of the two must be supplied.
    pub fn resolve(service_key: Option<String>, access_token: Option<String>) -> Result<Self> {
        match (service_key, access_token) {
            (Some(_), Some(_)) => Err(Error::config(
                "Cannot provide both serviceKey and accessToken.",
            )),
            (None, None) => Err(Error::config(
                "Either serviceKey or accessToken must be provided (or set NEXLA_SERVICE_KEY/NEXLA_ACCESS_TOKEN).",
            )),
            (Some(key), None) => Ok(Self::ServiceKey(SecretString::from(key))),
            (None, Some(token)) => Ok(Self::AccessToken(SecretString::from(token))),
        }
    }

    pub fn is_renewable(&self) -> bool {
        matches!(self, Self::ServiceKey(_))
    }

    pub(crate) fn expose(&self) -> &str {
        match self {
            Self::ServiceKey(s) | Self::AccessToken(s) => s.expose_secret(),
        }
    }
}

/// Fully-resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credential: CredentialSource,
    /// Base URL without trailing slash.
    pub base_url: String,
    pub api_version: String,
    pub token_refresh_margin: Duration,
    pub retry: RetryConfig,
    pub user_agent: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(credential: CredentialSource) -> Self {
        Self {
            credential,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            token_refresh_margin: DEFAULT_TOKEN_REFRESH_MARGIN,
            retry: RetryConfig::default(),
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn accept_header(&self) -> String {
        accept_header(&self.api_version)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("invalid base URL '{}': {e}", self.base_url)))?;
        if self.api_version.is_empty() {
            return Err(Error::config("API version must not be empty"));
        }
        self.retry.validate()
    }
}
