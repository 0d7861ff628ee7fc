//! Credential provider trait.

use std::fmt::Debug;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::{Error, Result};

/// Source of the bearer token attached to API requests.
#[async_trait]
pub trait CredentialProvider: Send + Sync + Debug {
    /// Provider name for debugging.
    fn name(&self) -> &str;

    /// Current bearer token, obtaining a new one first if needed.
    async fn access_token(&self) -> Result<SecretString>;

    /// Whether this provider can obtain a fresh token on its own.
    fn supports_refresh(&self) -> bool {
        false
    }

    /// Discard any cached token and obtain a new one.
    async fn refresh(&self) -> Result<()> {
        Err(Error::authentication("Refresh not supported"))
    }

    /// Invalidate the current token server-side. Never fails.
    async fn logout(&self) {}
}
