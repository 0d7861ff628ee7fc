//! Fixed access token provider.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::auth::CredentialProvider;
use crate::{Error, Result};

/// Provider with an explicitly supplied, non-renewable bearer token.
#[derive(Debug)]
pub struct AccessTokenProvider {
    token: SecretString,
}

impl AccessTokenProvider {
    /// Fails when the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token: String = token.into();
        if token.is_empty() {
            return Err(Error::authentication("Access token must be provided"));
        }
        Ok(Self {
            token: SecretString::from(token),
        })
    }
}

#[async_trait]
impl CredentialProvider for AccessTokenProvider {
    fn name(&self) -> &str {
        "access_token"
    }

    async fn access_token(&self) -> Result<SecretString> {
        Ok(SecretString::from(self.token.expose_secret()))
    }

    async fn refresh(&self) -> Result<()> {
        Err(Error::authentication(
            "Direct access tokens cannot be refreshed",
        ))
    }
}
