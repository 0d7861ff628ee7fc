//! Environment variable settings.
//!
//! Read once into an [`EnvSettings`] snapshot and applied to a builder.
//! Environment variables are treated as immutable at runtime; tests use
//! [`EnvSettings::from_lookup`] instead of mutating the process environment.

use crate::client::ClientBuilder;

pub const SERVICE_KEY_VAR: &str = "NEXLA_SERVICE_KEY";
pub const ACCESS_TOKEN_VAR: &str = "NEXLA_ACCESS_TOKEN";
pub const API_URL_VAR: &str = "NEXLA_API_URL";

/// Snapshot of the `NEXLA_*` variables. Empty values count as unset.
#[derive(Clone, Default)]
pub struct EnvSettings {
    pub service_key: Option<String>,
    pub access_token: Option<String>,
    pub api_url: Option<String>,
}

impl std::fmt::Debug for EnvSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSettings")
            .field("service_key", &self.service_key.as_ref().map(|_| "[REDACTED]"))
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl EnvSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|value| !value.is_empty());
        Self {
            service_key: read(SERVICE_KEY_VAR),
            access_token: read(ACCESS_TOKEN_VAR),
            api_url: read(API_URL_VAR),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.service_key.is_none() && self.access_token.is_none() && self.api_url.is_none()
    }

    /// Seeds `builder` with every variable that is set.
    pub fn apply(self, mut builder: ClientBuilder) -> ClientBuilder {
        if let Some(key) = self.service_key {
            builder = builder.service_key(key);
        }
        if let Some(token) = self.access_token {
            builder = builder.access_token(token);
        }
        if let Some(url) = self.api_url {
            builder = builder.base_url(url);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::Error;

    fn settings(vars: &[(&str, &str)]) -> EnvSettings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvSettings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_reads_variables() {
        let env = settings(&[
            (SERVICE_KEY_VAR, "key"),
            (API_URL_VAR, "https://custom.example/nexla-api/"),
        ]);
        assert_eq!(env.service_key.as_deref(), Some("key"));
        assert!(env.access_token.is_none());

        let client = env.apply(ClientBuilder::default()).build().unwrap();
        assert_eq!(client.config().base_url, "https://custom.example/nexla-api");
        assert!(client.credentials().supports_refresh());
    }

    #[test]
    fn test_empty_values_ignored() {
        let env = settings(&[(ACCESS_TOKEN_VAR, ""), (API_URL_VAR, "")]);
        assert!(env.is_empty());
    }

    #[test]
    fn test_both_credentials_rejected() {
        let env = settings(&[(SERVICE_KEY_VAR, "key"), (ACCESS_TOKEN_VAR, "token")]);
        let err = env.apply(ClientBuilder::default()).build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let env = settings(&[(SERVICE_KEY_VAR, "very-secret")]);
        assert!(!format!("{env:?}").contains("very-secret"));
    }
}
