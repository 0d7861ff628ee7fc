//! Nexla API client and request pipeline.

pub mod config;
pub mod error;
pub mod operations;
pub mod request;
pub mod resilience;
pub(crate) mod response;
pub mod transport;

pub use config::{
    ClientConfig, CredentialSource, DEFAULT_API_VERSION, DEFAULT_BASE_URL,
    DEFAULT_TOKEN_REFRESH_MARGIN,
};
pub use error::{ApiError, ErrorContext, ErrorKind};
pub use operations::{Operation, OperationId};
pub use request::{RequestOptions, SKIP_AUTH_HEADER};
pub use resilience::{ExponentialBackoff, RetryConfig, RetryingTransport};
pub use transport::HttpTransport;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::Value;

use crate::auth::{AccessTokenProvider, CredentialProvider, ServiceKeyProvider};
use crate::resources::{
    CredentialsResource, DestinationsResource, FlowsResource, NexsetsResource, SelfSignupResource,
    SourcesResource, TokensResource, UsersResource,
};
use crate::{Error, Result};

/// Client for the Nexla REST API.
///
/// Every call goes through the same pipeline: build the request, attach a
/// bearer token, send it through the retrying transport, then decode the body
/// or map the failure onto an [`ApiError`]. An authentication failure with a
/// renewable credential triggers exactly one refresh and replay.
///
/// Clones share the credential provider and therefore the session token.
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    credentials: Arc<dyn CredentialProvider>,
    transport: Arc<RetryingTransport>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Sends `method path` and returns the decoded body.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value> {
        self.execute_with_auth_retry(&method, path, &options, None)
            .await
    }

    /// Same as [`execute`](Self::execute), tagging failures with the operation.
    pub async fn execute_named(
        &self,
        operation: OperationId,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value> {
        tracing::trace!(operation = %operation, "Executing operation");
        self.execute_with_auth_retry(&method, path, &options, Some(operation))
            .await
    }

    /// Executes a declared operation and decodes its result.
    pub async fn call<O: Operation>(&self, options: RequestOptions) -> Result<O::Output> {
        let options = if O::SKIP_AUTH {
            options.skip_auth()
        } else {
            options
        };
        let value = self
            .execute_named(O::ID, O::METHOD, O::PATH, options)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Ends the server-side session. Never fails.
    pub async fn logout(&self) {
        self.credentials.logout().await
    }

    /// Forces a new token exchange. Errors for fixed tokens.
    pub async fn refresh_credentials(&self) -> Result<()> {
        self.credentials.refresh().await
    }

    pub fn credentials(&self) -> &dyn CredentialProvider {
        self.credentials.as_ref()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn flows(&self) -> FlowsResource<'_> {
        FlowsResource::new(self)
    }

    pub fn sources(&self) -> SourcesResource<'_> {
        SourcesResource::new(self)
    }

    pub fn destinations(&self) -> DestinationsResource<'_> {
        DestinationsResource::new(self)
    }

    pub fn nexsets(&self) -> NexsetsResource<'_> {
        NexsetsResource::new(self)
    }

    pub fn data_credentials(&self) -> CredentialsResource<'_> {
        CredentialsResource::new(self)
    }

    pub fn users(&self) -> UsersResource<'_> {
        UsersResource::new(self)
    }

    pub fn tokens(&self) -> TokensResource<'_> {
        TokensResource::new(self)
    }

    pub fn self_signup(&self) -> SelfSignupResource<'_> {
        SelfSignupResource::new(self)
    }

    async fn execute_with_auth_retry(
        &self,
        method: &Method,
        path: &str,
        options: &RequestOptions,
        operation: Option<OperationId>,
    ) -> Result<Value> {
        match self.send_once(method, path, options, operation).await {
            Err(e)
                if e.is_unauthorized()
                    && !options.skips_auth()
                    && self.credentials.supports_refresh() =>
            {
                tracing::debug!(
                    method = %method,
                    path,
                    provider = self.credentials.name(),
                    "Received 401, refreshing credentials"
                );
                self.credentials.refresh().await?;
                self.send_once(method, path, options, operation).await
            }
            other => other,
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        options: &RequestOptions,
        operation: Option<OperationId>,
    ) -> Result<Value> {
        let prepared = request::prepare(&self.config, method, path, options)?;
        let mut request = prepared.request;

        if !prepared.skip_auth {
            let token = self.credentials.access_token().await?;
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| Error::authentication("Access token contains invalid characters"))?;
            value.set_sensitive(true);
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        let response = self.transport.send(request).await?;
        let status = response.status();
        if status.is_success() {
            return response::read_payload(response).await;
        }

        let headers = response.headers().clone();
        let url = response.url().to_string();
        let body = response::read_error_body(response).await;

        let mut context = ErrorContext::request(method, path, &url);
        context.operation = operation.map(|op| op.as_str().to_string());

        let error = ApiError::from_response(status, &headers, body, context);
        tracing::debug!(
            status = status.as_u16(),
            kind = error.kind.name(),
            method = %method,
            path,
            "Request failed"
        );
        Err(error.into())
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.config.base_url)
            .field("api_version", &self.config.api_version)
            .field("credentials", &self.credentials.name())
            .finish()
    }
}

/// Builder for [`Client`].
///
/// Exactly one of [`service_key`](Self::service_key) or
/// [`access_token`](Self::access_token) must be supplied.
#[derive(Default)]
pub struct ClientBuilder {
    service_key: Option<String>,
    access_token: Option<String>,
    base_url: Option<String>,
    api_version: Option<String>,
    token_refresh_margin: Option<Duration>,
    retry: Option<RetryConfig>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl ClientBuilder {
    /// Seeds the builder from `NEXLA_SERVICE_KEY`, `NEXLA_ACCESS_TOKEN` and
    /// `NEXLA_API_URL`. Later builder calls override these.
    pub fn from_env() -> Self {
        crate::config::EnvSettings::from_env().apply(Self::default())
    }

    /// Long-lived service key, exchanged for renewable session tokens.
    pub fn service_key(mut self, key: impl Into<String>) -> Self {
        self.service_key = Some(key.into());
        self
    }

    /// Fixed bearer token. It is never refreshed.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Renew the session token once less than `margin` of its lifetime remains.
    pub fn token_refresh_margin(mut self, margin: Duration) -> Self {
        self.token_refresh_margin = Some(margin);
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Timeout of the default HTTP client. Ignored with a custom transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replaces the HTTP send primitive. Used for API calls (behind the retry
    /// layer) as well as the token exchange and logout.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<Client> {
        let credential = CredentialSource::resolve(self.service_key, self.access_token)?;

        let mut config = ClientConfig::new(credential);
        if let Some(url) = self.base_url {
            config.base_url = config::normalize_base_url(&url);
        }
        if let Some(version) = self.api_version {
            config.api_version = version;
        }
        if let Some(margin) = self.token_refresh_margin {
            config.token_refresh_margin = margin;
        }
        if let Some(retry) = self.retry {
            config.retry = retry;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        config.user_agent = self.user_agent;
        config.validate()?;

        let base: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                reqwest::Client::builder()
                    .timeout(config.timeout)
                    .build()
                    .map_err(Error::Network)?,
            ),
        };

        let credentials: Arc<dyn CredentialProvider> = match config.credential {
            CredentialSource::ServiceKey(_) => Arc::new(
                ServiceKeyProvider::new(config.credential.expose(), Arc::clone(&base))
                    .with_base_url(&config.base_url)
                    .with_api_version(config.api_version.clone())
                    .with_refresh_margin(config.token_refresh_margin)
                    .with_user_agent(config.user_agent.clone()),
            ),
            CredentialSource::AccessToken(_) => {
                Arc::new(AccessTokenProvider::new(config.credential.expose())?)
            }
        };

        let transport = RetryingTransport::new(base, config.retry.clone());

        Ok(Client {
            config: Arc::new(config),
            credentials,
            transport: Arc::new(transport),
        })
    }
}
