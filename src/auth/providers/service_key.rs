//! Service key provider: exchanges a long-lived service key for session tokens.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::auth::{CachedToken, CredentialProvider};
use crate::client::config::{
    DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_TOKEN_REFRESH_MARGIN, accept_header,
    normalize_base_url,
};
use crate::client::error::extract_message;
use crate::client::response::read_json;
use crate::client::{ApiError, ErrorContext, ErrorKind, HttpTransport};
use crate::{Error, Result};

/// Token lifetime assumed when the exchange response omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: f64 = 86_400.0;

/// Renewable credential backed by a service key.
///
/// The session token is cached and exchanged again once its remaining
/// lifetime falls below the refresh margin. Exchanges are serialized: callers
/// arriving while one is in flight wait for it and reuse its token.
pub struct ServiceKeyProvider {
    service_key: SecretString,
    base_url: String,
    api_version: String,
    refresh_margin: Duration,
    user_agent: Option<String>,
    transport: Arc<dyn HttpTransport>,
    cache: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for ServiceKeyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceKeyProvider")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("refresh_margin", &self.refresh_margin)
            .finish()
    }
}

impl ServiceKeyProvider {
    pub fn new(service_key: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            service_key: SecretString::from(service_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            refresh_margin: DEFAULT_TOKEN_REFRESH_MARGIN,
            user_agent: None,
            transport,
            cache: Mutex::new(None),
        }
    }

    pub fn with_base_url(mut self, url: impl AsRef<str>) -> Self {
        self.base_url = normalize_base_url(url.as_ref());
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Expiry of the cached session token, if one is held.
    pub async fn token_expires_at(&self) -> Option<DateTime<Utc>> {
        self.cache.lock().await.as_ref().map(CachedToken::expires_at)
    }

    fn base_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, header_value(&accept_header(&self.api_version))?);
        if let Some(ref ua) = self.user_agent {
            headers.insert(USER_AGENT, header_value(ua)?);
        }
        Ok(headers)
    }

    fn post(&self, endpoint: &str, headers: HeaderMap) -> Result<reqwest::Request> {
        let url = format!("{}{}", self.base_url, endpoint);
        let url = url
            .parse()
            .map_err(|e| Error::config(format!("invalid base URL '{}': {e}", self.base_url)))?;
        let mut request = reqwest::Request::new(Method::POST, url);
        *request.headers_mut() = headers;
        Ok(request)
    }

    async fn exchange(&self) -> Result<CachedToken> {
        let mut headers = self.base_headers()?;
        let mut basic = header_value(&format!("Basic {}", self.service_key.expose_secret()))?;
        basic.set_sensitive(true);
        headers.insert(AUTHORIZATION, basic);
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));

        let mut request = self.post("/token", headers)?;
        *request.body_mut() = Some(reqwest::Body::from(Vec::<u8>::new()));

        tracing::debug!(base_url = %self.base_url, "Exchanging service key for session token");
        let response = self.transport.send(request).await?;
        let status = response.status();
        let body = read_json(response).await;

        if !status.is_success() {
            return Err(exchange_error(status, body).into());
        }

        let data = match body {
            Some(Value::Object(data)) => data,
            other => return Err(token_response_error("Invalid token response format", other)),
        };

        let access_token = data
            .get("access_token")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let Some(access_token) = access_token else {
            return Err(token_response_error(
                "Missing access token in response",
                Some(Value::Object(data)),
            ));
        };

        let expires_in = data
            .get("expires_in")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);

        tracing::debug!(expires_in, "Session token obtained");
        Ok(CachedToken::new(SecretString::from(access_token), expires_in))
    }

    async fn send_logout(&self, token: &CachedToken) -> Result<()> {
        let mut headers = self.base_headers()?;
        let mut bearer = header_value(&format!("Bearer {}", token.token().expose_secret()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let request = self.post("/token/logout", headers)?;
        self.transport.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialProvider for ServiceKeyProvider {
    fn name(&self) -> &str {
        "service_key"
    }

    async fn access_token(&self) -> Result<SecretString> {
        let mut cache = self.cache.lock().await;
        if let Some(ref cached) = *cache
            && !cached.needs_refresh(self.refresh_margin)
        {
            return Ok(SecretString::from(cached.token().expose_secret()));
        }

        let fresh = self.exchange().await?;
        let token = SecretString::from(fresh.token().expose_secret());
        *cache = Some(fresh);
        Ok(token)
    }

    fn supports_refresh(&self) -> bool {
        true
    }

    async fn refresh(&self) -> Result<()> {
        let mut cache = self.cache.lock().await;
        *cache = None;
        *cache = Some(self.exchange().await?);
        Ok(())
    }

    async fn logout(&self) {
        let mut cache = self.cache.lock().await;
        let Some(cached) = cache.take() else {
            return;
        };

        if let Err(e) = self.send_logout(&cached).await {
            tracing::debug!(error = %e, "Best-effort logout failed");
        }
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| Error::config("header value contains invalid characters"))
}

fn exchange_error(status: StatusCode, body: Option<Value>) -> ApiError {
    let kind = if status == StatusCode::UNAUTHORIZED {
        ErrorKind::Authentication
    } else {
        ErrorKind::Generic
    };
    let message = extract_message(body.as_ref(), status)
        .unwrap_or_else(|| ErrorKind::Authentication.default_message().to_string());

    ApiError::new(kind, message)
        .with_status(status.as_u16())
        .with_body(body)
        .with_context(ErrorContext::operation("authentication"))
}

fn token_response_error(message: &str, body: Option<Value>) -> Error {
    ApiError::new(ErrorKind::Generic, message)
        .with_body(body)
        .with_context(ErrorContext::operation("authentication"))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> ServiceKeyProvider {
        ServiceKeyProvider::new("svc-key", Arc::new(reqwest::Client::new()))
            .with_base_url(server.uri())
    }

    fn token_response(token: &str, expires_in: u64) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .set_body_json(json!({"access_token": token, "expires_in": expires_in}))
    }

    #[tokio::test]
    async fn test_token_exchange_request_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(header("Authorization", "Basic svc-key"))
            .and(header("Accept", "application/vnd.nexla.api.v1+json"))
            .and(header("Content-Length", "0"))
            .and(body_bytes(Vec::<u8>::new()))
            .respond_with(token_response("session-1", 86_400))
            .expect(1)
            .mount(&server)
            .await;

        let token = provider(&server).access_token().await.unwrap();
        assert_eq!(token.expose_secret(), "session-1");
    }

    #[tokio::test]
    async fn test_token_reused_while_fresh() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(token_response("session-1", 86_400))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider(&server);
        let first = provider.access_token().await.unwrap();
        let second = provider.access_token().await.unwrap();
        assert_eq!(first.expose_secret(), second.expose_secret());
    }

    #[tokio::test]
    async fn test_token_renewed_inside_margin() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(token_response("short-lived", 60))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(token_response("long-lived", 86_400))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider(&server).with_refresh_margin(Duration::from_secs(3600));
        assert_eq!(provider.access_token().await.unwrap().expose_secret(), "short-lived");
        assert_eq!(provider.access_token().await.unwrap().expose_secret(), "long-lived");
        assert_eq!(provider.access_token().await.unwrap().expose_secret(), "long-lived");
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_exchange() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                token_response("shared", 86_400).set_delay(Duration::from_millis(50)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider(&server);
        let (a, b) = tokio::join!(provider.access_token(), provider.access_token());
        assert_eq!(a.unwrap().expose_secret(), "shared");
        assert_eq!(b.unwrap().expose_secret(), "shared");
    }

    #[tokio::test]
    async fn test_refresh_is_unconditional() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(token_response("first", 86_400))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(token_response("second", 86_400))
            .mount(&server)
            .await;

        let provider = provider(&server);
        assert!(provider.supports_refresh());
        assert_eq!(provider.access_token().await.unwrap().expose_secret(), "first");
        provider.refresh().await.unwrap();
        assert_eq!(provider.access_token().await.unwrap().expose_secret(), "second");
    }

    #[tokio::test]
    async fn test_missing_expires_in_defaults_to_one_day() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok"})),
            )
            .mount(&server)
            .await;

        let provider = provider(&server);
        provider.access_token().await.unwrap();
        let remaining = provider.token_expires_at().await.unwrap() - Utc::now();
        assert!(remaining.num_seconds() > 86_000);
        assert!(remaining.num_seconds() <= 86_400);
    }

    #[tokio::test]
    async fn test_exchange_401_is_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "bad service key"})),
            )
            .mount(&server)
            .await;

        let api = match provider(&server).access_token().await {
            Err(Error::Api(api)) => api,
            other => panic!("expected API error, got {other:?}"),
        };
        assert_eq!(api.kind, ErrorKind::Authentication);
        assert_eq!(api.message, "bad service key");
        assert_eq!(api.status, Some(401));
        assert_eq!(api.body, Some(json!({"message": "bad service key"})));
    }

    #[tokio::test]
    async fn test_exchange_server_failure_is_generic_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
            .mount(&server)
            .await;

        let err = provider(&server).access_token().await.unwrap_err();
        assert_eq!(err.kind(), Some(&ErrorKind::Generic));
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn test_missing_access_token_is_generic_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"expires_in": 100})))
            .mount(&server)
            .await;

        let err = provider(&server).access_token().await.unwrap_err();
        assert_eq!(err.kind(), Some(&ErrorKind::Generic));
        assert!(err.to_string().contains("Missing access token"));
    }

    #[tokio::test]
    async fn test_logout_clears_cache() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(token_response("session", 86_400))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/token/logout"))
            .and(header("Authorization", "Bearer session"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider(&server);
        provider.access_token().await.unwrap();
        provider.logout().await;
        assert!(provider.token_expires_at().await.is_none());
        provider.access_token().await.unwrap();
    }

    #[tokio::test]
    async fn test_logout_without_token_is_noop() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token/logout"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        provider(&server).logout().await;
    }

    #[tokio::test]
    async fn test_logout_swallows_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(token_response("session", 86_400))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/token/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let provider = provider(&server);
        provider.access_token().await.unwrap();
        provider.logout().await;
        assert!(provider.token_expires_at().await.is_none());
    }

    #[test]
    fn test_debug_hides_service_key() {
        let provider =
            ServiceKeyProvider::new("very-secret-key", Arc::new(reqwest::Client::new()));
        assert!(!format!("{provider:?}").contains("very-secret-key"));
    }
}
