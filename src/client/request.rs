//! Request options and outbound request assembly.

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Method, Url};
use serde_json::Value;

use super::config::ClientConfig;
use crate::{Error, Result};

/// Reserved header that opts a single request out of authentication.
/// It is consumed by the client and never sent.
pub const SKIP_AUTH_HEADER: &str = "x-nexla-skip-auth";

/// Per-call inputs: path/query parameters, headers and JSON body.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub path_params: Vec<(String, String)>,
    pub query: Vec<(String, Value)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub skip_auth: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for a `{name}` segment of the path template.
    pub fn path_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.path_params.push((name.into(), value.to_string()));
        self
    }

    /// Query parameter. Arrays repeat the key per element; `null` is skipped.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes any `Serialize` value as the JSON body.
    pub fn json<T: serde::Serialize>(self, body: &T) -> Result<Self> {
        Ok(self.body(serde_json::to_value(body)?))
    }

    /// Send this request without an `Authorization` header and without the
    /// refresh-and-replay on 401.
    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    /// Either the explicit flag or the reserved header set to `true`.
    pub fn skips_auth(&self) -> bool {
        self.skip_auth
            || self.headers.iter().any(|(name, value)| {
                name.eq_ignore_ascii_case(SKIP_AUTH_HEADER) && value.trim() == "true"
            })
    }
}

/// Outbound request before credentials are attached.
#[derive(Debug)]
pub(crate) struct PreparedRequest {
    pub request: reqwest::Request,
    pub skip_auth: bool,
}

pub(crate) fn prepare(
    config: &ClientConfig,
    method: &Method,
    path: &str,
    options: &RequestOptions,
) -> Result<PreparedRequest> {
    let resolved = resolve_path(path, &options.path_params)?;
    let mut url = Url::parse(&format!("{}{}", config.base_url, resolved))
        .map_err(|e| Error::InvalidRequest(format!("invalid URL for path '{path}': {e}")))?;

    let pairs = query_pairs(&options.query);
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }

    let mut headers = HeaderMap::new();
    for (name, value) in &options.headers {
        if name.eq_ignore_ascii_case(SKIP_AUTH_HEADER) {
            continue;
        }
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| Error::InvalidRequest(format!("invalid header name '{name}'")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| Error::InvalidRequest(format!("invalid value for header '{name}'")))?;
        headers.append(name, value);
    }

    if !headers.contains_key(ACCEPT) {
        headers.insert(ACCEPT, header_value(&config.accept_header())?);
    }
    if !headers.contains_key(CONTENT_TYPE) && *method != Method::GET && *method != Method::HEAD {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    if let Some(ref ua) = config.user_agent {
        headers.insert(USER_AGENT, header_value(ua)?);
    }

    let mut request = reqwest::Request::new(method.clone(), url);
    *request.headers_mut() = headers;
    if let Some(ref body) = options.body {
        *request.body_mut() = Some(reqwest::Body::from(serde_json::to_vec(body)?));
    }

    Ok(PreparedRequest {
        request,
        skip_auth: options.skips_auth(),
    })
}

/// Substitutes `{name}` segments, percent-encoding each value.
pub(crate) fn resolve_path(template: &str, params: &[(String, String)]) -> Result<String> {
    let mut resolved = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let name = &rest[start + 1..start + len];
        let value = params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
            .ok_or_else(|| Error::InvalidRequest(format!("missing path parameter '{name}'")))?;

        resolved.push_str(&rest[..start]);
        resolved.push_str(&urlencoding::encode(value));
        rest = &rest[start + len + 1..];
    }

    resolved.push_str(rest);
    Ok(resolved)
}

fn query_pairs(query: &[(String, Value)]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (name, value) in query {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(rendered) = render_query_value(item) {
                        pairs.push((name.clone(), rendered));
                    }
                }
            }
            other => {
                if let Some(rendered) = render_query_value(other) {
                    pairs.push((name.clone(), rendered));
                }
            }
        }
    }
    pairs
}

fn render_query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| Error::config("header value contains invalid characters"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::config::CredentialSource;
    use secrecy::SecretString;
    use serde_json::json;

    fn config() -> ClientConfig {
        let mut config = ClientConfig::new(CredentialSource::AccessToken(SecretString::from("t")));
        config.base_url = "https://api.example.com/nexla-api".into();
        config
    }

    #[test]
    fn test_resolve_path() {
        let params = vec![
            ("flow_id".to_string(), "42".to_string()),
            ("resource_type".to_string(), "data sources".to_string()),
        ];
        assert_eq!(resolve_path("/flows/{flow_id}", &params).unwrap(), "/flows/42");
        assert_eq!(
            resolve_path("/{resource_type}/{flow_id}/activate", &params).unwrap(),
            "/data%20sources/42/activate"
        );
        assert_eq!(resolve_path("/flows", &[]).unwrap(), "/flows");
    }

    #[test]
    fn test_missing_path_param() {
        let err = resolve_path("/flows/{flow_id}", &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(ref m) if m.contains("flow_id")));
    }

    #[test]
    fn test_query_rendering() {
        let options = RequestOptions::new()
            .query("page", 2)
            .query("expand", true)
            .query("tags", json!(["a", "b"]))
            .query("skip", Value::Null)
            .query("q", "x y");
        let prepared = prepare(&config(), &Method::GET, "/flows", &options).unwrap();
        assert_eq!(
            prepared.request.url().query(),
            Some("page=2&expand=true&tags=a&tags=b&q=x+y")
        );
    }

    #[test]
    fn test_query_appended_to_existing() {
        let options = RequestOptions::new().path_param("source_id", 5).query("page", 1);
        let prepared =
            prepare(&config(), &Method::GET, "/data_sources/{source_id}?expand=1", &options)
                .unwrap();
        assert_eq!(prepared.request.url().path(), "/nexla-api/data_sources/5");
        assert_eq!(prepared.request.url().query(), Some("expand=1&page=1"));
    }

    #[test]
    fn test_default_headers() {
        let prepared = prepare(&config(), &Method::POST, "/flows", &RequestOptions::new()).unwrap();
        let headers = prepared.request.headers();
        assert_eq!(headers[ACCEPT], "application/vnd.nexla.api.v1+json");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert!(headers.get(USER_AGENT).is_none());

        let prepared = prepare(&config(), &Method::GET, "/flows", &RequestOptions::new()).unwrap();
        assert!(prepared.request.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_caller_headers_win() {
        let options = RequestOptions::new()
            .header("Accept", "text/csv")
            .header("Content-Type", "text/plain");
        let prepared = prepare(&config(), &Method::PUT, "/flows", &options).unwrap();
        let headers = prepared.request.headers();
        assert_eq!(headers[ACCEPT], "text/csv");
        assert_eq!(headers[CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn test_user_agent_override() {
        let mut config = config();
        config.user_agent = Some("my-app/1.0".into());
        let options = RequestOptions::new().header("User-Agent", "caller");
        let prepared = prepare(&config, &Method::GET, "/flows", &options).unwrap();
        assert_eq!(prepared.request.headers()[USER_AGENT], "my-app/1.0");
    }

    #[test]
    fn test_skip_auth_sentinel_stripped() {
        let options = RequestOptions::new().header("X-Nexla-Skip-Auth", "true");
        let prepared = prepare(&config(), &Method::POST, "/token", &options).unwrap();
        assert!(prepared.skip_auth);
        assert!(prepared.request.headers().get(SKIP_AUTH_HEADER).is_none());

        let options = RequestOptions::new().header(SKIP_AUTH_HEADER, "false");
        let prepared = prepare(&config(), &Method::POST, "/token", &options).unwrap();
        assert!(!prepared.skip_auth);
        assert!(prepared.request.headers().get(SKIP_AUTH_HEADER).is_none());

        let prepared =
            prepare(&config(), &Method::POST, "/token", &RequestOptions::new().skip_auth())
                .unwrap();
        assert!(prepared.skip_auth);
    }

    #[test]
    fn test_body_serialized() {
        let options = RequestOptions::new().body(json!({"name": "flow"}));
        let prepared = prepare(&config(), &Method::POST, "/flows", &options).unwrap();
        let body = prepared.request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, br#"{"name":"flow"}"#);
    }

    #[test]
    fn test_invalid_header_name() {
        let options = RequestOptions::new().header("bad header", "v");
        let err = prepare(&config(), &Method::GET, "/flows", &options).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }
}
