//! Response body decoding.

use reqwest::header::{CONTENT_TYPE, HeaderMap};
use serde_json::Value;

use crate::{Error, Result};

/// `application/json` as well as vendor types such as
/// `application/vnd.nexla.api.v1+json`.
pub(crate) fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| {
            let ct = ct.to_ascii_lowercase();
            ct.contains("application/json") || ct.contains("+json")
        })
        .unwrap_or(false)
}

/// Parses the body only when it is declared as JSON. Any read or parse
/// failure yields `None`.
pub(crate) async fn read_json(response: reqwest::Response) -> Option<Value> {
    if !is_json(response.headers()) {
        return None;
    }
    let bytes = response.bytes().await.ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Body of a failed response: JSON when it parses, otherwise the raw text.
pub(crate) async fn read_error_body(response: reqwest::Response) -> Option<Value> {
    let bytes = response.bytes().await.ok()?;
    if bytes.is_empty() {
        return None;
    }
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(&bytes).into_owned())),
    }
}

/// Payload of a successful response. Empty bodies become `null`; text that
/// is not JSON is returned as a JSON string unless the server claimed JSON.
pub(crate) async fn read_payload(response: reqwest::Response) -> Result<Value> {
    let declared_json = is_json(response.headers());
    let bytes = response.bytes().await.map_err(Error::Network)?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(value),
        Err(e) if declared_json => Err(Error::Json(e)),
        Err(_) => Ok(Value::String(String::from_utf8_lossy(&bytes).into_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn test_json_content_types() {
        assert!(is_json(&headers("application/json")));
        assert!(is_json(&headers("Application/JSON; charset=utf-8")));
        assert!(is_json(&headers("application/vnd.nexla.api.v1+json")));
        assert!(!is_json(&headers("text/plain")));
        assert!(!is_json(&HeaderMap::new()));
    }
}
