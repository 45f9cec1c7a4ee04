//! Shared HTTP client construction, headers and response normalization.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use serde_json::Value;

use crate::config::BasicCredentials;
use crate::error::{KnotError, Result};

const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the reqwest client used for every backend call.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(KnotError::Network)
}

/// Basic auth plus JSON content type.
pub fn basic_headers(credentials: &BasicCredentials) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(AUTHORIZATION, credentials.header_value()?);
    Ok(headers)
}

/// Resolve `endpoint` against `base`, ignoring leading slashes on the
/// endpoint so a base path prefix is kept.
pub fn endpoint_url(base: &Url, endpoint: &str) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(endpoint.trim_start_matches('/'))
        .map_err(|e| KnotError::InvalidUrl(format!("{endpoint}: {e}")))
}

/// Map a non-2xx response to an error. The body is kept verbatim.
pub fn status_to_error(status: u16, body: &str) -> KnotError {
    match status {
        401 | 403 => KnotError::Authentication {
            status,
            message: body.to_string(),
        },
        _ => KnotError::api(status, body),
    }
}

/// Parse a 2xx body as JSON, falling back to `{"response": <text>}`.
pub fn normalize_success_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| serde_json::json!({ "response": body }))
}
