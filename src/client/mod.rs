//! Backend client: one HTTP request per call, normalized into a JSON value
//! or a [`KnotError`].

pub mod http;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::KnotConfig;
use crate::error::{KnotError, Result};

/// Anything that can carry a validated payload to the backend.
///
/// Implementations attempt exactly one request per call and never retry.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn send(&self, method: Method, endpoint: &str, payload: Value) -> Result<Value>;
}

/// Serializing helpers available on every [`Backend`], including
/// `dyn Backend`.
#[async_trait]
pub trait BackendExt: Backend {
    /// POST `payload` as JSON to `endpoint`.
    async fn call<T>(&self, endpoint: &str, payload: &T) -> Result<Value>
    where
        T: Serialize + Sync + ?Sized,
    {
        self.call_with_method(Method::POST, endpoint, payload).await
    }

    async fn call_with_method<T>(
        &self,
        method: Method,
        endpoint: &str,
        payload: &T,
    ) -> Result<Value>
    where
        T: Serialize + Sync + ?Sized,
    {
        let body = serde_json::to_value(payload)?;
        self.send(method, endpoint, body).await
    }
}

impl<B: Backend + ?Sized> BackendExt for B {}

/// HTTP implementation of [`Backend`].
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
    headers: HeaderMap,
}

impl BackendClient {
    pub fn new(config: &KnotConfig) -> Result<Self> {
        if config.credentials.is_placeholder() {
            warn!("using placeholder backend credentials");
        }
        Ok(Self {
            http: http::build_http_client(config.timeout)?,
            base_url: config.base_url.clone(),
            headers: http::basic_headers(&config.credentials)?,
        })
    }
}

#[async_trait]
impl Backend for BackendClient {
    async fn send(&self, method: Method, endpoint: &str, payload: Value) -> Result<Value> {
        let url = http::endpoint_url(&self.base_url, endpoint)?;

        debug!(%method, %url, "backend request");

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .headers(self.headers.clone());
        if !payload.is_null() {
            request = request.json(&payload);
        }

        let resp = request.send().await.map_err(|e| {
            warn!(%method, %url, error = %e, "backend unreachable");
            KnotError::Network(e)
        })?;

        let status = resp.status().as_u16();
        let text = resp.text().await?;
        debug!(status, %url, "backend response");

        if !(200..300).contains(&status) {
            warn!(status, %url, "backend returned error status");
            return Err(http::status_to_error(status, &text));
        }

        Ok(http::normalize_success_body(&text))
    }
}
