//! Shared test helpers: a capturing backend and a wiremock-backed config.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use knot_tools::client::Backend;
use knot_tools::config::KnotConfig;
use knot_tools::error::Result;
use knot_tools::tools::KnotTools;
use reqwest::Method;
use serde_json::Value;
use wiremock::MockServer;

/// `Basic base64("username:password")`.
pub const PLACEHOLDER_AUTH: &str = "Basic dXNlcm5hbWU6cGFzc3dvcmQ=";

/// A request seen by [`CaptureBackend`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub endpoint: String,
    pub payload: Value,
}

/// Backend that records requests and answers with a canned value.
pub struct CaptureBackend {
    response: Value,
    requests: Mutex<Vec<CapturedRequest>>,
}

impl CaptureBackend {
    pub fn new(response: Value) -> Self {
        Self {
            response,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<CapturedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Backend for CaptureBackend {
    async fn send(&self, method: Method, endpoint: &str, payload: Value) -> Result<Value> {
        self.requests.lock().unwrap().push(CapturedRequest {
            method,
            endpoint: endpoint.to_string(),
            payload,
        });
        Ok(self.response.clone())
    }
}

/// Operations over a capturing backend with default configuration.
pub fn capture_tools(response: Value) -> (Arc<CaptureBackend>, Arc<KnotTools>) {
    let backend = Arc::new(CaptureBackend::new(response));
    let tools = Arc::new(KnotTools::new(backend.clone(), KnotConfig::default()));
    (backend, tools)
}

/// Default configuration pointed at a mock server.
pub fn config_for(server: &MockServer) -> KnotConfig {
    KnotConfig::default()
        .with_base_url(&server.uri())
        .and_then(|config| config.with_timeout(Duration::from_secs(5)))
        .expect("mock server uri is a valid base url")
}

/// Configuration pointed at a port nothing listens on.
pub fn unreachable_config() -> KnotConfig {
    KnotConfig::default()
        .with_base_url("http://127.0.0.1:1")
        .and_then(|config| config.with_timeout(Duration::from_secs(2)))
        .expect("valid url")
}
