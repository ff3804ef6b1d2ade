//! Transport abstraction
//!
//! The job engine and the realtime executor only talk to the backend through
//! [`Transport`], so tests can script responses without a network.

use std::future::Future;
use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

use crate::error::Result;

/// One outbound HTTP call
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Only GET and POST are issued
    pub method: Method,
    /// Absolute URL, job id already percent-encoded
    pub url: String,
    /// JSON body, sent for POST requests
    pub body: Option<Value>,
    /// Per-call deadline; `None` uses the transport's own default
    pub timeout: Option<Duration>,
}

impl TransportRequest {
    /// GET without a body
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            body: None,
            timeout: None,
        }
    }

    /// POST with a JSON body
    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            body: Some(body),
            timeout: None,
        }
    }

    /// Set the per-call deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Sends a request and decodes the JSON response body.
///
/// Implementations classify failures into `Connection`, `HttpStatus`,
/// `Timeout` or `MalformedResponse`. Clones share the same connection pool
/// and credentials.
pub trait Transport: Send + Sync + Clone {
    fn send(&self, request: TransportRequest) -> impl Future<Output = Result<Value>> + Send;
}
