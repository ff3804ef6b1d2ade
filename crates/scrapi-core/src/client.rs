//! reqwest-backed HTTP transport
//!
//! Holds the connection pool for the lifetime of the owning client and
//! attaches the JSON content type and `Basic` authorization header to every
//! request. The pool is released when the last clone is dropped.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::credentials::ApiCredentials;
use crate::error::{Result, ScrapiError};
use crate::transport::{Transport, TransportRequest};

/// Identifies this library to the backend
const USER_AGENT: &str = concat!("scrapi/", env!("CARGO_PKG_VERSION"));

/// HTTP transport over a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    request_timeout: Duration,
}

impl HttpTransport {
    /// Create a transport authenticated with `credentials`
    ///
    /// # Errors
    /// Returns `ScrapiError::ClientBuild` if the credentials do not form a
    /// valid header value or the HTTP client cannot be created.
    pub fn new(credentials: &ApiCredentials, config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&credentials.authorization_header())
            .map_err(|e| ScrapiError::ClientBuild(format!("invalid credentials: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ScrapiError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            request_timeout: config.request_timeout,
        })
    }

    /// Default per-call deadline
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    fn classify(&self, error: reqwest::Error, timeout: Duration) -> ScrapiError {
        if error.is_timeout() {
            ScrapiError::Timeout(timeout)
        } else if error.is_decode() {
            ScrapiError::MalformedResponse(error.to_string())
        } else {
            ScrapiError::Connection(error.to_string())
        }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<Value> {
        let timeout = request.timeout.unwrap_or(self.request_timeout);

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .timeout(timeout);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::trace!(method = %request.method, url = %request.url, "Sending request");

        let response = builder
            .send()
            .await
            .map_err(|e| self.classify(e, timeout))?;
        let status = response.status();

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(error = %e, url = %request.url, "Failed to read error body");
                    String::new()
                }
            };
            tracing::debug!(status = status.as_u16(), url = %request.url, "Non-success response");
            return Err(ScrapiError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.classify(e, timeout))?;

        serde_json::from_slice(&bytes).map_err(|e| {
            ScrapiError::MalformedResponse(format!("{} returned invalid JSON: {}", request.url, e))
        })
    }
}
