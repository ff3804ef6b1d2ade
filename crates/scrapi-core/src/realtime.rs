//! Single-call request executor
//!
//! For callers that want one request/response pair instead of the job
//! workflow. Shares the error taxonomy with the job engine.

use reqwest::Method;
use serde_json::Value;

use crate::config::RunConfig;
use crate::error::{Result, ScrapiError};
use crate::transport::{Transport, TransportRequest};

/// Sends one request to the realtime endpoint and returns its JSON body
#[derive(Debug, Clone)]
pub struct RequestExecutor<T: Transport> {
    transport: T,
    url: String,
}

impl<T: Transport> RequestExecutor<T> {
    /// Create an executor posting to `url`
    pub fn new(transport: T, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }

    /// Issue one GET or POST bounded by `config.timeout()`.
    ///
    /// POST sends `payload` as the JSON body (an empty object when absent);
    /// GET ignores it.
    ///
    /// # Errors
    /// - `ScrapiError::UnsupportedMethod` for anything but GET/POST, before any I/O
    /// - transport errors as classified by the underlying [`Transport`]
    pub async fn request(
        &self,
        method: Method,
        payload: Option<&Value>,
        config: &RunConfig,
    ) -> Result<Value> {
        let request = if method == Method::POST {
            TransportRequest::post(
                self.url.clone(),
                payload.cloned().unwrap_or_else(|| Value::Object(Default::default())),
            )
        } else if method == Method::GET {
            TransportRequest::get(self.url.clone())
        } else {
            tracing::warn!(%method, "Unsupported method");
            return Err(ScrapiError::UnsupportedMethod(method.to_string()));
        };

        self.transport
            .send(request.with_timeout(config.timeout()))
            .await
            .inspect_err(|e| {
                tracing::warn!(%method, url = %self.url, error = %e, "Realtime request failed");
            })
    }
}
