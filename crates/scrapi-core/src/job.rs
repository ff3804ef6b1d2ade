//! Job execution engine
//!
//! Drives one backend job through three strictly sequential phases:
//!
//! 1. **Submit** - POST the payload to `<base>`, read the job `id`
//! 2. **Poll** - GET `<base>/<id>` every poll interval until `done` or `faulted`
//! 3. **Fetch** - GET `<base>/<id>/results` and hand the body to the caller
//!
//! A failure in any phase ends the execution with its classified error; no
//! phase is retried. The wait between polls and every in-flight call observe
//! a [`CancellationToken`], and [`JobEngine::execute_with_timeout`] bounds the
//! whole run by [`RunConfig::timeout`].

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::config::RunConfig;
use crate::error::{Result, ScrapiError};
use crate::transport::{Transport, TransportRequest};
use crate::types::{JobHandle, JobInfo, JobStatus};

/// Submit/poll/fetch state machine over a [`Transport`]
///
/// The engine holds no per-job state, so one instance can serve any number
/// of concurrent executions.
#[derive(Debug, Clone)]
pub struct JobEngine<T: Transport> {
    transport: T,
    base_url: String,
}

impl<T: Transport> JobEngine<T> {
    /// Create an engine submitting jobs to `base_url`
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run all three phases with no overall deadline.
    ///
    /// Wall-clock bounding belongs to [`execute_with_timeout`](Self::execute_with_timeout).
    pub async fn execute(&self, payload: &Value, config: &RunConfig) -> Result<Value> {
        self.run(payload, config, &CancellationToken::new()).await
    }

    /// Run all three phases within `config.timeout()`.
    ///
    /// # Errors
    /// Returns `ScrapiError::Timeout` if the deadline elapses first; the
    /// in-flight request or poll wait is abandoned.
    pub async fn execute_with_timeout(&self, payload: &Value, config: &RunConfig) -> Result<Value> {
        self.execute_cancellable(payload, config, CancellationToken::new())
            .await
    }

    /// Like [`execute_with_timeout`](Self::execute_with_timeout), but also
    /// stops with `ScrapiError::Cancelled` as soon as `cancel` fires.
    pub async fn execute_cancellable(
        &self,
        payload: &Value,
        config: &RunConfig,
        cancel: CancellationToken,
    ) -> Result<Value> {
        let scope = cancel.child_token();
        let outcome =
            tokio::time::timeout(config.timeout(), self.run(payload, config, &scope)).await;
        scope.cancel();

        match outcome {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout = ?config.timeout(), "Job execution timed out");
                Err(ScrapiError::Timeout(config.timeout()))
            }
        }
    }

    async fn run(
        &self,
        payload: &Value,
        config: &RunConfig,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        let job = self.submit(payload, cancel).await?;
        self.poll_until_done(&job, config, cancel).await?;
        self.fetch_results(&job, cancel).await
    }

    /// Submit phase: one POST, no retry.
    pub async fn submit(&self, payload: &Value, cancel: &CancellationToken) -> Result<JobHandle> {
        let request = TransportRequest::post(self.base_url.clone(), payload.clone());
        let response = self.call(request, cancel).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Job submission failed");
        })?;

        let job: JobHandle = serde_json::from_value(response).map_err(|e| {
            ScrapiError::MalformedResponse(format!("submit response has no job id: {}", e))
        })?;

        tracing::info!(job_id = %job, "Job submitted");
        Ok(job)
    }

    /// Poll phase: returns once the job is `done`.
    ///
    /// # Errors
    /// - `ScrapiError::JobFaulted` if the backend reports `faulted`
    /// - any transport error from a single poll attempt
    /// - `ScrapiError::Cancelled` if `cancel` fires
    pub async fn poll_until_done(
        &self,
        job: &JobHandle,
        config: &RunConfig,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let status_url = self.status_url(job);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let response = self
                .call(TransportRequest::get(status_url.clone()), cancel)
                .await
                .inspect_err(|e| {
                    tracing::warn!(job_id = %job, attempt, error = %e, "Status poll failed");
                })?;

            let info: JobInfo = serde_json::from_value(response).map_err(|e| {
                ScrapiError::MalformedResponse(format!("status response has no status: {}", e))
            })?;
            let status = JobStatus::from(info.status.as_str());
            tracing::debug!(job_id = %job, attempt, ?status, "Polled job status");

            if status.is_terminal() {
                if status == JobStatus::Faulted {
                    tracing::warn!(job_id = %job, "Job faulted");
                    return Err(ScrapiError::JobFaulted {
                        job_id: job.id.clone(),
                    });
                }
                return Ok(());
            }

            tokio::select! {
                () = tokio::time::sleep(config.poll_interval()) => {}
                () = cancel.cancelled() => return Err(ScrapiError::Cancelled),
            }
        }
    }

    /// Fetch phase: one GET of the results, returned verbatim.
    pub async fn fetch_results(
        &self,
        job: &JobHandle,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        let result = self
            .call(TransportRequest::get(self.results_url(job)), cancel)
            .await
            .inspect_err(|e| {
                tracing::warn!(job_id = %job, error = %e, "Fetching results failed");
            })?;

        tracing::info!(job_id = %job, "Job results fetched");
        Ok(result)
    }

    /// Send one request, abandoning it if `cancel` fires first.
    async fn call(&self, request: TransportRequest, cancel: &CancellationToken) -> Result<Value> {
        tokio::select! {
            result = self.transport.send(request) => result,
            () = cancel.cancelled() => Err(ScrapiError::Cancelled),
        }
    }

    fn status_url(&self, job: &JobHandle) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(&job.id))
    }

    fn results_url(&self, job: &JobHandle) -> String {
        format!("{}/results", self.status_url(job))
    }
}
