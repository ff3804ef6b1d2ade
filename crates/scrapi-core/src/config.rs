//! Client and per-execution configuration
//!
//! [`ClientConfig`] describes how to reach the backend and is fixed for the
//! lifetime of a client. [`RunConfig`] governs a single job execution and is
//! resolved from optional [`ConfigOverrides`] on every call.

use std::time::Duration;

use crate::error::{Result, ScrapiError};

/// Default overall budget for one job execution
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(50);

/// Default delay between two status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Resolved timeout and poll interval for one execution
///
/// Both durations are strictly positive; construct through
/// [`RunConfig::new`] or [`resolve_config`] to keep that guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    timeout: Duration,
    poll_interval: Duration,
}

impl RunConfig {
    /// Create a run configuration
    ///
    /// # Errors
    /// Returns `ScrapiError::Validation` if either duration is zero.
    pub fn new(timeout: Duration, poll_interval: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(ScrapiError::validation("timeout", "must be greater than 0"));
        }
        if poll_interval.is_zero() {
            return Err(ScrapiError::validation(
                "poll_interval",
                "must be greater than 0",
            ));
        }
        Ok(Self {
            timeout,
            poll_interval,
        })
    }

    /// Overall wall-clock budget
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Delay between status polls
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Caller-supplied overrides; absent fields fall back to the defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Overall wall-clock budget (default: 50s)
    pub timeout: Option<Duration>,
    /// Delay between status polls (default: 5s)
    pub poll_interval: Option<Duration>,
}

impl ConfigOverrides {
    /// Override the overall budget
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the delay between polls
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = Some(poll_interval);
        self
    }
}

/// Merge overrides with the defaults into a concrete [`RunConfig`]
///
/// # Example
/// ```
/// use std::time::Duration;
/// use scrapi_core::config::{resolve_config, ConfigOverrides, DEFAULT_POLL_INTERVAL};
///
/// let overrides = ConfigOverrides::default().with_timeout(Duration::from_secs(10));
/// let config = resolve_config(&overrides).unwrap();
/// assert_eq!(config.timeout(), Duration::from_secs(10));
/// assert_eq!(config.poll_interval(), DEFAULT_POLL_INTERVAL);
/// ```
///
/// # Errors
/// Returns `ScrapiError::Validation` if an override is zero.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<RunConfig> {
    RunConfig::new(
        overrides.timeout.unwrap_or(DEFAULT_TIMEOUT),
        overrides.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
    )
}

/// Configuration for the HTTP transport
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Job endpoint, e.g. `https://api.example.com/v1/queries`
    pub base_url: String,
    /// Endpoint for single-call requests; falls back to `base_url`
    pub realtime_url: Option<String>,
    /// Upper bound for any single HTTP call (default: 30s)
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Point the client at `base_url`; a trailing `/` is dropped
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            realtime_url: None,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Send single-call requests somewhere other than `base_url`
    pub fn with_realtime_url(mut self, realtime_url: impl Into<String>) -> Self {
        self.realtime_url = Some(realtime_url.into());
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}
