//! Main scrapi client API
//!
//! Combines the HTTP transport, the job engine and the realtime executor
//! behind one handle. Options are validated and turned into a job payload
//! before anything is sent, so a bad parameter never reaches the network.

use reqwest::Method;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::client::HttpTransport;
use crate::config::{resolve_config, ClientConfig, ConfigOverrides};
use crate::credentials::ApiCredentials;
use crate::error::{Result, ScrapiError};
use crate::job::JobEngine;
use crate::realtime::RequestExecutor;
use crate::transport::Transport;
use crate::types::{build_payload, GoogleOpts, SearchOpts, UrlOpts};
use crate::validation::{validate_url, Validate};

/// High-level client for the scraping API
///
/// Owns the connection pool for its whole lifetime; dropping the client
/// releases it. Cloning is cheap and clones share the pool.
///
/// # Example
/// ```no_run
/// use scrapi_core::{ApiCredentials, ClientConfig, ConfigOverrides, ScrapiClient, SearchOpts};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = ScrapiClient::new(
///         &ApiCredentials::new("user", "pass"),
///         ClientConfig::new("https://api.example.com/v1/queries"),
///     )?;
///
///     let opts = SearchOpts::default().with_domain("de").with_parse(true);
///     let results = client
///         .search("bing_search", "rust async", &opts, &ConfigOverrides::default())
///         .await?;
///     println!("{}", results);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScrapiClient<T: Transport = HttpTransport> {
    engine: JobEngine<T>,
    executor: RequestExecutor<T>,
}

impl ScrapiClient<HttpTransport> {
    /// Create a client backed by reqwest.
    ///
    /// # Errors
    /// Returns `ScrapiError::ClientBuild` if the HTTP client cannot be created.
    pub fn new(credentials: &ApiCredentials, config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(credentials, &config)?;
        Ok(Self::with_transport(transport, &config))
    }
}

impl<T: Transport> ScrapiClient<T> {
    /// Create a client over a custom transport.
    ///
    /// This is useful for testing or when requests must go through another
    /// HTTP stack.
    pub fn with_transport(transport: T, config: &ClientConfig) -> Self {
        let realtime_url = config
            .realtime_url
            .clone()
            .unwrap_or_else(|| config.base_url.clone());
        Self {
            engine: JobEngine::new(transport.clone(), config.base_url.clone()),
            executor: RequestExecutor::new(transport, realtime_url),
        }
    }

    /// Run a raw job payload through submit, poll and fetch.
    ///
    /// # Errors
    /// - `ScrapiError::Validation` if an override is zero
    /// - `ScrapiError::Timeout` if the job does not finish in time
    /// - `ScrapiError::JobFaulted` if the backend gives up on the job
    /// - any transport error from submit, poll or fetch
    pub async fn execute(&self, payload: &Value, overrides: &ConfigOverrides) -> Result<Value> {
        let config = resolve_config(overrides)?;
        self.engine.execute_with_timeout(payload, &config).await
    }

    /// Like [`execute`](Self::execute), stopping early when `cancel` fires.
    pub async fn execute_cancellable(
        &self,
        payload: &Value,
        overrides: &ConfigOverrides,
        cancel: CancellationToken,
    ) -> Result<Value> {
        let config = resolve_config(overrides)?;
        self.engine.execute_cancellable(payload, &config, cancel).await
    }

    /// Issue a single GET or POST against the realtime endpoint.
    pub async fn request(
        &self,
        method: Method,
        payload: Option<&Value>,
        overrides: &ConfigOverrides,
    ) -> Result<Value> {
        let config = resolve_config(overrides)?;
        self.executor.request(method, payload, &config).await
    }

    /// Validate search options and build the job payload.
    pub fn prepare_search(&self, source: &str, query: &str, opts: &SearchOpts) -> Result<Value> {
        let query = non_empty_query(query)?;
        opts.validate()?;
        build_payload(opts, source, "query", query)
    }

    /// Validate URL options and build the job payload.
    ///
    /// `host` is the site the URL must belong to, e.g. `"amazon"`.
    pub fn prepare_url(
        &self,
        source: &str,
        url: &str,
        host: &str,
        opts: &UrlOpts,
    ) -> Result<Value> {
        validate_url(url, host)?;
        opts.validate()?;
        build_payload(opts, source, "url", url)
    }

    /// Validate Google options and build the job payload.
    pub fn prepare_google(&self, source: &str, query: &str, opts: &GoogleOpts) -> Result<Value> {
        let query = non_empty_query(query)?;
        opts.validate()?;
        build_payload(opts, source, "query", query)
    }

    /// Search `query` on a search-engine source.
    pub async fn search(
        &self,
        source: &str,
        query: &str,
        opts: &SearchOpts,
        overrides: &ConfigOverrides,
    ) -> Result<Value> {
        let payload = self.prepare_search(source, query, opts)?;
        self.run_job(source, &payload, overrides).await
    }

    /// Scrape a single URL that must belong to `host`.
    pub async fn scrape_url(
        &self,
        source: &str,
        url: &str,
        host: &str,
        opts: &UrlOpts,
        overrides: &ConfigOverrides,
    ) -> Result<Value> {
        let payload = self.prepare_url(source, url, host, opts)?;
        self.run_job(source, &payload, overrides).await
    }

    /// Search `query` on a Google source.
    pub async fn google_search(
        &self,
        source: &str,
        query: &str,
        opts: &GoogleOpts,
        overrides: &ConfigOverrides,
    ) -> Result<Value> {
        let payload = self.prepare_google(source, query, opts)?;
        self.run_job(source, &payload, overrides).await
    }

    async fn run_job(
        &self,
        source: &str,
        payload: &Value,
        overrides: &ConfigOverrides,
    ) -> Result<Value> {
        tracing::debug!(%source, "Running scrape job");
        self.execute(payload, overrides).await
    }
}

fn non_empty_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ScrapiError::validation("query", "search query cannot be empty"));
    }
    Ok(trimmed)
}
