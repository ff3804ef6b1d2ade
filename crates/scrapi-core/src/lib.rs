//! Scrapi Core Library
//!
//! Async client for a job-oriented scraping API. A scraping request is
//! submitted as a job, polled until the backend finishes it, and its result
//! is fetched once.
//!
//! # Features
//! - Submit/poll/fetch job engine with an overall timeout and cancellation
//! - Single-call realtime requests
//! - Typed request options with validation before any network call
//! - Typed errors that tell timeouts, faulted jobs and bad parameters apart

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod job;
pub mod realtime;
pub mod scraper;
pub mod transport;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export main types for convenience
pub use client::HttpTransport;
pub use config::{resolve_config, ClientConfig, ConfigOverrides, RunConfig};
pub use credentials::ApiCredentials;
pub use error::{Result, ScrapiError};
pub use job::JobEngine;
pub use realtime::RequestExecutor;
pub use reqwest::Method;
pub use scraper::ScrapiClient;
pub use tokio_util::sync::CancellationToken;
pub use transport::{Transport, TransportRequest};
pub use types::{GoogleOpts, JobHandle, JobStatus, Render, SearchOpts, UrlOpts, UserAgent};
pub use validation::Validate;
