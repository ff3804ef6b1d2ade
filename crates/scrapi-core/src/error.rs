//! Error types for the scrapi client
//!
//! Every failure of a job execution or realtime request surfaces as one
//! [`ScrapiError`] variant, so callers can tell a timeout apart from a faulted
//! job or a rejected parameter.

use std::time::Duration;

use thiserror::Error;

/// Error type for scrapi operations
#[derive(Error, Debug)]
pub enum ScrapiError {
    /// A request parameter failed validation before any network call
    #[error("Invalid {field}: {reason}")]
    Validation {
        /// Name of the offending parameter
        field: &'static str,
        /// Human readable description of the violation
        reason: String,
    },

    /// Connecting to the backend or transferring the request failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// Backend answered with a non-success status code
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Status code returned by the backend
        status: u16,
        /// Raw response body
        body: String,
    },

    /// A single call or the overall execution ran out of time
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Backend reported the job itself as faulted
    #[error("Job {job_id} faulted")]
    JobFaulted {
        /// Identifier of the faulted job
        job_id: String,
    },

    /// Realtime executor was asked for a method it does not implement
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    /// Response body was not JSON or lacked a required field
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Building a request payload failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Caller cancelled the execution
    #[error("Execution cancelled")]
    Cancelled,

    /// The underlying HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl ScrapiError {
    /// Shorthand for building a [`ScrapiError::Validation`].
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Returns true if the error is a parameter validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns true if a per-call or overall deadline elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Name of the rejected field for validation errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Result type alias for scrapi operations
pub type Result<T> = std::result::Result<T, ScrapiError>;
