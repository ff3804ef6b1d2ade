//! Test utilities: a scripted in-memory transport.
//!
//! Responses are queued per phase (submit, poll, fetch) and every call is
//! recorded with its timestamp so tests can assert on ordering and spacing.
//! Scripts can also be keyed by job id so concurrent jobs on one transport
//! each see their own status sequence.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::{json, Value};

use crate::error::{Result, ScrapiError};
use crate::transport::{Transport, TransportRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Submit,
    Poll,
    Fetch,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub request: TransportRequest,
    pub at: Instant,
}

#[derive(Default)]
struct JobScript {
    poll: VecDeque<Result<Value>>,
    fetch: VecDeque<Result<Value>>,
}

#[derive(Default)]
struct MockState {
    submit: VecDeque<Result<Value>>,
    poll: VecDeque<Result<Value>>,
    fetch: VecDeque<Result<Value>>,
    jobs: HashMap<String, JobScript>,
    calls: Vec<RecordedCall>,
}

/// Transport answering from per-phase queues.
///
/// When a queue runs dry the defaults are: submit `{"id": "abc"}`,
/// poll `{"status": "pending"}`, fetch `{}`.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn on_submit(self, response: Result<Value>) -> Self {
        self.state.lock().unwrap().submit.push_back(response);
        self
    }

    pub fn on_poll(self, response: Result<Value>) -> Self {
        self.state.lock().unwrap().poll.push_back(response);
        self
    }

    pub fn on_poll_status(self, status: &str) -> Self {
        self.on_poll(Ok(json!({ "status": status })))
    }

    pub fn on_fetch(self, response: Result<Value>) -> Self {
        self.state.lock().unwrap().fetch.push_back(response);
        self
    }

    /// Script the polls and the fetch for one job id; other ids fall back to
    /// the shared queues.
    pub fn on_job(self, id: &str, statuses: &[&str], fetch: Result<Value>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let script = state.jobs.entry(id.to_string()).or_default();
            for status in statuses {
                script.poll.push_back(Ok(json!({ "status": status })));
            }
            script.fetch.push_back(fetch);
        }
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, kind: CallKind) -> usize {
        self.calls().iter().filter(|c| c.kind == kind).count()
    }

    fn classify(request: &TransportRequest) -> CallKind {
        if request.method == reqwest::Method::POST {
            CallKind::Submit
        } else if request.url.ends_with("/results") {
            CallKind::Fetch
        } else {
            CallKind::Poll
        }
    }

    fn job_id(request: &TransportRequest) -> Option<&str> {
        let path = request.url.strip_suffix("/results").unwrap_or(&request.url);
        path.rsplit('/').next()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<Value> {
        let kind = Self::classify(&request);
        let scripted = {
            let mut state = self.state.lock().unwrap();
            let job_id = Self::job_id(&request).map(str::to_string);
            state.calls.push(RecordedCall {
                kind,
                request,
                at: Instant::now(),
            });
            let script = match &job_id {
                Some(id) => state.jobs.get_mut(id),
                None => None,
            };
            let per_job = match (kind, script) {
                (CallKind::Poll, Some(script)) => Some(script.poll.pop_front()),
                (CallKind::Fetch, Some(script)) => Some(script.fetch.pop_front()),
                _ => None,
            };
            match (kind, per_job) {
                (_, Some(response)) => response,
                (CallKind::Submit, None) => state.submit.pop_front(),
                (CallKind::Poll, None) => state.poll.pop_front(),
                (CallKind::Fetch, None) => state.fetch.pop_front(),
            }
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        scripted.unwrap_or_else(|| {
            Ok(match kind {
                CallKind::Submit => json!({ "id": "abc" }),
                CallKind::Poll => json!({ "status": "pending" }),
                CallKind::Fetch => json!({}),
            })
        })
    }
}

/// Shorthand for a scripted HTTP status failure.
pub fn http_error(status: u16) -> ScrapiError {
    ScrapiError::HttpStatus {
        status,
        body: String::new(),
    }
}
