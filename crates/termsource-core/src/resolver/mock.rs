//! Mock resolver for testing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ResolveError, ResolvedSource, Resolver};

/// A configurable mock response for [`MockResolver`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Simulate a registry hit.
    Found(String),
    /// Simulate "reference unknown to the registry".
    NotFound,
    /// Simulate a transient lookup failure.
    Error(String),
}

/// A hand-rolled mock implementing [`Resolver`] for tests.
///
/// Supports a fixed response for every call or a sequence of responses (one
/// per call, repeating the last once exhausted), and records every reference
/// it was asked about.
pub struct MockResolver {
    name: &'static str,
    /// Pending responses, stored reversed so `pop()` yields the next one.
    responses: Mutex<Vec<MockResponse>>,
    fallback: MockResponse,
    calls: Mutex<Vec<String>>,
    call_count: AtomicUsize,
}

impl MockResolver {
    /// Create a mock that always returns `response`.
    pub fn new(name: &'static str, response: MockResponse) -> Self {
        Self {
            name,
            responses: Mutex::new(Vec::new()),
            fallback: response,
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Create a mock that returns responses in order, repeating the last one.
    pub fn with_sequence(name: &'static str, mut responses: Vec<MockResponse>) -> Self {
        assert!(
            !responses.is_empty(),
            "sequence must have at least one response"
        );
        responses.reverse();
        let fallback = responses.first().cloned().unwrap();
        Self {
            name,
            responses: Mutex::new(responses),
            fallback,
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `resolve()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// References passed to `resolve()`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn next_response(&self) -> MockResponse {
        let mut seq = self.responses.lock().unwrap();
        seq.pop().unwrap_or_else(|| self.fallback.clone())
    }
}

impl Resolver for MockResolver {
    fn name(&self) -> &str {
        self.name
    }

    fn resolve(&self, reference: &str) -> Result<Option<ResolvedSource>, ResolveError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(reference.to_string());

        match self.next_response() {
            MockResponse::Found(url) => Ok(Some(ResolvedSource::new(url))),
            MockResponse::NotFound => Ok(None),
            MockResponse::Error(message) => Err(ResolveError::Lookup {
                reference: reference.to_string(),
                message,
            }),
        }
    }
}
