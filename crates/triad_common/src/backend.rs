//! The backend seam.
//!
//! Every remote AI backend is reached through `ChatBackend`, so the stage
//! dispatcher is written once and tests substitute a recording fake without
//! any global state.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::provider::ChatRequest;

/// One remote AI backend. Implementations hold no per-call mutable state
/// and are safe to share across concurrent requests.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Issue exactly one completion request and return the extracted
    /// plain-text reply.
    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError>;
}

/// Test double with queued responses and recorded requests.
pub struct FakeBackend {
    responses: Mutex<Vec<Result<String, ProviderError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl FakeBackend {
    /// Create a fake with pre-defined responses, returned in order. The
    /// last response repeats once the queue is down to one entry.
    pub fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A fake that always replies with the same text.
    pub fn always(reply: &str) -> Self {
        Self::new(vec![Ok(reply.to_string())])
    }

    /// A fake that always fails with the given error.
    pub fn always_error(error: ProviderError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Number of completion calls issued so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Copies of every request seen, in order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(ProviderError::EmptyReply);
        }
        if responses.len() == 1 {
            responses[0].clone()
        } else {
            responses.remove(0)
        }
    }
}
