//! Mock generator for testing
//!
//! Replies are served from a queue; every request is recorded so tests can
//! inspect exactly what was sent.

use crate::error::Result;
use crate::generator::{GenerationRequest, Generator};

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A generator that returns queued replies or a default one.
#[derive(Clone)]
pub struct MockGenerator {
    replies: Arc<Mutex<VecDeque<Result<String>>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerator {
    /// Create a new mock generator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful reply.
    pub fn push_reply(&self, text: impl Into<String>) {
        self.push_result(Ok(text.into()));
    }

    /// Queue a reply or a failure.
    pub fn push_result(&self, result: Result<String>) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(result);
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait::async_trait]
impl Generator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: GenerationRequest) -> Result<String> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        let mut replies = self.replies.lock().unwrap_or_else(|e| e.into_inner());
        replies
            .pop_front()
            .unwrap_or_else(|| Ok("mock response".to_string()))
    }
}
