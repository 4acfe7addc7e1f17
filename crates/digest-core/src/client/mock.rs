//! Mock generation backend for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::GenerationBackend;

/// A configurable mock response for [`MockBackend`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Simulate generated text.
    Text(String),
    /// Simulate a transport or service error.
    Error(String),
}

/// The arguments of the most recent [`GenerationBackend::send`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentRequest {
    pub system_instruction: String,
    pub user_prompt: String,
    pub credential: String,
}

/// A hand-rolled mock implementing [`GenerationBackend`] for tests.
///
/// Returns a fixed response and counts calls via
/// [`call_count()`](MockBackend::call_count).
pub struct MockBackend {
    response: MockResponse,
    last: Mutex<Option<SentRequest>>,
    call_count: AtomicUsize,
}

impl MockBackend {
    /// Create a mock that always returns `response`.
    pub fn new(response: MockResponse) -> Self {
        Self {
            response,
            last: Mutex::new(None),
            call_count: AtomicUsize::new(0),
        }
    }

    /// How many times `send()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SentRequest> {
        self.last.lock().ok().and_then(|guard| guard.clone())
    }
}

impl GenerationBackend for MockBackend {
    fn name(&self) -> &str {
        "Mock"
    }

    fn send<'a>(
        &'a self,
        system_instruction: &'a str,
        user_prompt: &'a str,
        credential: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last.lock() {
            *last = Some(SentRequest {
                system_instruction: system_instruction.to_string(),
                user_prompt: user_prompt.to_string(),
                credential: credential.to_string(),
            });
        }
        let response = self.response.clone();

        Box::pin(async move {
            match response {
                MockResponse::Text(text) => Ok(text),
                MockResponse::Error(msg) => Err(msg),
            }
        })
    }
}
