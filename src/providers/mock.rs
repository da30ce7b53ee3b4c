/*!
 * Mock provider implementations for testing.
 *
 * This module provides a mock chat provider that simulates the model:
 * - `MockProvider::working()` - answers every stage with well-formed output
 * - `MockProvider::scripted(..)` - replays a fixed list of replies in order
 * - `MockProvider::failing()` - always fails with a transport error
 * - `MockProvider::empty()` - always returns no content
 *
 * Every request is counted and recorded so tests can assert which stages ran.
 */

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::{ChatProvider, Completion, CompletionRequest};

/// Type of transport error to simulate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Authentication error (invalid API key)
    Auth,
    /// Connection error
    Connection,
    /// Rate limit error
    RateLimit,
    /// Server-side API error
    Api,
}

impl MockFailure {
    fn to_error(self, request_number: usize) -> ProviderError {
        match self {
            Self::Auth => ProviderError::AuthenticationError("Invalid API key".into()),
            Self::Connection => ProviderError::ConnectionError("Connection refused".into()),
            Self::RateLimit => ProviderError::RateLimitExceeded("Rate limit exceeded".into()),
            Self::Api => ProviderError::ApiError {
                status_code: 500,
                message: format!("Simulated provider failure (request #{})", request_number),
            },
        }
    }
}

/// One scripted reply
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Return this text as the message content
    Text(String),
    /// Return a completion with no content
    Empty,
    /// Fail with a transport error
    Fail(MockFailure),
}

impl MockReply {
    /// Text reply
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy)]
enum MockBehavior {
    /// Generate replies with a responder function
    Responder(fn(&CompletionRequest) -> String),
    /// Pop replies from the script; fail once it is exhausted
    Scripted,
    /// Always fail
    Failing(MockFailure),
    /// Always return no content
    Empty,
}

/// Mock provider for testing pipeline behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    behavior: MockBehavior,
    script: Arc<Mutex<VecDeque<MockReply>>>,
    request_count: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    fn new(behavior: MockBehavior, script: Vec<MockReply>) -> Self {
        Self {
            behavior,
            script: Arc::new(Mutex::new(script.into())),
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mock that answers every stage with well-formed output and accepts the draft
    pub fn working() -> Self {
        Self::with_responder(stage_aware_response)
    }

    /// Mock that produces replies with a custom function
    pub fn with_responder(responder: fn(&CompletionRequest) -> String) -> Self {
        Self::new(MockBehavior::Responder(responder), Vec::new())
    }

    /// Mock that replays the given replies in order
    pub fn scripted(replies: Vec<MockReply>) -> Self {
        Self::new(MockBehavior::Scripted, replies)
    }

    /// Mock that always fails with a server error
    pub fn failing() -> Self {
        Self::failing_with(MockFailure::Api)
    }

    /// Mock that always fails with the given error kind
    pub fn failing_with(failure: MockFailure) -> Self {
        Self::new(MockBehavior::Failing(failure), Vec::new())
    }

    /// Mock that always returns an empty completion
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty, Vec::new())
    }

    /// Number of requests received so far (shared between clones)
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of every request received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
        let number = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        let prompt_tokens = (request.content_for_role("system").len()
            + request.content_for_role("user").len()) as u64
            / 4;

        let reply = match self.behavior {
            MockBehavior::Responder(responder) => MockReply::Text(responder(&request)),
            MockBehavior::Scripted => self
                .script
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .pop_front()
                .unwrap_or(MockReply::Fail(MockFailure::Api)),
            MockBehavior::Failing(failure) => MockReply::Fail(failure),
            MockBehavior::Empty => MockReply::Empty,
        };

        match reply {
            MockReply::Text(text) => {
                let completion_tokens = (text.len() / 4) as u64;
                Ok(Completion::text(text).with_usage(prompt_tokens, completion_tokens))
            }
            MockReply::Empty => Ok(Completion {
                text: None,
                usage: None,
            }),
            MockReply::Fail(failure) => Err(failure.to_error(number)),
        }
    }
}

/// Default responder: recognizes which stage is asking and answers in kind
///
/// - reviewer prompts get an ACCEPT verdict echoing the draft
/// - feedback prompts get an all-green ACCEPT report
/// - anything else is treated as a translation request
pub fn stage_aware_response(request: &CompletionRequest) -> String {
    let user = request.content_for_role("user");
    if user.contains("\"final_translation\"") {
        let draft = section_after(&user, "Draft translation:").unwrap_or("[draft]");
        serde_json::json!({
            "feedback": "The draft is accurate and natural.",
            "final_translation": draft,
            "decision": "ACCEPT",
        })
        .to_string()
    } else if user.contains("\"checks\"") {
        serde_json::json!({
            "checks": {
                "target_language_ok": true,
                "meaning_ok": true,
                "numbers_preserved": true,
                "naturalness_ok": true,
            },
            "feedback": "Faithful and idiomatic.",
            "decision": "ACCEPT",
        })
        .to_string()
    } else {
        let system = request.content_for_role("system");
        let target = system
            .split(" to ")
            .nth(1)
            .and_then(|rest| rest.split('.').next())
            .unwrap_or("target");
        format!("[TRANSLATED to {}] {}", target, user.trim())
    }
}

/// Text of the first non-empty block following a `heading` line
fn section_after<'a>(text: &'a str, heading: &str) -> Option<&'a str> {
    let start = text.find(heading)? + heading.len();
    text[start..]
        .trim_start()
        .split("\n\n")
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
