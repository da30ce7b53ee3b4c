/*!
 * Provider implementations for chat-completion services.
 *
 * This module contains the provider abstraction the pipeline stages talk to,
 * plus the concrete clients:
 * - OpenAI: OpenAI API integration (also used for LM Studio, which exposes an
 *   OpenAI-compatible server)
 * - Mock: scripted provider for tests and offline runs
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;

pub mod mock;
pub mod openai;

/// A role-tagged chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Provider-agnostic completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,

    /// Conversation to complete
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature
    pub temperature: f32,

    /// Optional cap on generated tokens
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// Create a new request for the given model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: 0.0,
            max_tokens: None,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum number of generated tokens
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Concatenated content of every message with the given role
    pub fn content_for_role(&self, role: &str) -> String {
        self.messages
            .iter()
            .filter(|m| m.role == role)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Token usage reported by a provider for one completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of prompt tokens
    pub prompt_tokens: u64,
    /// Number of completion tokens
    pub completion_tokens: u64,
}

/// Provider-agnostic completion result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    /// Message content; `None` when the provider returned no content at all
    pub text: Option<String>,

    /// Token usage, when the provider reports it
    pub usage: Option<TokenUsage>,
}

impl Completion {
    /// Completion carrying the given text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            usage: None,
        }
    }

    /// Attach usage numbers
    pub fn with_usage(mut self, prompt_tokens: u64, completion_tokens: u64) -> Self {
        self.usage = Some(TokenUsage {
            prompt_tokens,
            completion_tokens,
        });
        self
    }

    /// Trimmed content, or `None` when it is missing or blank
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Common trait for all chat-completion providers
///
/// Pipeline stages hold an `Arc<dyn ChatProvider>` so that the client is an
/// explicit, replaceable collaborator. Implementations must be safe to share
/// across concurrent pipeline runs.
#[async_trait]
pub trait ChatProvider: Send + Sync + Debug {
    /// Human readable provider name, used in logs
    fn name(&self) -> &str;

    /// Complete a request using this provider
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError>;

    /// Test the connection to the provider with a minimal request
    async fn test_connection(&self, model: &str) -> Result<(), ProviderError> {
        let request = CompletionRequest::new(model)
            .add_message("user", "Hello")
            .max_tokens(10);
        self.complete(request).await?;
        Ok(())
    }
}
