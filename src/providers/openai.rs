use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{ChatProvider, Completion, CompletionRequest, TokenUsage as CompletionUsage};

/// Default public API endpoint
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";

/// OpenAI client for interacting with the chat completions API
///
/// Works against any OpenAI-compatible server (LM Studio, vLLM, Azure proxies)
/// by pointing `endpoint` at its `/v1` base.
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication (may be empty for local servers)
    api_key: String,
    /// API base URL, e.g. `https://api.openai.com/v1`
    endpoint: String,
    /// Name used in logs
    display_name: String,
}

/// OpenAI chat completion request
#[derive(Debug, Serialize, Default)]
pub struct OpenAIRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<OpenAIMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// OpenAI message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Message as returned inside a choice; content can be null
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIResponseMessage {
    /// Role of the message sender
    #[serde(default)]
    pub role: String,

    /// Content of the message
    #[serde(default)]
    pub content: Option<String>,
}

/// Individual choice in an OpenAI response
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIChoice {
    /// Generated message
    pub message: OpenAIResponseMessage,

    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage information
///
/// Some OpenAI-compatible servers omit counts, so every field defaults to zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenUsage {
    /// Number of prompt tokens
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Number of completion tokens
    #[serde(default)]
    pub completion_tokens: u32,
}

/// OpenAI chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIResponse {
    /// Generated choices
    pub choices: Vec<OpenAIChoice>,
    /// Token usage information
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl OpenAIRequest {
    /// Create a new OpenAI request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(OpenAIMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of tokens
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

impl From<CompletionRequest> for OpenAIRequest {
    fn from(request: CompletionRequest) -> Self {
        let mut openai = OpenAIRequest::new(request.model).temperature(request.temperature);
        for message in request.messages {
            openai = openai.add_message(message.role, message.content);
        }
        if let Some(max_tokens) = request.max_tokens {
            openai = openai.max_tokens(max_tokens);
        }
        openai
    }
}

impl OpenAI {
    /// Create a new OpenAI client with the default timeout
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::new_with_timeout(api_key, endpoint, 120)
    }

    /// Create a new OpenAI client with an explicit request timeout
    pub fn new_with_timeout(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            display_name: "OpenAI".to_string(),
        }
    }

    /// Override the name used in logs
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Full URL of the chat completions endpoint
    pub fn completions_url(&self) -> String {
        let base = if self.endpoint.trim().is_empty() {
            DEFAULT_OPENAI_ENDPOINT
        } else {
            self.endpoint.trim()
        };
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }

    /// Send a chat completion request
    pub async fn complete_raw(&self, request: &OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let url = self.completions_url();
        let mut builder = self.client.post(&url).json(request);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ProviderError::ConnectionError(format!("{} at {}: {}", self.display_name, url, e))
            } else {
                ProviderError::RequestFailed(format!("{}: {}", self.display_name, e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            let message = extract_error_message(&error_text);
            error!("{} API error ({}): {}", self.display_name, status, message);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ProviderError::AuthenticationError(message)
                }
                StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
                _ => ProviderError::ApiError {
                    status_code: status.as_u16(),
                    message,
                },
            });
        }

        response
            .json::<OpenAIResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(format!("{} response: {}", self.display_name, e)))
    }

    /// Extract text from the first choice of a response
    pub fn extract_text_from_response(response: &OpenAIResponse) -> Option<String> {
        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
    }
}

/// Pull `error.message` out of an OpenAI error body, falling back to the raw body
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl ChatProvider for OpenAI {
    fn name(&self) -> &str {
        &self.display_name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
        let model = request.model.clone();
        let response = self.complete_raw(&OpenAIRequest::from(request)).await?;
        debug!(
            "{} returned {} choice(s) for model {}",
            self.display_name,
            response.choices.len(),
            model
        );

        Ok(Completion {
            text: Self::extract_text_from_response(&response),
            usage: response.usage.as_ref().map(|u| CompletionUsage {
                prompt_tokens: u.prompt_tokens as u64,
                completion_tokens: u.completion_tokens as u64,
            }),
        })
    }
}
