/*!
 * Translator stage: produces the first-pass draft.
 */

use log::debug;
use std::sync::Arc;
use std::time::Instant;

use super::Stage;
use super::prompts::translator_system_prompt;
use crate::errors::PipelineError;
use crate::providers::{ChatProvider, CompletionRequest, TokenUsage};

/// Draft translation stage
#[derive(Debug, Clone)]
pub struct Translator {
    provider: Arc<dyn ChatProvider>,
    model: String,
    temperature: f32,
}

impl Translator {
    /// Create a translator that sends requests through `provider`
    pub fn new(provider: Arc<dyn ChatProvider>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
        }
    }

    /// Translate `text`, returning the trimmed draft
    pub async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, PipelineError> {
        let (draft, _) = self
            .translate_with_usage(text, source_language, target_language)
            .await?;
        Ok(draft)
    }

    /// Translate `text` and report the token usage of the call
    pub async fn translate_with_usage(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<(String, Option<TokenUsage>), PipelineError> {
        let start_time = Instant::now();
        let request = CompletionRequest::new(&self.model)
            .add_message("system", translator_system_prompt(source_language, target_language))
            .add_message("user", text)
            .temperature(self.temperature);

        let completion = self.provider.complete(request).await?;
        let draft = completion
            .non_empty_text()
            .ok_or(PipelineError::EmptyResponse {
                stage: Stage::Translation,
            })?
            .to_string();

        debug!(
            "Draft {} -> {} received from {} in {:?}",
            source_language,
            target_language,
            self.provider.name(),
            start_time.elapsed()
        );
        Ok((draft, completion.usage))
    }
}
