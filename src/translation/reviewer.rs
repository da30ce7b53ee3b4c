/*!
 * Reviewer stage: reflects on the draft and the critique, makes the final call.
 */

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::model::Decision;
use super::prompts::review_prompt;
use super::structured::{parse_json_object, preview};
use crate::errors::PipelineError;
use crate::providers::{ChatProvider, CompletionRequest, TokenUsage};

/// Reviewer's structured verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewVerdict {
    /// Why the reviewer agrees or disagrees with the feedback
    pub feedback: String,
    /// Final translation (the draft when accepted)
    pub final_translation: String,
    /// Final decision
    pub decision: Decision,
}

impl ReviewVerdict {
    /// Parse a model reply into a verdict
    ///
    /// All three fields are required and the final translation must not be blank.
    pub fn parse(reply: &str) -> Result<Self, PipelineError> {
        let mut verdict: ReviewVerdict = parse_json_object(reply).map_err(|reason| {
            warn!("Review verdict rejected ({}): {}", reason, preview(reply, 200));
            PipelineError::MalformedVerdict(reason)
        })?;

        verdict.final_translation = verdict.final_translation.trim().to_string();
        if verdict.final_translation.is_empty() {
            warn!("Review verdict has an empty final_translation");
            return Err(PipelineError::MalformedVerdict(
                "final_translation is empty".to_string(),
            ));
        }
        Ok(verdict)
    }
}

/// Reflection stage
#[derive(Debug, Clone)]
pub struct Reviewer {
    provider: Arc<dyn ChatProvider>,
    model: String,
    temperature: f32,
}

impl Reviewer {
    /// Create a reviewer that sends requests through `provider`
    pub fn new(provider: Arc<dyn ChatProvider>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
        }
    }

    /// Review `draft` in light of `feedback_payload`
    pub async fn review(
        &self,
        original: &str,
        draft: &str,
        feedback_payload: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<ReviewVerdict, PipelineError> {
        let (verdict, _) = self
            .review_with_usage(original, draft, feedback_payload, source_language, target_language)
            .await?;
        Ok(verdict)
    }

    /// Review `draft` and report the token usage of the call
    pub async fn review_with_usage(
        &self,
        original: &str,
        draft: &str,
        feedback_payload: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<(ReviewVerdict, Option<TokenUsage>), PipelineError> {
        let request = CompletionRequest::new(&self.model)
            .add_message(
                "user",
                review_prompt(original, draft, feedback_payload, source_language, target_language),
            )
            .temperature(self.temperature);

        let completion = self.provider.complete(request).await?;
        let verdict = ReviewVerdict::parse(completion.text.as_deref().unwrap_or_default())?;

        debug!("Reviewer decision {}", verdict.decision);
        Ok((verdict, completion.usage))
    }
}
