/*!
 * Feedback stage: structured quality critique of a draft.
 *
 * The model is asked for a fixed JSON schema. The reply is validated here,
 * where it is produced, so that the reviewer only ever sees a well-formed
 * report. The raw payload is kept next to the parsed report because the
 * reviewer receives it verbatim.
 */

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::model::Decision;
use super::prompts::feedback_prompt;
use super::structured::{extract_json_object, parse_json_object, preview};
use crate::errors::PipelineError;
use crate::providers::{ChatProvider, CompletionRequest, TokenUsage};

/// The four rubric checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackChecks {
    /// Translation is entirely in the target language
    pub target_language_ok: bool,
    /// No information missing or added
    pub meaning_ok: bool,
    /// Numbers, dates and proper nouns survived
    pub numbers_preserved: bool,
    /// Reads naturally and idiomatically
    pub naturalness_ok: bool,
}

impl FeedbackChecks {
    /// True when every check passed
    pub fn all_passed(&self) -> bool {
        self.target_language_ok && self.meaning_ok && self.numbers_preserved && self.naturalness_ok
    }

    /// Labelled list of the checks, for display
    pub fn labelled(&self) -> [(&'static str, bool); 4] {
        [
            ("Target language", self.target_language_ok),
            ("Meaning preserved", self.meaning_ok),
            ("Numbers and names preserved", self.numbers_preserved),
            ("Natural phrasing", self.naturalness_ok),
        ]
    }
}

/// Parsed feedback payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackReport {
    /// Rubric results
    pub checks: FeedbackChecks,
    /// Free-text rationale
    pub feedback: String,
    /// Evaluator's decision; advisory only, the reviewer decides
    pub decision: Decision,
}

impl FeedbackReport {
    /// Parse a model reply into a report
    pub fn parse(reply: &str) -> Result<Self, PipelineError> {
        parse_json_object(reply).map_err(|reason| {
            warn!("Feedback payload rejected ({}): {}", reason, preview(reply, 200));
            PipelineError::MalformedFeedback(reason)
        })
    }
}

/// Output of the feedback stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    /// Validated report
    pub report: FeedbackReport,
    /// The JSON object exactly as the model produced it
    pub payload: String,
}

/// Quality feedback stage
#[derive(Debug, Clone)]
pub struct FeedbackGenerator {
    provider: Arc<dyn ChatProvider>,
    model: String,
    temperature: f32,
}

impl FeedbackGenerator {
    /// Create a feedback generator that sends requests through `provider`
    pub fn new(provider: Arc<dyn ChatProvider>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
        }
    }

    /// Critique `translation` of `original`
    pub async fn generate_feedback(
        &self,
        original: &str,
        translation: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<Feedback, PipelineError> {
        let (feedback, _) = self
            .generate_feedback_with_usage(original, translation, source_language, target_language)
            .await?;
        Ok(feedback)
    }

    /// Critique `translation` and report the token usage of the call
    pub async fn generate_feedback_with_usage(
        &self,
        original: &str,
        translation: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<(Feedback, Option<TokenUsage>), PipelineError> {
        let request = CompletionRequest::new(&self.model)
            .add_message(
                "user",
                feedback_prompt(original, translation, source_language, target_language),
            )
            .temperature(self.temperature);

        let completion = self.provider.complete(request).await?;
        let reply = completion.text.as_deref().unwrap_or_default();
        let report = FeedbackReport::parse(reply)?;
        let payload = extract_json_object(reply).unwrap_or(reply).to_string();

        debug!(
            "Feedback decision {} (all checks passed: {})",
            report.decision,
            report.checks.all_passed()
        );
        Ok((Feedback { report, payload }, completion.usage))
    }
}
