/*!
 * Pipeline orchestrator for coordinating the translation stages.
 *
 * The orchestrator runs the three stages strictly in order:
 * 1. Translator: draft translation
 * 2. Feedback generator: structured critique of the draft
 * 3. Reviewer: reflection and final decision
 *
 * Every stage always runs. The reviewer is the sole authority on the final
 * decision, so it runs even when the feedback already says ACCEPT. The first
 * failing stage aborts the run and its error is returned unchanged.
 */

use log::{debug, info};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::feedback::FeedbackGenerator;
use super::model::{PipelineResult, PipelineStatus, TokenUsageStats, TranslationRequest};
use super::reviewer::Reviewer;
use super::translator::Translator;
use crate::app_config::TranslationConfig;
use crate::errors::PipelineError;
use crate::providers::ChatProvider;

/// Configuration for the translation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Model identifier used by every stage
    pub model: String,

    /// Temperature for the draft translation
    pub translation_temperature: f32,

    /// Temperature for the feedback stage
    pub feedback_temperature: f32,

    /// Temperature for the reviewer stage
    pub review_temperature: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            translation_temperature: 0.3,
            feedback_temperature: 0.2,
            review_temperature: 0.2,
        }
    }
}

impl PipelineConfig {
    /// Create a pipeline configuration for the given model with default temperatures.
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..Default::default()
        }
    }

    /// Build the pipeline configuration from the application's translation settings.
    pub fn from_translation_config(config: &TranslationConfig) -> Self {
        Self {
            model: config.get_model(),
            translation_temperature: config.common.translation_temperature,
            feedback_temperature: config.common.feedback_temperature,
            review_temperature: config.common.review_temperature,
        }
    }
}

/// Main translation pipeline.
///
/// Holds no per-run state, so one instance can serve concurrent runs.
#[derive(Debug, Clone)]
pub struct TranslationPipeline {
    translator: Translator,
    feedback: FeedbackGenerator,
    reviewer: Reviewer,
}

impl TranslationPipeline {
    /// Create a pipeline whose stages share one provider.
    pub fn new(provider: Arc<dyn ChatProvider>, config: PipelineConfig) -> Self {
        Self {
            translator: Translator::new(
                Arc::clone(&provider),
                &config.model,
                config.translation_temperature,
            ),
            feedback: FeedbackGenerator::new(
                Arc::clone(&provider),
                &config.model,
                config.feedback_temperature,
            ),
            reviewer: Reviewer::new(provider, &config.model, config.review_temperature),
        }
    }

    /// Assemble a pipeline from individually configured stages.
    pub fn from_stages(translator: Translator, feedback: FeedbackGenerator, reviewer: Reviewer) -> Self {
        Self {
            translator,
            feedback,
            reviewer,
        }
    }

    /// Run the pipeline on `text`.
    pub async fn run(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<PipelineResult, PipelineError> {
        self.run_request(TranslationRequest::new(text, source_language, target_language))
            .await
    }

    /// Run the pipeline on a prepared request.
    pub async fn run_request(&self, request: TranslationRequest) -> Result<PipelineResult, PipelineError> {
        let run_id = Uuid::new_v4().simple().to_string()[..8].to_string();
        let start_time = Instant::now();
        let mut usage = TokenUsageStats::new();
        let text = request.source_text.as_str();
        let source = request.source_language.as_str();
        let target = request.target_language.as_str();

        info!(
            "[{}] Translating {} chars {} -> {}",
            run_id,
            text.chars().count(),
            source,
            target
        );

        let (draft, draft_usage) = self.translator.translate_with_usage(text, source, target).await?;
        usage.add(draft_usage);
        debug!("[{}] Draft ready after {:?}", run_id, start_time.elapsed());

        let (feedback, feedback_usage) = self
            .feedback
            .generate_feedback_with_usage(text, &draft, source, target)
            .await?;
        usage.add(feedback_usage);
        debug!(
            "[{}] Feedback ({}) ready after {:?}",
            run_id,
            feedback.report.decision,
            start_time.elapsed()
        );

        let (verdict, review_usage) = self
            .reviewer
            .review_with_usage(text, &draft, &feedback.payload, source, target)
            .await?;
        usage.add(review_usage);

        let status = PipelineStatus::from_decision(verdict.decision);
        let duration = start_time.elapsed();
        info!("[{}] Translation {} in {:?}", run_id, status, duration);
        debug!("[{}] Token usage: {}", run_id, usage.summary());

        Ok(PipelineResult {
            run_id,
            request,
            draft,
            feedback,
            verdict,
            status,
            usage,
            duration_ms: duration.as_millis() as u64,
        })
    }
}
