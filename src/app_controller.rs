use anyhow::{Context, Result};
use log::{debug, error, info};
use std::sync::Arc;
use url::Url;

use crate::app_config::{Config, TranslationConfig, TranslationProvider};
use crate::errors::{AppError, InputError, ProviderError};
use crate::language_utils::resolve_language_name;
use crate::providers::ChatProvider;
use crate::providers::openai::OpenAI;
use crate::translation::{PipelineConfig, PipelineResult, TranslationPipeline};

// @module: Application controller sitting between the user-facing surfaces and the pipeline

/// Generic notice shown for any failed run
pub const FAILURE_NOTICE: &str = "Translation failed";

/// Hint shown next to the failure notice
pub const CREDENTIALS_HINT: &str = "Ensure OPENAI_API_KEY is set correctly in your .env file";

/// Character and word counts shown under the input box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputStats {
    pub characters: usize,
    pub words: usize,
}

impl InputStats {
    // @param text: Raw user input
    pub fn of(text: &str) -> Self {
        Self {
            characters: text.chars().count(),
            words: text.split_whitespace().count(),
        }
    }
}

/// Main application controller
///
/// Owns the configuration, the provider client and the pipeline built on it.
/// The CLI and the web form both go through `translate`, which applies the
/// input checks that the pipeline itself leaves to its caller.
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Shared chat client
    provider: Arc<dyn ChatProvider>,
    // @field: Stateless pipeline reused across runs
    pipeline: TranslationPipeline,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let provider = Self::build_provider(&config.translation)?;
        Ok(Self::with_provider(config, provider))
    }

    /// Create a controller around an existing provider
    pub fn with_provider(config: Config, provider: Arc<dyn ChatProvider>) -> Self {
        let pipeline_config = PipelineConfig::from_translation_config(&config.translation);
        debug!(
            "Pipeline model {} via {} (temperatures {}/{}/{})",
            pipeline_config.model,
            provider.name(),
            pipeline_config.translation_temperature,
            pipeline_config.feedback_temperature,
            pipeline_config.review_temperature
        );
        let pipeline = TranslationPipeline::new(Arc::clone(&provider), pipeline_config);
        Self {
            config,
            provider,
            pipeline,
        }
    }

    /// Build the chat client for the configured provider
    pub fn build_provider(config: &TranslationConfig) -> Result<Arc<dyn ChatProvider>> {
        let endpoint = config.get_endpoint();
        Url::parse(&endpoint)
            .with_context(|| format!("Invalid endpoint for {}: {}", config.provider.display_name(), endpoint))?;

        let api_key = match config.provider {
            // LM Studio often doesn't require an API key; send a placeholder if empty
            TranslationProvider::LMStudio if config.get_api_key().is_empty() => "lm-studio".to_string(),
            _ => config.get_api_key(),
        };

        let client = OpenAI::new_with_timeout(api_key, endpoint, config.get_timeout_secs())
            .with_display_name(config.provider.display_name());
        Ok(Arc::new(client))
    }

    /// Application configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The pipeline used for every run
    pub fn pipeline(&self) -> &TranslationPipeline {
        &self.pipeline
    }

    /// Reject input the pipeline should never see
    pub fn validate_input(&self, text: &str) -> Result<(), InputError> {
        if text.trim().is_empty() {
            return Err(InputError::Empty);
        }
        let max = self.config.translation.common.max_input_chars;
        let length = text.chars().count();
        if max > 0 && length > max {
            return Err(InputError::TooLong { length, max });
        }
        Ok(())
    }

    /// Validate the input and run one pipeline pass
    pub async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<PipelineResult, AppError> {
        self.validate_input(text)?;

        // Codes such as "fr" become display names; anything else is passed through
        let source = resolve_language_name(source_language).unwrap_or_else(|_| source_language.trim().to_string());
        let target = resolve_language_name(target_language).unwrap_or_else(|_| target_language.trim().to_string());

        match self.pipeline.run(text, &source, &target).await {
            Ok(result) => Ok(result),
            Err(e) => {
                error!("{} ({} -> {}): {}", FAILURE_NOTICE, source, target, e);
                Err(e.into())
            }
        }
    }

    /// Check that the provider answers
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        let model = self.config.translation.get_model();
        info!("Testing connection to {} with model {}", self.provider.name(), model);
        self.provider.test_connection(&model).await?;
        info!("Successfully connected to {}", self.provider.name());
        Ok(())
    }
}
