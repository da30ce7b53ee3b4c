/*!
 * Tests for the application controller
 */

use reflexlate::app_config::TranslationProvider;
use reflexlate::app_controller::{Controller, InputStats};
use reflexlate::errors::{AppError, InputError, PipelineError};
use reflexlate::providers::mock::{MockFailure, MockProvider};
use reflexlate::translation::PipelineStatus;

use crate::common::{controller_with, test_config};

#[test]
fn test_inputStats_withMixedWhitespace_shouldCountCharsAndWords() {
    let stats = InputStats::of("  Héllo,\n how are  you? ");
    assert_eq!(stats.words, 4);
    assert_eq!(stats.characters, 24);
    assert_eq!(InputStats::of(""), InputStats { characters: 0, words: 0 });
}

#[test]
fn test_validateInput_withBlankText_shouldRejectAsEmpty() {
    let controller = controller_with(MockProvider::working());
    assert_eq!(controller.validate_input(" \n\t "), Err(InputError::Empty));
}

#[test]
fn test_validateInput_atAndOverLimit_shouldCountCharacters() {
    let mut config = test_config();
    config.translation.common.max_input_chars = 5;
    let controller = Controller::with_provider(config, std::sync::Arc::new(MockProvider::working()));

    // Multi-byte characters count once
    assert!(controller.validate_input("ééééé").is_ok());
    assert_eq!(
        controller.validate_input("éééééé"),
        Err(InputError::TooLong { length: 6, max: 5 })
    );
}

#[tokio::test]
async fn test_translate_withRejectedInput_shouldNotCallProvider() {
    let provider = MockProvider::working();
    let controller = controller_with(provider.clone());

    let err = controller.translate("   ", "English", "French").await.unwrap_err();

    assert!(matches!(err, AppError::Input(InputError::Empty)));
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_translate_withLanguageCodes_shouldPassDisplayNamesToPipeline() {
    let provider = MockProvider::working();
    let controller = controller_with(provider.clone());

    let result = controller.translate("Good morning", "en", "fr").await.unwrap();

    assert_eq!(result.request.source_language, "English");
    assert_eq!(result.request.target_language, "French");
    assert_eq!(result.status, PipelineStatus::Accepted);
    assert!(provider.requests()[0].content_for_role("system").contains("French"));
}

#[tokio::test]
async fn test_translate_withProviderFailure_shouldWrapPipelineError() {
    let controller = controller_with(MockProvider::failing_with(MockFailure::Auth));

    let err = controller.translate("Hello", "English", "French").await.unwrap_err();

    assert!(matches!(err, AppError::Pipeline(ref e) if e.is_transport()));
    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn test_translate_withEmptyDraft_shouldReportEmptyResponse() {
    let controller = controller_with(MockProvider::empty());

    let err = controller.translate("Hello", "English", "French").await.unwrap_err();

    assert!(matches!(err, AppError::Pipeline(PipelineError::EmptyResponse { .. })));
}

#[tokio::test]
async fn test_testConnection_shouldUseConfiguredModel() {
    let provider = MockProvider::working();
    let controller = controller_with(provider.clone());

    controller.test_connection().await.unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model, "gpt-4o-mini");
}

#[test]
fn test_withConfig_withLmStudio_shouldBuildNamedProvider() {
    let mut config = test_config();
    config.translation.provider = TranslationProvider::LMStudio;

    let controller = Controller::with_config(config).unwrap();

    assert_eq!(controller.config().translation.get_model(), "local-model");
}

#[test]
fn test_buildProvider_withInvalidEndpoint_shouldFail() {
    let mut config = test_config();
    config
        .translation
        .provider_config_mut(&TranslationProvider::OpenAI)
        .endpoint = "not a url".to_string();

    let err = Controller::build_provider(&config.translation).unwrap_err();
    assert!(err.to_string().contains("Invalid endpoint"));
}
