/*!
 * Tests for application configuration functionality
 */

use std::str::FromStr;

use log::LevelFilter;
use reflexlate::app_config::{Config, LogLevel, OPENAI_API_KEY_ENV, TranslationProvider};

use crate::common::{config_path, create_temp_dir, test_config};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "English");
    assert_eq!(config.target_language, "French");
    assert_eq!(config.translation.provider, TranslationProvider::OpenAI);
    assert_eq!(config.server.bind_address, "127.0.0.1:8501");
    assert_eq!(config.log_level, LogLevel::Info);

    let common = &config.translation.common;
    assert!((common.translation_temperature - 0.3).abs() < f32::EPSILON);
    assert!((common.feedback_temperature - 0.2).abs() < f32::EPSILON);
    assert!((common.review_temperature - 0.2).abs() < f32::EPSILON);
    assert_eq!(common.max_input_chars, 6000);

    let openai = config
        .translation
        .get_provider_config(&TranslationProvider::OpenAI)
        .expect("OpenAI provider config should exist");
    assert_eq!(openai.model, "gpt-4o-mini");
    assert_eq!(openai.endpoint, "https://api.openai.com/v1");
    assert!(openai.api_key.is_empty());
}

#[test]
fn test_validate_withDefaultsAndKey_shouldPass() {
    assert!(test_config().validate().is_ok());
}

#[test]
fn test_validate_withoutOpenAiKey_shouldFail() {
    let err = Config::default().validate().unwrap_err();
    assert!(err.to_string().contains(OPENAI_API_KEY_ENV));
}

#[test]
fn test_validate_withLmStudioAndNoKey_shouldPass() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::LMStudio;
    assert!(config.validate().is_ok());
    assert_eq!(config.translation.get_endpoint(), "http://localhost:1234/v1");
}

#[test]
fn test_validate_withVariousLanguages_shouldValidateCorrectly() {
    let mut config = test_config();

    config.source_language = "notalanguage".to_string();
    assert!(config.validate().is_err());

    config.source_language = "en".to_string();
    config.target_language = "fr".to_string();
    assert!(config.validate().is_ok());

    config.target_language = "english".to_string();
    assert!(config.validate().is_err(), "same language on both sides");

    config.target_language = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withOutOfRangeTemperature_shouldFail() {
    let mut config = test_config();
    config.translation.common.review_temperature = 2.5;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("review temperature"));
}

#[test]
fn test_validate_withZeroInputCap_shouldFail() {
    let mut config = test_config();
    config.translation.common.max_input_chars = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = config_path(dir.path());

    let config = Config::load_or_create(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config.source_language, "English");
    let reloaded = Config::load_or_create(&path).unwrap();
    assert_eq!(reloaded.translation.get_model(), "gpt-4o-mini");
}

#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = config_path(dir.path());
    std::fs::write(
        &path,
        r#"{
            "source_language": "French",
            "target_language": "English",
            "translation": {
                "provider": "lmstudio",
                "available_providers": [{"type": "lmstudio", "model": "qwen2.5-7b-instruct"}],
                "common": {"translation_temperature": 0.5}
            },
            "log_level": "debug"
        }"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config.translation.provider, TranslationProvider::LMStudio);
    assert_eq!(config.translation.get_model(), "qwen2.5-7b-instruct");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:1234/v1");
    assert!((config.translation.common.translation_temperature - 0.5).abs() < f32::EPSILON);
    assert!((config.translation.common.review_temperature - 0.2).abs() < f32::EPSILON);
    assert_eq!(config.server.bind_address, "127.0.0.1:8501");
    assert_eq!(config.log_level, LogLevel::Debug);
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFailWithPath() {
    let dir = create_temp_dir().unwrap();
    let path = config_path(dir.path());
    std::fs::write(&path, "{ not json").unwrap();

    let err = Config::load_or_create(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_applyEnv_withEmptyKey_shouldFillFromEnvironment() {
    let mut config = Config::default();
    config.apply_env(|key| (key == OPENAI_API_KEY_ENV).then(|| " sk-from-env ".to_string()));

    assert_eq!(config.translation.get_api_key(), "sk-from-env");
    assert!(config.validate().is_ok());
}

#[test]
fn test_applyEnv_withKeyInFile_shouldKeepFileValue() {
    let mut config = test_config();
    config.apply_env(|_| Some("sk-from-env".to_string()));
    assert_eq!(config.translation.get_api_key(), "sk-test");
}

#[test]
fn test_applyEnv_withMissingOpenAiEntry_shouldInsertIt() {
    let mut config = Config::default();
    config.translation.available_providers.clear();
    config.apply_env(|_| Some("sk-from-env".to_string()));

    let openai = config
        .translation
        .get_provider_config(&TranslationProvider::OpenAI)
        .expect("entry should be inserted");
    assert_eq!(openai.api_key, "sk-from-env");
    assert_eq!(openai.model, "gpt-4o-mini");
}

#[test]
fn test_translationProvider_fromStr_shouldParseKnownNames() {
    assert_eq!(TranslationProvider::from_str("OpenAI").unwrap(), TranslationProvider::OpenAI);
    assert_eq!(TranslationProvider::from_str("lmstudio").unwrap(), TranslationProvider::LMStudio);
    assert!(TranslationProvider::from_str("ollama").is_err());
    assert_eq!(TranslationProvider::LMStudio.to_string(), "lmstudio");
    assert_eq!(TranslationProvider::LMStudio.display_name(), "LM Studio");
}

#[test]
fn test_logLevel_toLevelFilter_shouldMatch() {
    assert_eq!(LogLevel::Warn.to_level_filter(), LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), LevelFilter::Trace);
}
