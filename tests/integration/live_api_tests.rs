/*!
 * Runs against the real OpenAI API
 *
 * Ignored by default; run with `cargo test -- --ignored` and OPENAI_API_KEY set.
 */

use reflexlate::app_config::Config;
use reflexlate::app_controller::Controller;

#[tokio::test]
#[ignore = "calls the OpenAI API"]
async fn test_translate_withLiveApi_shouldGreetInFrench() {
    let _ = dotenvy::dotenv();
    let mut config = Config::default();
    config.apply_env(|key| std::env::var(key).ok());
    config.validate().expect("OPENAI_API_KEY must be set");

    let controller = Controller::with_config(config).unwrap();
    let result = controller
        .translate("Hello, how are you today?", "English", "French")
        .await
        .unwrap();

    let translation = result.final_translation().to_lowercase();
    assert!(!translation.trim().is_empty());
    assert!(translation.contains("bonjour") || translation.contains("comment"));
}
