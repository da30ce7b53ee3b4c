/*!
 * End-to-end pipeline runs against the scripted mock provider
 */

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use reflexlate::errors::PipelineError;
use reflexlate::providers::mock::{MockFailure, MockProvider, MockReply};
use reflexlate::translation::{Decision, PipelineConfig, PipelineStatus, TranslationPipeline};

use crate::common::{ACCEPT_FEEDBACK, REVISE_FEEDBACK, scripted_run, verdict_json};

fn pipeline(provider: &MockProvider) -> TranslationPipeline {
    TranslationPipeline::new(Arc::new(provider.clone()), PipelineConfig::default())
}

#[tokio::test]
async fn test_run_withHelloScenario_shouldProduceFrenchGreeting() {
    let provider = scripted_run(
        "Bonjour, comment allez-vous ?",
        REVISE_FEEDBACK,
        "Bonjour, comment allez-vous aujourd'hui ?",
        "REVISE",
    );

    let result = pipeline(&provider)
        .run("Hello, how are you today?", "English", "French")
        .await
        .unwrap();

    let translation = result.final_translation().to_lowercase();
    assert!(translation.contains("bonjour") || translation.contains("comment"));
    assert_eq!(result.status, PipelineStatus::Revised);
    assert_eq!(result.feedback.report.decision, Decision::Revise);
    assert!(!result.feedback.report.checks.meaning_ok);
    assert_eq!(provider.request_count(), 3);
}

#[tokio::test]
async fn test_run_withWorkingProvider_shouldReturnNonEmptyTranslation() {
    let provider = MockProvider::working();

    let result = pipeline(&provider).run("Good morning", "English", "French").await.unwrap();

    assert!(!result.final_translation().trim().is_empty());
    assert!(!result.draft.is_empty());
    assert!(result.is_accepted());
    assert_eq!(result.usage.reported_calls, 3);
    assert_eq!(
        result.usage.total_tokens,
        result.usage.prompt_tokens + result.usage.completion_tokens
    );
}

#[tokio::test]
async fn test_run_statusShouldFollowReviewerOnly() {
    let cases = [
        (ACCEPT_FEEDBACK, "ACCEPT", PipelineStatus::Accepted),
        (ACCEPT_FEEDBACK, "REVISE", PipelineStatus::Revised),
        (REVISE_FEEDBACK, "ACCEPT", PipelineStatus::Accepted),
        (REVISE_FEEDBACK, "REVISE", PipelineStatus::Revised),
    ];

    for (feedback, decision, expected) in cases {
        let provider = scripted_run("Bonjour", feedback, "Bonjour !", decision);
        let result = pipeline(&provider).run("Hello", "English", "French").await.unwrap();
        assert_eq!(result.status, expected, "feedback {} / reviewer {}", feedback, decision);
        assert_eq!(provider.request_count(), 3, "reviewer must always run");
    }
}

#[tokio::test]
async fn test_run_withTranslatorFailure_shouldSkipLaterStages() {
    let provider = MockProvider::scripted(vec![
        MockReply::Fail(MockFailure::Connection),
        MockReply::text(ACCEPT_FEEDBACK),
        MockReply::text(verdict_json("Bonjour", "ACCEPT")),
    ]);

    let err = pipeline(&provider).run("Hello", "English", "French").await.unwrap_err();

    assert!(err.is_transport());
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_run_withEmptyDraft_shouldSkipLaterStages() {
    let provider = MockProvider::scripted(vec![MockReply::text("   "), MockReply::text(ACCEPT_FEEDBACK)]);

    let err = pipeline(&provider).run("Hello", "English", "French").await.unwrap_err();

    assert!(matches!(err, PipelineError::EmptyResponse { .. }));
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_run_withMalformedFeedback_shouldNotCallReviewer() {
    let provider = MockProvider::scripted(vec![
        MockReply::text("Bonjour"),
        MockReply::text("Looks good to me!"),
        MockReply::text(verdict_json("Bonjour", "ACCEPT")),
    ]);

    let err = pipeline(&provider).run("Hello", "English", "French").await.unwrap_err();

    assert!(matches!(err, PipelineError::MalformedFeedback(_)));
    assert_eq!(provider.request_count(), 2);
}

#[tokio::test]
async fn test_run_withUnparseableVerdict_shouldFailWithoutResult() {
    let provider = MockProvider::scripted(vec![
        MockReply::text("Bonjour"),
        MockReply::text(ACCEPT_FEEDBACK),
        MockReply::text("I agree with the feedback, the draft is fine."),
    ]);

    let err = pipeline(&provider).run("Hello", "English", "French").await.unwrap_err();

    assert!(matches!(err, PipelineError::MalformedVerdict(_)));
    assert!(err.is_malformed());
    assert_eq!(provider.request_count(), 3);
}

#[tokio::test]
async fn test_run_withReviewerTransportError_shouldSurfaceIt() {
    let provider = MockProvider::scripted(vec![
        MockReply::text("Bonjour"),
        MockReply::text(ACCEPT_FEEDBACK),
        MockReply::Fail(MockFailure::RateLimit),
    ]);

    let err = pipeline(&provider).run("Hello", "English", "French").await.unwrap_err();

    assert!(err.is_transport());
    assert!(err.to_string().contains("Rate limit"));
}

#[tokio::test]
async fn test_run_withFencedJsonReplies_shouldParseBothPayloads() {
    let provider = MockProvider::scripted(vec![
        MockReply::text("Bonjour"),
        MockReply::text(format!("Here is my evaluation:\n```json\n{}\n```", ACCEPT_FEEDBACK)),
        MockReply::text(format!("```\n{}\n```", verdict_json("Bonjour", "ACCEPT"))),
    ]);

    let result = pipeline(&provider).run("Hello", "English", "French").await.unwrap();

    assert_eq!(result.feedback.payload, ACCEPT_FEEDBACK);
    assert_eq!(result.final_translation(), "Bonjour");
    let review_prompt = provider.requests()[2].content_for_role("user");
    assert!(review_prompt.contains(ACCEPT_FEEDBACK));
    assert!(!review_prompt.contains("Here is my evaluation"));
}

#[tokio::test]
async fn test_run_withSeveralFencedFeedbackBlocks_shouldUseFirstObject() {
    let provider = MockProvider::scripted(vec![
        MockReply::text("Bonjour"),
        MockReply::text(format!(
            "```json\n{}\n```\nAlternative:\n```json\n{}\n```",
            ACCEPT_FEEDBACK, REVISE_FEEDBACK
        )),
        MockReply::text(verdict_json("Bonjour", "ACCEPT")),
    ]);

    let result = pipeline(&provider).run("Hello", "English", "French").await.unwrap();

    assert_eq!(result.feedback.report.decision, Decision::Accept);
    assert_eq!(result.feedback.payload, ACCEPT_FEEDBACK);
    assert_eq!(provider.request_count(), 3);
}

#[tokio::test]
async fn test_run_concurrently_shouldKeepRunsIndependent() {
    let provider = MockProvider::working();
    let pipeline = Arc::new(pipeline(&provider));
    let inputs = ["One", "Two", "Three", "Four", "Five"];

    let runs = inputs.iter().map(|text| {
        let pipeline = Arc::clone(&pipeline);
        async move { pipeline.run(text, "English", "French").await }
    });
    let results: Vec<_> = join_all(runs).await.into_iter().collect::<Result<_, _>>().unwrap();

    assert_eq!(provider.request_count(), inputs.len() * 3);
    for (text, result) in inputs.iter().zip(&results) {
        assert_eq!(result.request.source_text, *text);
        assert!(result.final_translation().ends_with(text));
    }
    let run_ids: HashSet<_> = results.iter().map(|r| r.run_id.as_str()).collect();
    assert_eq!(run_ids.len(), inputs.len());
}
