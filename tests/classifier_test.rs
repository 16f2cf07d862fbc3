// tests/classifier_test.rs
// Sentiment classification against a scripted provider

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use common::ScriptedProvider;
use tonesmith::retry::RetryPolicy;
use tonesmith::sentiment::ClassificationOrigin;
use tonesmith::{NoticeLevel, PipelineError, SentimentClassifier, SentimentLabel};

fn classifier(provider: Arc<ScriptedProvider>) -> SentimentClassifier {
    SentimentClassifier::new(provider, RetryPolicy::without_delay(3), Duration::from_secs(300))
}

// ============================================================================
// Remote classification
// ============================================================================

#[tokio::test]
async fn test_valid_label_returned() {
    let provider = Arc::new(ScriptedProvider::new().with_sentiment("negative"));
    let classifier = classifier(provider.clone());

    let result = classifier.classify("Traffic jams ruin my commute.").await.unwrap();

    assert_eq!(result.label, SentimentLabel::Negative);
    assert_eq!(result.origin, ClassificationOrigin::Remote);
    assert!(result.notice.is_none());
    assert_eq!(provider.structured_calls(), 1);

    let prompt = provider.last_prompt().unwrap();
    assert!(prompt.contains("exactly one of: positive, negative, neutral"));
    assert!(prompt.ends_with("Text: Traffic jams ruin my commute."));
}

#[tokio::test]
async fn test_short_input_skips_remote_call() {
    let provider = Arc::new(ScriptedProvider::new());
    let classifier = classifier(provider.clone());

    for text in ["", "hi", "  ok  "] {
        let result = classifier.classify(text).await.unwrap();
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.origin, ClassificationOrigin::ShortInput);
    }
    assert_eq!(provider.total_calls(), 0);
}

#[tokio::test]
async fn test_recovers_after_transient_failure() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.push_structured(Err(PipelineError::api(429, "slow down")));
    provider.push_structured(Ok(json!({ "sentiment": "positive" })));
    let classifier = classifier(provider.clone());

    let result = classifier.classify("I love sunny days at the beach.").await.unwrap();

    assert_eq!(result.label, SentimentLabel::Positive);
    assert_eq!(provider.structured_calls(), 2);
}

// ============================================================================
// Degradation
// ============================================================================

#[tokio::test]
async fn test_always_failing_provider_degrades_to_neutral() {
    let provider = Arc::new(ScriptedProvider::new());
    let classifier = classifier(provider.clone());

    let result = classifier.classify("What a day this has been").await.unwrap();

    assert_eq!(result.label, SentimentLabel::Neutral);
    assert!(result.is_fallback());
    assert_eq!(provider.structured_calls(), 3);

    let notice = result.notice.unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert!(notice.message.starts_with("Error in sentiment analysis:"));
}

#[tokio::test]
async fn test_malformed_payload_is_retried_then_neutral() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.push_structured(Ok(json!("positive")));
    for _ in 0..2 {
        provider.push_structured(Ok(json!({ "sentiment": 5 })));
    }
    let classifier = classifier(provider.clone());

    let result = classifier.classify("The weather today is mild.").await.unwrap();

    assert_eq!(result.label, SentimentLabel::Neutral);
    assert!(result.is_fallback());
    assert_eq!(provider.structured_calls(), 3);
}

#[tokio::test]
async fn test_missing_field_maps_to_neutral_without_retry() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.push_structured(Ok(json!({})));
    let classifier = classifier(provider.clone());

    let result = classifier.classify("The weather today is mild.").await.unwrap();

    assert_eq!(result.label, SentimentLabel::Neutral);
    assert_eq!(result.origin, ClassificationOrigin::Remote);
    assert!(result.notice.is_none());
    assert_eq!(provider.structured_calls(), 1);
}

#[tokio::test]
async fn test_unknown_label_maps_to_neutral() {
    let provider = Arc::new(ScriptedProvider::new().with_sentiment("ecstatic"));
    let classifier = classifier(provider.clone());

    let result = classifier.classify("Best birthday ever!").await.unwrap();

    assert_eq!(result.label, SentimentLabel::Neutral);
    assert_eq!(result.origin, ClassificationOrigin::Remote);
    assert_eq!(provider.structured_calls(), 1);
}

#[tokio::test]
async fn test_rejected_request_is_not_retried() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.push_structured(Err(PipelineError::api(401, "API key not valid")));
    let classifier = classifier(provider.clone());

    let err = classifier.classify("Anything at all").await.unwrap_err();

    assert!(matches!(err, PipelineError::Api { status: 401, .. }));
    assert_eq!(provider.structured_calls(), 1);
}

// ============================================================================
// Caching
// ============================================================================

#[tokio::test]
async fn test_repeat_input_served_from_cache() {
    let provider = Arc::new(ScriptedProvider::new().with_sentiment("positive"));
    let classifier = classifier(provider.clone());

    let first = classifier.classify("I love exploring new cities!").await.unwrap();
    let second = classifier.classify("  I love exploring new cities!  ").await.unwrap();

    assert_eq!(first.origin, ClassificationOrigin::Remote);
    assert_eq!(second.origin, ClassificationOrigin::Cached);
    assert_eq!(second.label, SentimentLabel::Positive);
    assert_eq!(provider.structured_calls(), 1);
    assert_eq!(classifier.cached_entries(), 1);
}

#[tokio::test]
async fn test_fallback_result_not_cached() {
    let provider = Arc::new(ScriptedProvider::new());
    let classifier = classifier(provider.clone());

    let first = classifier.classify("Mondays are the worst").await.unwrap();
    assert!(first.is_fallback());
    assert_eq!(classifier.cached_entries(), 0);

    provider.push_structured(Ok(json!({ "sentiment": "negative" })));
    let second = classifier.classify("Mondays are the worst").await.unwrap();

    assert_eq!(second.label, SentimentLabel::Negative);
    assert_eq!(second.origin, ClassificationOrigin::Remote);
    assert_eq!(provider.structured_calls(), 4);
}

#[tokio::test]
async fn test_expired_entry_triggers_new_call() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .with_sentiment("positive")
            .with_sentiment("negative"),
    );
    let classifier = SentimentClassifier::new(
        provider.clone(),
        RetryPolicy::without_delay(3),
        Duration::from_millis(20),
    );

    classifier.classify("Changeable mood today").await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let result = classifier.classify("Changeable mood today").await.unwrap();

    assert_eq!(result.label, SentimentLabel::Negative);
    assert_eq!(provider.structured_calls(), 2);
}
