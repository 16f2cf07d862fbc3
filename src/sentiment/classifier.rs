// src/sentiment/classifier.rs

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{sentiment_schema, SentimentLabel, SentimentResponse};
use crate::cache::TtlCache;
use crate::config::AppConfig;
use crate::error::{PipelineError, Result};
use crate::llm::LlmProvider;
use crate::notice::Notice;
use crate::retry::{retry_with_backoff, RetryPolicy};

/// Inputs shorter than this (after trimming) are not worth a remote call.
pub const MIN_CLASSIFIABLE_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationOrigin {
    /// Input too short, remote model not consulted
    ShortInput,
    Cached,
    Remote,
    /// Remote model failed on every attempt
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub label: SentimentLabel,
    pub origin: ClassificationOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl Classification {
    fn new(label: SentimentLabel, origin: ClassificationOrigin) -> Self {
        Self {
            label,
            origin,
            notice: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == ClassificationOrigin::Fallback
    }
}

pub fn build_classification_prompt(text: &str) -> String {
    format!(
        "Classify the sentiment of the following text as exactly one of: positive, negative, neutral.\n\nText: {}",
        text
    )
}

pub struct SentimentClassifier {
    provider: Arc<dyn LlmProvider>,
    retry: RetryPolicy,
    cache: TtlCache<String, SentimentLabel>,
    schema: Value,
}

impl SentimentClassifier {
    pub fn new(provider: Arc<dyn LlmProvider>, retry: RetryPolicy, cache_ttl: Duration) -> Self {
        Self {
            provider,
            retry,
            cache: TtlCache::new(cache_ttl),
            schema: sentiment_schema(),
        }
    }

    pub fn from_config(provider: Arc<dyn LlmProvider>, config: &AppConfig) -> Self {
        Self::new(provider, config.retry_policy(), config.sentiment_cache_ttl())
    }

    /// Classify `text` into one of the three labels.
    ///
    /// Transient remote failures never surface as errors: once the retry
    /// budget is spent the result degrades to `neutral` with a warning
    /// notice. Only non-transient failures (e.g. a rejected API key) are
    /// returned as `Err`.
    pub async fn classify(&self, text: &str) -> Result<Classification> {
        let key = text.trim();
        if key.chars().count() < MIN_CLASSIFIABLE_CHARS {
            debug!("Input shorter than {} chars, skipping classification", MIN_CLASSIFIABLE_CHARS);
            return Ok(Classification::new(SentimentLabel::Neutral, ClassificationOrigin::ShortInput));
        }

        if let Some(label) = self.cache.get(&key.to_string()) {
            debug!("Sentiment cache hit: {}", label);
            return Ok(Classification::new(label, ClassificationOrigin::Cached));
        }

        let prompt = build_classification_prompt(text);
        let result = retry_with_backoff(
            &self.retry,
            "Sentiment analysis",
            PipelineError::is_transient,
            |_| self.classify_once(&prompt),
        )
        .await;

        match result {
            Ok(label) => {
                info!("Detected sentiment via {}: {}", self.provider.model(), label);
                self.cache.insert(key.to_string(), label);
                Ok(Classification::new(label, ClassificationOrigin::Remote))
            }
            Err(e) if e.is_transient() => {
                warn!("Sentiment analysis degraded to neutral: {}", e);
                Ok(Classification {
                    label: SentimentLabel::Neutral,
                    origin: ClassificationOrigin::Fallback,
                    notice: Some(Notice::warning(format!("Error in sentiment analysis: {}", e))),
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn classify_once(&self, prompt: &str) -> Result<SentimentLabel> {
        let value = self.provider.generate_structured(prompt, &self.schema).await?;
        let response: SentimentResponse = serde_json::from_value(value)
            .map_err(|e| PipelineError::MalformedResponse(format!("unexpected sentiment payload: {}", e)))?;
        Ok(response.label())
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}
