// src/pipeline.rs
// One user interaction: validate, classify (or take a manual label), generate

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::AppConfig;
use crate::error::{PipelineError, Result};
use crate::generation::{
    AlignedTextGenerator, GenerationRequest, GenerationResult, StyleMode, MAX_WORD_COUNT,
    MIN_WORD_COUNT,
};
use crate::llm::LlmProvider;
use crate::notice::Notice;
use crate::sentiment::{SentimentClassifier, SentimentLabel};

pub const BLANK_INPUT_MESSAGE: &str = "Please enter a prompt.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SentimentMode {
    #[default]
    Auto,
    Manual(SentimentLabel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentSource {
    Detected,
    Manual,
}

#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub text: String,
    pub mode: SentimentMode,
    pub word_count: u32,
    pub style: StyleMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub original_text: String,
    pub sentiment: SentimentLabel,
    pub sentiment_source: SentimentSource,
    pub style: StyleMode,
    pub word_count: u32,
    pub generated: GenerationResult,
    /// Set only when every generation attempt failed and `generated` holds
    /// the fallback text.
    pub generation_fallback: bool,
    pub notices: Vec<Notice>,
}

impl PipelineOutcome {
    pub fn generation_failed(&self) -> bool {
        self.generation_fallback
    }
}

/// Reject input that should never reach the remote model.
pub fn validate_request(request: &PipelineRequest) -> Result<()> {
    if request.text.trim().is_empty() {
        return Err(PipelineError::InvalidInput(BLANK_INPUT_MESSAGE.to_string()));
    }
    if !(MIN_WORD_COUNT..=MAX_WORD_COUNT).contains(&request.word_count) {
        return Err(PipelineError::InvalidInput(format!(
            "Word count must be between {} and {}, got {}.",
            MIN_WORD_COUNT, MAX_WORD_COUNT, request.word_count
        )));
    }
    Ok(())
}

pub struct SentimentPipeline {
    classifier: SentimentClassifier,
    generator: AlignedTextGenerator,
}

impl SentimentPipeline {
    pub fn new(classifier: SentimentClassifier, generator: AlignedTextGenerator) -> Self {
        Self {
            classifier,
            generator,
        }
    }

    /// Both components share one provider and the config's retry policy.
    pub fn from_config(provider: Arc<dyn LlmProvider>, config: &AppConfig) -> Self {
        Self::new(
            SentimentClassifier::from_config(provider.clone(), config),
            AlignedTextGenerator::from_config(provider, config),
        )
    }

    pub fn classifier(&self) -> &SentimentClassifier {
        &self.classifier
    }

    pub async fn run(&self, request: &PipelineRequest) -> Result<PipelineOutcome> {
        validate_request(request)?;

        let mut notices = Vec::new();

        let (sentiment, sentiment_source) = match request.mode {
            SentimentMode::Manual(label) => {
                notices.push(Notice::info(format!("Using manual sentiment: {}", label)));
                (label, SentimentSource::Manual)
            }
            SentimentMode::Auto => {
                let classification = self.classifier.classify(&request.text).await?;
                notices.extend(classification.notice);
                notices.push(Notice::info(format!(
                    "Detected sentiment: {}",
                    classification.label
                )));
                (classification.label, SentimentSource::Detected)
            }
        };

        let generation_request = GenerationRequest::new(
            sentiment,
            request.text.clone(),
            request.word_count,
            request.style,
        );
        let generation = self.generator.generate(&generation_request).await?;
        let generation_fallback = generation.is_fallback();
        notices.extend(generation.notice);

        info!(
            "Pipeline finished: sentiment={} ({:?}), style={}, ~{} words",
            sentiment, sentiment_source, request.style, generation.result.approximate_word_count
        );

        Ok(PipelineOutcome {
            original_text: request.text.clone(),
            sentiment,
            sentiment_source,
            style: request.style,
            word_count: request.word_count,
            generated: generation.result,
            generation_fallback,
            notices,
        })
    }
}
