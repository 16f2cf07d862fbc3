// src/generation/mod.rs
// Style-conditioned text generation aligned to a sentiment label

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::AppConfig;
use crate::error::{PipelineError, Result};
use crate::llm::LlmProvider;
use crate::notice::Notice;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::sentiment::SentimentLabel;

pub mod exemplars;
pub mod prompt;

pub use exemplars::{ExampleBank, Exemplar};
pub use prompt::{build_generation_prompt, Prompt, PromptBuilder, PromptSection};

/// Returned in place of generated text once every attempt has failed.
pub const FALLBACK_TEXT: &str = "Generation failed. Please try again.";

pub const MIN_WORD_COUNT: u32 = 50;
pub const MAX_WORD_COUNT: u32 = 500;
pub const DEFAULT_WORD_COUNT: u32 = 200;
/// Below this target the model is asked for a paragraph, otherwise a short essay.
pub const PARAGRAPH_WORD_LIMIT: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StyleMode {
    /// Simplified for a young audience, with humor and emojis
    #[default]
    Playful,
    /// Professional, no slang, jokes or emojis
    Formal,
}

impl StyleMode {
    /// Canonical short name
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleMode::Playful => "ELI10",
            StyleMode::Formal => "Normal",
        }
    }

    /// Label shown to users and recorded in exports
    pub fn display_label(&self) -> &'static str {
        match self {
            StyleMode::Playful => "ELI10 (Fun & Emojis)",
            StyleMode::Formal => "Normal (Formal)",
        }
    }

    /// Case- and whitespace-insensitive; decorative suffixes such as
    /// " (Fun & Emojis)" are ignored. Anything that mentions ELI10 (or says
    /// "playful") is the playful style, everything else is formal.
    pub fn normalize(raw: &str) -> Self {
        let upper = raw.trim().to_uppercase();
        if upper.contains("ELI10") || upper.starts_with("PLAYFUL") {
            StyleMode::Playful
        } else {
            StyleMode::Formal
        }
    }
}

impl fmt::Display for StyleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleMode {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(StyleMode::normalize(s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub original_text: String,
    pub sentiment: SentimentLabel,
    pub word_count: u32,
    pub style: StyleMode,
}

impl GenerationRequest {
    pub fn new(
        sentiment: SentimentLabel,
        original_text: impl Into<String>,
        word_count: u32,
        style: StyleMode,
    ) -> Self {
        Self {
            original_text: original_text.into(),
            sentiment,
            word_count,
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub text: String,
    pub approximate_word_count: usize,
}

impl GenerationResult {
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let approximate_word_count = text.split_whitespace().count();
        Self {
            text,
            approximate_word_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generation {
    pub result: GenerationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl Generation {
    pub fn is_fallback(&self) -> bool {
        self.notice.is_some() && self.result.text == FALLBACK_TEXT
    }
}

/// Generates prose for a sentiment label. Never memoized: the same request
/// may legitimately produce different text each time.
pub struct AlignedTextGenerator {
    provider: Arc<dyn LlmProvider>,
    retry: RetryPolicy,
}

impl AlignedTextGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    pub fn from_config(provider: Arc<dyn LlmProvider>, config: &AppConfig) -> Self {
        Self::new(provider, config.retry_policy())
    }

    /// Generate text for `request`. Transient failures degrade to
    /// `FALLBACK_TEXT` with an error notice; non-transient ones are returned.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
        let prompt = build_generation_prompt(request);
        let prompt_text = prompt.text();
        debug!(
            "Generation prompt: sentiment={}, style={}, words={}, {} chars",
            request.sentiment,
            request.style,
            request.word_count,
            prompt_text.len()
        );

        let result = retry_with_backoff(
            &self.retry,
            "Text generation",
            PipelineError::is_transient,
            |_| self.generate_once(&prompt_text),
        )
        .await;

        match result {
            Ok(text) => {
                let result = GenerationResult::from_text(text);
                info!(
                    "Generated ~{} words ({} target) via {}",
                    result.approximate_word_count,
                    request.word_count,
                    self.provider.model()
                );
                Ok(Generation {
                    result,
                    notice: None,
                })
            }
            Err(e) if e.is_transient() => {
                error!("Text generation failed, returning fallback: {}", e);
                Ok(Generation {
                    result: GenerationResult::from_text(FALLBACK_TEXT),
                    notice: Some(Notice::error(format!("Error in text generation: {}", e))),
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn generate_once(&self, prompt: &str) -> Result<String> {
        let text = self.provider.generate_text(prompt).await?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::EmptyResponse);
        }
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_normalization() {
        for raw in ["ELI10 (Fun & Emojis)", "eli10", "ELI10", "  Eli10  ", "playful"] {
            assert_eq!(StyleMode::normalize(raw), StyleMode::Playful, "{raw}");
        }
        for raw in ["Normal (Formal)", "normal", "NORMAL", "formal"] {
            assert_eq!(StyleMode::normalize(raw), StyleMode::Formal, "{raw}");
        }
        assert_eq!("eli10".parse::<StyleMode>().unwrap(), StyleMode::Playful);
    }

    #[test]
    fn test_style_labels() {
        assert_eq!(StyleMode::Playful.to_string(), "ELI10");
        assert_eq!(StyleMode::Formal.display_label(), "Normal (Formal)");
        assert_eq!(StyleMode::normalize(StyleMode::Playful.display_label()), StyleMode::Playful);
    }

    #[test]
    fn test_word_count_estimate() {
        let result = GenerationResult::from_text("One two  three\nfour");
        assert_eq!(result.approximate_word_count, 4);
        assert_eq!(GenerationResult::from_text("").approximate_word_count, 0);
    }
}
