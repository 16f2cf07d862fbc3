// src/llm/mod.rs
// Remote language-model collaborator: provider trait and model selection

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::Result;

pub mod gemini;

pub use gemini::GeminiProvider;

/// Models the tool may be pointed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GeminiModel {
    #[default]
    Flash25,
    Pro25,
}

impl GeminiModel {
    pub const ALL: [GeminiModel; 2] = [GeminiModel::Flash25, GeminiModel::Pro25];

    pub fn as_str(&self) -> &'static str {
        match self {
            GeminiModel::Flash25 => "gemini-2.5-flash",
            GeminiModel::Pro25 => "gemini-2.5-pro",
        }
    }
}

impl fmt::Display for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeminiModel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        GeminiModel::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown model '{}', expected one of: {}",
                    s,
                    GeminiModel::ALL.map(|m| m.as_str()).join(", ")
                )
            })
    }
}

/// The two call shapes the pipeline needs from a hosted model.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Model identifier sent with each request
    fn model(&self) -> &str;

    /// Schema-constrained call. The returned value conforms to `schema` as
    /// far as the remote model honors it; callers still validate fields.
    async fn generate_structured(&self, prompt: &str, schema: &Value) -> Result<Value>;

    /// Free-text call. Implementations reject empty output with
    /// `PipelineError::EmptyResponse`.
    async fn generate_text(&self, prompt: &str) -> Result<String>;
}
