//! Gemini provider
//!
//! Uses the `generateContent` endpoint for both call shapes. Structured calls
//! set `responseMimeType` and `responseSchema` so the model is constrained
//! to JSON matching the schema; free-text calls send no generation config.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{GeminiModel, LlmProvider};
use crate::config::AppConfig;
use crate::error::{PipelineError, Result};

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: GeminiModel,
    timeout: Duration,
}

impl GeminiProvider {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            timeout: config.request_timeout(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model.as_str())
    }

    async fn post(&self, request: &GeminiRequest<'_>) -> Result<String> {
        let start = Instant::now();

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::api(status.as_u16(), error_message(&body)));
        }

        let api_response: GeminiResponse = response.json().await?;
        debug!(
            "Gemini {} responded in {}ms",
            self.model,
            start.elapsed().as_millis()
        );

        if let Some(error) = api_response.error {
            return Err(PipelineError::api(error.code.unwrap_or(500), error.message));
        }

        let text = api_response.text();
        if text.trim().is_empty() {
            return Err(PipelineError::EmptyResponse);
        }
        Ok(text)
    }
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig<'a>>,
}

impl<'a> GeminiRequest<'a> {
    fn new(prompt: &'a str, generation_config: Option<GeminiGenerationConfig<'a>>) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiTextPart { text: prompt }],
            }],
            generation_config,
        }
    }
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiTextPart<'a>>,
}

#[derive(Serialize)]
struct GeminiTextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GeminiGenerationConfig<'a> {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'a str,
    #[serde(rename = "responseSchema")]
    response_schema: &'a Value,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

impl GeminiResponse {
    /// Text of the first candidate, parts concatenated
    fn text(self) -> String {
        self.candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    code: Option<u16>,
    message: String,
}

#[derive(Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiError,
}

/// Prefer the API's own error message over the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<GeminiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.chars().take(500).collect())
}

/// Parse structured output, tolerating a markdown fence around the JSON
fn parse_structured(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    let json_str = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed);

    serde_json::from_str(json_str).map_err(|e| {
        PipelineError::MalformedResponse(format!(
            "{}. Input: {}",
            e,
            json_str.chars().take(200).collect::<String>()
        ))
    })
}

// ============================================================================
// Provider Implementation
// ============================================================================

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        self.model.as_str()
    }

    async fn generate_structured(&self, prompt: &str, schema: &Value) -> Result<Value> {
        let request = GeminiRequest::new(
            prompt,
            Some(GeminiGenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            }),
        );
        let text = self.post(&request).await?;
        parse_structured(&text)
    }

    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let request = GeminiRequest::new(prompt, None);
        let text = self.post(&request).await?;
        Ok(text.trim().to_string())
    }
}
