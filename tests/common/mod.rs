// tests/common/mod.rs
// Scripted LlmProvider shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};

use tonesmith::{LlmProvider, PipelineError, Result};

/// Replays queued responses in order. Once a queue runs dry every further
/// call fails with a 503, which the pipeline treats as transient.
#[derive(Default)]
pub struct ScriptedProvider {
    structured: Mutex<VecDeque<Result<Value>>>,
    text: Mutex<VecDeque<Result<String>>>,
    structured_calls: AtomicUsize,
    text_calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sentiment(self, label: &str) -> Self {
        self.push_structured(Ok(json!({ "sentiment": label })));
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.push_text(Ok(text.to_string()));
        self
    }

    pub fn push_structured(&self, response: Result<Value>) {
        self.structured.lock().unwrap().push_back(response);
    }

    pub fn push_text(&self, response: Result<String>) {
        self.text.lock().unwrap().push_back(response);
    }

    pub fn structured_calls(&self) -> usize {
        self.structured_calls.load(Ordering::SeqCst)
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.structured_calls() + self.text_calls()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }

    fn record(&self, prompt: &str) {
        self.prompts.lock().unwrap().push(prompt.to_string());
    }
}

fn unavailable() -> PipelineError {
    PipelineError::api(503, "scripted provider exhausted")
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn generate_structured(&self, prompt: &str, _schema: &Value) -> Result<Value> {
        self.structured_calls.fetch_add(1, Ordering::SeqCst);
        self.record(prompt);
        self.structured
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }

    async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.record(prompt);
        self.text
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }
}
