// src/lib.rs

pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod generation;
pub mod llm;
pub mod notice;
pub mod pipeline;
pub mod retry;
pub mod sentiment;

pub use config::AppConfig;
pub use error::{PipelineError, Result};
pub use generation::{AlignedTextGenerator, Generation, GenerationRequest, GenerationResult, StyleMode};
pub use llm::{GeminiModel, GeminiProvider, LlmProvider};
pub use notice::{Notice, NoticeLevel};
pub use pipeline::{PipelineOutcome, PipelineRequest, SentimentMode, SentimentPipeline};
pub use sentiment::{Classification, SentimentClassifier, SentimentLabel};
