// src/error.rs
// Error type shared by the provider, the pipeline components and export

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Empty response from Gemini")]
    EmptyResponse,

    #[error("Malformed response from Gemini: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether the retry policy should try the operation again.
    ///
    /// Network failures, throttling, server-side errors and unusable model
    /// output are transient. Rejected requests (bad key, bad payload), local
    /// IO and input/config errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            PipelineError::Http(e) => !e.is_builder(),
            PipelineError::Api { status, .. } => {
                *status == 408 || *status == 429 || *status >= 500
            }
            PipelineError::EmptyResponse | PipelineError::MalformedResponse(_) => true,
            PipelineError::Config(_) | PipelineError::InvalidInput(_) | PipelineError::Io(_) => {
                false
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
