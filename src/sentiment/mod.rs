// src/sentiment/mod.rs
// Sentiment labels and the structured-output contract used to obtain them

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

pub mod classifier;

pub use classifier::{Classification, ClassificationOrigin, SentimentClassifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }

    /// Lenient conversion for model output: anything that is not one of the
    /// three labels (after trimming and lowercasing) becomes `Neutral`.
    pub fn from_model_output(raw: &str) -> Self {
        raw.parse().unwrap_or(SentimentLabel::Neutral)
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parsing, for labels a caller picks by hand
impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            other => Err(format!(
                "unknown sentiment '{}', expected positive, negative or neutral",
                other
            )),
        }
    }
}

/// Shape of the classifier's structured response
#[derive(Debug, Clone, Deserialize)]
pub struct SentimentResponse {
    #[serde(default)]
    pub sentiment: Option<String>,
}

impl SentimentResponse {
    pub fn label(&self) -> SentimentLabel {
        self.sentiment
            .as_deref()
            .map(SentimentLabel::from_model_output)
            .unwrap_or_default()
    }
}

/// JSON schema the model's output is constrained to
pub fn sentiment_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "sentiment": {
                "type": "string",
                "enum": SentimentLabel::ALL.map(|l| l.as_str())
            }
        },
        "required": ["sentiment"]
    })
}
