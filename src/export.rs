// src/export.rs
// Formatting of a finished result for download or disk

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Local};
use tracing::info;

use crate::error::Result;
use crate::generation::StyleMode;
use crate::pipeline::PipelineOutcome;
use crate::sentiment::SentimentLabel;

pub const EXPORT_TITLE: &str = "AI Sentiment Text Generator";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Formatted Markdown document
    #[default]
    Document,
    PlainText,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Document => "md",
            ExportFormat::PlainText => "txt",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Document => "text/markdown",
            ExportFormat::PlainText => "text/plain",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "document" | "doc" | "md" | "markdown" => Ok(ExportFormat::Document),
            "text" | "txt" | "plain" => Ok(ExportFormat::PlainText),
            other => Err(format!("unknown export format '{}', expected document or text", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportRecord {
    pub original_text: String,
    pub sentiment: SentimentLabel,
    pub style: StyleMode,
    pub generated_text: String,
    pub word_count: usize,
    pub timestamp: DateTime<Local>,
}

impl ExportRecord {
    pub fn from_outcome(outcome: &PipelineOutcome, timestamp: DateTime<Local>) -> Self {
        Self {
            original_text: outcome.original_text.clone(),
            sentiment: outcome.sentiment,
            style: outcome.style,
            generated_text: outcome.generated.text.clone(),
            word_count: outcome.generated.approximate_word_count,
            timestamp,
        }
    }

    /// `sentiment_text_{sentiment}_{style}_{YYYYmmdd_HHMMSS}.{ext}`
    pub fn filename(&self, format: ExportFormat) -> String {
        format!(
            "sentiment_text_{}_{}_{}.{}",
            self.sentiment,
            self.style.display_label().to_lowercase().replace(' ', "_"),
            self.timestamp.format("%Y%m%d_%H%M%S"),
            format.extension()
        )
    }

    fn footer(&self) -> String {
        format!(
            "Generated on {} | ~{} words",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.word_count
        )
    }

    pub fn render(&self, format: ExportFormat) -> String {
        match format {
            ExportFormat::Document => format!(
                "# {title}\n\n**Original Prompt:** {original}\n\n**Sentiment:** {sentiment}\n\n**Style:** {style}\n\n## Generated Text\n\n{generated}\n\n---\n\n*{footer}*\n",
                title = EXPORT_TITLE,
                original = self.original_text,
                sentiment = self.sentiment,
                style = self.style.display_label(),
                generated = self.generated_text,
                footer = self.footer(),
            ),
            ExportFormat::PlainText => format!(
                "{title}\n\nOriginal Prompt: {original}\nSentiment: {sentiment}\nStyle: {style}\n\nGenerated Text:\n{generated}\n\n{footer}",
                title = EXPORT_TITLE,
                original = self.original_text,
                sentiment = self.sentiment,
                style = self.style.display_label(),
                generated = self.generated_text,
                footer = self.footer(),
            ),
        }
    }

    pub fn to_document(&self, format: ExportFormat) -> ExportDocument {
        ExportDocument {
            bytes: self.render(format).into_bytes(),
            mime: format.mime(),
            filename: self.filename(format),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub filename: String,
}

impl ExportDocument {
    /// Write into `dir` under the document's own filename.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        info!("Exported {} ({} bytes) to {}", self.mime, self.bytes.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> ExportRecord {
        ExportRecord {
            original_text: "I love exploring new cities!".to_string(),
            sentiment: SentimentLabel::Positive,
            style: StyleMode::Playful,
            generated_text: "Cities are giant playgrounds.".to_string(),
            word_count: 4,
            timestamp: Local.with_ymd_and_hms(2025, 10, 3, 14, 5, 9).unwrap(),
        }
    }

    #[test]
    fn test_filename_encodes_sentiment_style_and_time() {
        let rec = record();
        assert_eq!(
            rec.filename(ExportFormat::PlainText),
            "sentiment_text_positive_eli10_(fun_&_emojis)_20251003_140509.txt"
        );

        let formal = ExportRecord {
            style: StyleMode::Formal,
            sentiment: SentimentLabel::Negative,
            ..rec
        };
        assert_eq!(
            formal.filename(ExportFormat::Document),
            "sentiment_text_negative_normal_(formal)_20251003_140509.md"
        );
    }

    #[test]
    fn test_plain_text_layout() {
        let text = record().render(ExportFormat::PlainText);
        assert!(text.starts_with("AI Sentiment Text Generator\n\nOriginal Prompt: I love exploring new cities!\n"));
        assert!(text.contains("Sentiment: positive\nStyle: ELI10 (Fun & Emojis)\n"));
        assert!(text.contains("Generated Text:\nCities are giant playgrounds."));
        assert!(text.ends_with("Generated on 2025-10-03 14:05:09 | ~4 words"));
    }

    #[test]
    fn test_document_layout() {
        let doc = record().to_document(ExportFormat::Document);
        let text = String::from_utf8(doc.bytes).unwrap();
        assert_eq!(doc.mime, "text/markdown");
        assert!(text.starts_with("# AI Sentiment Text Generator"));
        assert!(text.contains("**Sentiment:** positive"));
        assert!(text.contains("## Generated Text\n\nCities are giant playgrounds."));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("document".parse::<ExportFormat>().unwrap(), ExportFormat::Document);
        assert_eq!("TXT".parse::<ExportFormat>().unwrap(), ExportFormat::PlainText);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_write_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let doc = record().to_document(ExportFormat::PlainText);
        let path = doc.write_to(dir.path()).unwrap();

        assert_eq!(path.file_name().unwrap().to_string_lossy(), doc.filename);
        assert_eq!(std::fs::read(&path).unwrap(), doc.bytes);
    }
}
