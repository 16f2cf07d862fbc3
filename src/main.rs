// src/main.rs

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, Registry};

use tonesmith::export::{ExportFormat, ExportRecord};
use tonesmith::generation::DEFAULT_WORD_COUNT;
use tonesmith::pipeline::BLANK_INPUT_MESSAGE;
use tonesmith::{
    AppConfig, GeminiModel, GeminiProvider, LlmProvider, Notice, NoticeLevel, PipelineError,
    PipelineRequest, SentimentLabel, SentimentMode, SentimentPipeline, StyleMode,
};

#[derive(Parser)]
#[command(name = "tonesmith")]
#[command(about = "Detect the sentiment of a prompt and write a passage that matches it", long_about = None)]
struct Cli {
    /// Gemini model (overrides TONESMITH_MODEL)
    #[arg(long, global = true)]
    model: Option<GeminiModel>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify the sentiment of TEXT
    Classify {
        text: String,
    },

    /// Generate a passage aligned to the sentiment of TEXT
    Generate {
        text: String,

        /// "auto" to detect, or positive / negative / neutral
        #[arg(long, default_value = "auto", value_parser = parse_sentiment_mode)]
        sentiment: SentimentMode,

        /// Target length in words (50-500)
        #[arg(short, long, default_value_t = DEFAULT_WORD_COUNT)]
        words: u32,

        /// "ELI10 (Fun & Emojis)" or "Normal (Formal)"; case and suffix insensitive
        #[arg(long, default_value = "ELI10 (Fun & Emojis)")]
        style: StyleMode,

        /// Directory to write an export file into
        #[arg(long)]
        export: Option<PathBuf>,

        /// Export format: document or text
        #[arg(long, default_value = "document")]
        format: ExportFormat,

        /// Print the full outcome as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn parse_sentiment_mode(raw: &str) -> Result<SentimentMode, String> {
    if raw.trim().eq_ignore_ascii_case("auto") {
        return Ok(SentimentMode::Auto);
    }
    raw.parse::<SentimentLabel>().map(SentimentMode::Manual)
}

fn report(notice: &Notice) {
    match notice.level {
        NoticeLevel::Info => eprintln!("{}", notice.message),
        _ => eprintln!("{}", notice),
    }
}

type LevelHandle = reload::Handle<LevelFilter, Registry>;

/// Logging stack with an adjustable level, so it can be installed before the
/// configured level is known.
fn logging<W>(debug: bool, writer: W) -> (impl Subscriber + Send + Sync, LevelHandle)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let initial = if debug { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let (filter, handle) = reload::Layer::new(initial);
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer));
    (subscriber, handle)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let (subscriber, level_handle) = logging(cli.debug, std::io::stderr);
    subscriber.init();

    // A missing credential halts before anything else happens.
    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };
    if let Some(model) = cli.model {
        config.model = model;
    }

    if !cli.debug {
        let level = config.log_level.parse::<LevelFilter>().unwrap_or_else(|_| {
            warn!("Unknown log level '{}', using info", config.log_level);
            LevelFilter::INFO
        });
        if let Err(e) = level_handle.reload(level) {
            warn!("Could not apply log level {}: {}", level, e);
        }
    }

    info!("Starting tonesmith with {}", config.model);

    let provider: Arc<dyn LlmProvider> =
        Arc::new(GeminiProvider::new(&config).context("Failed to build Gemini client")?);
    let pipeline = SentimentPipeline::from_config(provider, &config);

    match cli.command {
        Command::Classify { text } => {
            if text.trim().is_empty() {
                report(&Notice::warning(BLANK_INPUT_MESSAGE));
                return Ok(ExitCode::from(2));
            }
            let classification = pipeline.classifier().classify(&text).await?;
            if let Some(notice) = &classification.notice {
                report(notice);
            }
            println!("{}", classification.label);
        }
        Command::Generate {
            text,
            sentiment,
            words,
            style,
            export,
            format,
            json,
        } => {
            let request = PipelineRequest {
                text,
                mode: sentiment,
                word_count: words,
                style,
            };

            let outcome = match pipeline.run(&request).await {
                Ok(outcome) => outcome,
                Err(PipelineError::InvalidInput(message)) => {
                    report(&Notice::warning(message));
                    return Ok(ExitCode::from(2));
                }
                Err(e) => {
                    error!("Pipeline failed: {}", e);
                    return Err(e.into());
                }
            };

            for notice in &outcome.notices {
                report(notice);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("Sentiment: {}", outcome.sentiment);
                println!("Style: {}", outcome.style.display_label());
                println!();
                println!("{}", outcome.generated.text);
                println!();
                println!("Generated ~{} words", outcome.generated.approximate_word_count);
            }

            if let Some(dir) = export {
                let document = ExportRecord::from_outcome(&outcome, Local::now()).to_document(format);
                let path = document
                    .write_to(&dir)
                    .with_context(|| format!("Failed to export to {}", dir.display()))?;
                eprintln!("Saved {}", path.display());
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_warnings_reach_log_output() {
        let captured = Captured::default();
        let sink = captured.clone();
        let (subscriber, _handle) = logging(false, move || sink.clone());

        tracing::subscriber::with_default(subscriber, || {
            AppConfig::from_lookup(lookup(&[
                ("TONESMITH_SECRETS_FILE", "/nonexistent/tonesmith/secrets.toml"),
                ("GEMINI_API_KEY", "abc"),
                ("TONESMITH_RETRY_ATTEMPTS", "abc"),
                ("TONESMITH_SENTIMENT_CACHE_TTL", "five"),
            ]))
            .unwrap();
        });

        let output = captured.contents();
        assert!(output.contains("TONESMITH_RETRY_ATTEMPTS"), "{output}");
        assert!(output.contains("TONESMITH_SENTIMENT_CACHE_TTL"), "{output}");
        assert!(output.contains("parse failed"), "{output}");
    }

    #[test]
    fn test_level_can_be_raised_after_install() {
        let captured = Captured::default();
        let sink = captured.clone();
        let (subscriber, handle) = logging(false, move || sink.clone());

        tracing::subscriber::with_default(subscriber, || {
            info!("before reload");
            handle.reload(LevelFilter::WARN).unwrap();
            info!("hidden after reload");
            warn!("shown after reload");
        });

        let output = captured.contents();
        assert!(output.contains("before reload"));
        assert!(!output.contains("hidden after reload"));
        assert!(output.contains("shown after reload"));
    }

    #[test]
    fn test_sentiment_mode_parsing() {
        assert_eq!(parse_sentiment_mode("AUTO").unwrap(), SentimentMode::Auto);
        assert_eq!(
            parse_sentiment_mode("negative").unwrap(),
            SentimentMode::Manual(SentimentLabel::Negative)
        );
        assert!(parse_sentiment_mode("furious").is_err());
    }
}
