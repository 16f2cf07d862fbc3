// src/config/mod.rs
// Process-wide settings, resolved once at startup and passed by reference

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::DEFAULT_CACHE_TTL_SECS;
use crate::error::{PipelineError, Result};
use crate::llm::GeminiModel;
use crate::retry::RetryPolicy;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const SECRETS_FILE_VAR: &str = "TONESMITH_SECRETS_FILE";
pub const DEFAULT_SECRETS_FILE: &str = "secrets.toml";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct AppConfig {
    // ── Gemini
    pub api_key: String,
    pub model: GeminiModel,
    pub base_url: String,
    pub request_timeout_secs: u64,

    // ── Retry policy
    pub retry_attempts: u32,
    pub retry_min_delay_secs: u64,
    pub retry_max_delay_secs: u64,

    // ── Sentiment cache
    pub sentiment_cache_ttl_secs: u64,

    // ── Logging
    pub log_level: String,
}

// The key never shows up in logs or panics.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_min_delay_secs", &self.retry_min_delay_secs)
            .field("retry_max_delay_secs", &self.retry_max_delay_secs)
            .field("sentiment_cache_ttl_secs", &self.sentiment_cache_ttl_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// Parse a typed value from a raw setting, tolerating trailing `# comments`
/// and surrounding whitespace. Falls back to `default` when absent or invalid.
fn value_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr,
{
    match raw {
        Some(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => {
                    debug!("Config: {} = {} (from environment)", key, clean_val);
                    parsed
                }
                Err(_) => {
                    warn!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        None => default,
    }
}

/// Read `GEMINI_API_KEY` out of a TOML secrets file, if the file exists.
fn read_secret(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    let secrets: HashMap<String, toml::Value> = toml::from_str(&contents).map_err(|e| {
        PipelineError::Config(format!("invalid secrets file {}: {}", path.display(), e))
    })?;

    Ok(secrets
        .get(API_KEY_VAR)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

impl AppConfig {
    /// Load `.env` (if present) and resolve settings from the process
    /// environment. The API key comes from the secrets file first, then the
    /// environment.
    pub fn from_env() -> Result<Self> {
        if dotenvy::dotenv().is_err() {
            debug!(".env file not found, using process environment only");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secrets_path = lookup(SECRETS_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SECRETS_FILE));

        let api_key = match read_secret(&secrets_path)? {
            Some(key) => {
                debug!("Using {} from {}", API_KEY_VAR, secrets_path.display());
                key
            }
            None => lookup(API_KEY_VAR)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    PipelineError::Config(format!(
                        "Missing {API_KEY_VAR}. Set it in .env, the environment, or {}",
                        secrets_path.display()
                    ))
                })?,
        };

        let config = Self {
            api_key,
            model: value_or("TONESMITH_MODEL", lookup("TONESMITH_MODEL"), GeminiModel::default()),
            base_url: value_or(
                "GEMINI_BASE_URL",
                lookup("GEMINI_BASE_URL"),
                DEFAULT_BASE_URL.to_string(),
            ),
            request_timeout_secs: value_or(
                "TONESMITH_REQUEST_TIMEOUT",
                lookup("TONESMITH_REQUEST_TIMEOUT"),
                DEFAULT_TIMEOUT_SECS,
            ),
            retry_attempts: value_or("TONESMITH_RETRY_ATTEMPTS", lookup("TONESMITH_RETRY_ATTEMPTS"), 3),
            retry_min_delay_secs: value_or(
                "TONESMITH_RETRY_MIN_DELAY_SECS",
                lookup("TONESMITH_RETRY_MIN_DELAY_SECS"),
                4,
            ),
            retry_max_delay_secs: value_or(
                "TONESMITH_RETRY_MAX_DELAY_SECS",
                lookup("TONESMITH_RETRY_MAX_DELAY_SECS"),
                10,
            ),
            sentiment_cache_ttl_secs: value_or(
                "TONESMITH_SENTIMENT_CACHE_TTL",
                lookup("TONESMITH_SENTIMENT_CACHE_TTL"),
                DEFAULT_CACHE_TTL_SECS,
            ),
            log_level: value_or("TONESMITH_LOG_LEVEL", lookup("TONESMITH_LOG_LEVEL"), "info".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(PipelineError::Config("API key cannot be empty".to_string()));
        }
        if self.base_url.is_empty() {
            return Err(PipelineError::Config("Base URL cannot be empty".to_string()));
        }
        if self.retry_attempts == 0 {
            return Err(PipelineError::Config(
                "TONESMITH_RETRY_ATTEMPTS must be at least 1".to_string(),
            ));
        }
        if self.retry_min_delay_secs > self.retry_max_delay_secs {
            return Err(PipelineError::Config(format!(
                "retry min delay ({}s) exceeds max delay ({}s)",
                self.retry_min_delay_secs, self.retry_max_delay_secs
            )));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_attempts,
            multiplier: Duration::from_secs(1),
            min_delay: Duration::from_secs(self.retry_min_delay_secs),
            max_delay: Duration::from_secs(self.retry_max_delay_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn sentiment_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.sentiment_cache_ttl_secs)
    }
}
