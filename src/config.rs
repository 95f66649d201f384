//! Application configuration.
//!
//! Everything is driven by environment variables so the server can run in a
//! container without a config file. Only the Gemini API key is required; all
//! tuning knobs carry defaults matching production behavior.

use std::path::PathBuf;
use std::time::Duration;

/// Tuning knobs for the batch task-detail orchestrator.
#[derive(Debug, Clone)]
pub struct DetailSettings {
    /// Maximum number of tasks per prompt.
    pub batch_size: usize,
    /// Maximum number of batches in flight against the gateway at once.
    pub max_workers: usize,
    /// Total attempts per batch (first try included).
    pub max_attempts: u32,
    /// Fixed pause between attempts.
    pub retry_backoff: Duration,
}

impl Default for DetailSettings {
    fn default() -> Self {
        Self {
            batch_size: 3,
            max_workers: 5,
            max_attempts: 3,
            retry_backoff: Duration::from_millis(1500),
        }
    }
}

/// Global application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Path of the SQLite database file.
    pub database_path: PathBuf,
    /// API key for the Google Generative Language API.
    pub gemini_api_key: String,
    /// Model used for long structured generations (specification, tasks).
    pub model_pro: String,
    /// Model used for quick single-shot generations.
    pub model_flash: String,
    /// Sampling temperature for all generations.
    pub temperature: f64,
    /// Per-call timeout for gateway requests.
    pub request_timeout: Duration,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
    /// Batch orchestrator settings.
    pub detail: DetailSettings,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Required: `GEMINI_API_KEY`. Everything else has defaults:
    /// - `BIND_ADDR` (default `0.0.0.0:8000`)
    /// - `DATABASE_PATH` (default `hackplan.db`)
    /// - `MODEL_PRO` / `MODEL_FLASH` (default `gemini-2.0-flash`)
    /// - `LLM_TEMPERATURE` (default `0.5`)
    /// - `REQUEST_TIMEOUT_SECS` (default `60`)
    /// - `ALLOWED_ORIGINS` (comma-separated, default `http://localhost:3000`)
    /// - `DETAIL_BATCH_SIZE` / `DETAIL_MAX_WORKERS` / `DETAIL_MAX_ATTEMPTS` /
    ///   `DETAIL_RETRY_BACKOFF_MS`
    pub fn from_env() -> anyhow::Result<Self> {
        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY must be set"))?;

        let defaults = DetailSettings::default();
        let detail = DetailSettings {
            batch_size: env_parse("DETAIL_BATCH_SIZE", defaults.batch_size),
            max_workers: env_parse("DETAIL_MAX_WORKERS", defaults.max_workers),
            max_attempts: env_parse("DETAIL_MAX_ATTEMPTS", defaults.max_attempts),
            retry_backoff: Duration::from_millis(env_parse(
                "DETAIL_RETRY_BACKOFF_MS",
                defaults.retry_backoff.as_millis() as u64,
            )),
        };

        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "hackplan.db".to_string())
                .into(),
            gemini_api_key,
            model_pro: std::env::var("MODEL_PRO")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            model_flash: std::env::var("MODEL_FLASH")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            temperature: env_parse("LLM_TEMPERATURE", 0.5),
            request_timeout: Duration::from_secs(env_parse("REQUEST_TIMEOUT_SECS", 60)),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            detail,
        })
    }
}

/// Parse an environment variable, falling back to a default on absence or
/// malformed input (logged, not fatal).
fn env_parse<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value for {}: {:?}, using default", name, raw);
            default
        }),
        Err(_) => default,
    }
}
