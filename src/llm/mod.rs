//! LLM client module for interacting with language models.
//!
//! This module provides a trait-based abstraction over text-completion
//! providers, with the Google Generative Language API (Gemini) as the
//! primary implementation.

mod error;
mod gemini;

pub use error::{classify_http_status, LlmError, LlmErrorKind};
pub use gemini::GeminiClient;

use async_trait::async_trait;
use std::sync::Arc;

/// Optional parameters for a completion request.
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    /// Sampling temperature (0 = deterministic).
    pub temperature: Option<f64>,
    /// Maximum output tokens to generate.
    pub max_tokens: Option<u64>,
}

impl CompletionOptions {
    /// Options carrying only a temperature.
    pub fn with_temperature(temperature: f64) -> Self {
        Self {
            temperature: Some(temperature),
            max_tokens: None,
        }
    }
}

/// Trait for text-completion clients.
///
/// The provider is treated as an opaque capability: one prompt in, raw text
/// out. Retry policy deliberately lives with the callers (the batch
/// orchestrator retries, single-shot services do not), so implementations
/// perform exactly one request per call and surface classified errors.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one completion request and return the raw response text.
    async fn complete(&self, prompt: &str, options: CompletionOptions)
        -> Result<String, LlmError>;
}

/// Shared client handle injected into the services at startup.
pub type SharedLlmClient = Arc<dyn LlmClient>;
