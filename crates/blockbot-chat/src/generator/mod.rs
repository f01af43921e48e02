//! Text-generation port and its adapters.
//!
//! The controller only sees [`TextGenerator`]. Adapters:
//! - [`GeminiGenerator`]: Google Generative Language REST API
//! - [`DisabledGenerator`]: always fails (no backend configured)
//! - [`ScriptedGenerator`]: queued responses for tests and demos

pub mod gemini;
pub mod scripted;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use blockbot_core::config::GeneratorConfig;
use blockbot_core::error::BlockbotError;

pub use gemini::{GeminiConfig, GeminiGenerator};
pub use scripted::ScriptedGenerator;

/// Failures of the text-generation backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("API key not configured (set {0})")]
    MissingApiKey(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("backend returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("backend returned no text")]
    EmptyResponse,
    #[error("malformed backend response: {0}")]
    Malformed(String),
    #[error("generation timed out after {0} seconds")]
    Timeout(u64),
    #[error("text generation unavailable: {0}")]
    Unavailable(String),
}

impl From<GenerationError> for BlockbotError {
    fn from(err: GenerationError) -> Self {
        BlockbotError::Generation(err.to_string())
    }
}

/// A backend that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Generator used when no backend is available. Every call fails.
#[derive(Debug, Clone)]
pub struct DisabledGenerator {
    reason: String,
}

impl DisabledGenerator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// Build the generator named by `config.provider`.
///
/// A missing API key or an unknown provider yields a [`DisabledGenerator`]
/// with a warning: the flows keep working, free-form questions get the
/// apology text.
pub fn build_generator(config: &GeneratorConfig) -> Arc<dyn TextGenerator> {
    match config.provider.to_ascii_lowercase().as_str() {
        "gemini" => {
            let api_key = match std::env::var(&config.api_key_env) {
                Ok(key) if !key.trim().is_empty() => key,
                _ => {
                    let err = GenerationError::MissingApiKey(config.api_key_env.clone());
                    tracing::warn!(error = %err, "Text generation disabled");
                    return Arc::new(DisabledGenerator::new(err.to_string()));
                }
            };
            let gemini_config = GeminiConfig::new(api_key)
                .with_model(&config.model)
                .with_base_url(&config.base_url)
                .with_timeout(Duration::from_secs(config.timeout_secs));
            match GeminiGenerator::new(gemini_config) {
                Ok(generator) => {
                    tracing::info!(model = %config.model, "Using Gemini text generation");
                    Arc::new(generator)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to build Gemini client; text generation disabled");
                    Arc::new(DisabledGenerator::new(e.to_string()))
                }
            }
        }
        "disabled" | "none" => Arc::new(DisabledGenerator::new("disabled in configuration")),
        other => {
            tracing::warn!(provider = %other, "Unknown generator provider; text generation disabled");
            Arc::new(DisabledGenerator::new(format!("unknown provider '{}'", other)))
        }
    }
}
