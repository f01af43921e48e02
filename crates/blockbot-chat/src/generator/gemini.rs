//! Gemini adapter for the Google Generative Language REST API.
//!
//! Sends a single-turn `generateContent` request and concatenates the text
//! parts of the first candidate.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use super::{GenerationError, TextGenerator};

/// Configuration for the Gemini adapter.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    api_key: Secret<String>,
    /// Model name, e.g. "gemini-pro".
    pub model: String,
    /// API base URL without trailing slash.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gemini-pro".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Text generator backed by Gemini.
pub struct GeminiGenerator {
    config: GeminiConfig,
    client: Client,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.config.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.config.timeout.as_secs())
                } else {
                    GenerationError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "Gemini request failed");
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;
        extract_text(parsed)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

fn extract_text(response: GenerateResponse) -> Result<String, GenerationError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Ok(text)
    }
}

/// Pull `error.message` out of an error body, or fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
