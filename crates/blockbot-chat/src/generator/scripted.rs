//! Scripted generator for tests and offline demos.
//!
//! Responses are consumed in order; once the script runs out every call
//! returns the default reply. Prompts are recorded for inspection.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{GenerationError, TextGenerator};

const DEFAULT_REPLY: &str = "This is a scripted reply.";

#[derive(Debug, Clone, Default)]
pub struct ScriptedGenerator {
    script: Arc<Mutex<VecDeque<Result<String, GenerationError>>>>,
    calls: Arc<Mutex<Vec<String>>>,
    delay: Duration,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, err: GenerationError) -> Self {
        self.push(Err(err));
        self
    }

    /// Wait this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Prompts received so far, oldest first.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn push(&self, item: Result<String, GenerationError>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(item);
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(prompt.to_string());
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        next.unwrap_or_else(|| Ok(DEFAULT_REPLY.to_string()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_responses_in_order() {
        let generator = ScriptedGenerator::new()
            .with_response("one")
            .with_error(GenerationError::EmptyResponse)
            .with_response("three");

        assert_eq!(generator.generate("a").await.unwrap(), "one");
        assert_eq!(
            generator.generate("b").await,
            Err(GenerationError::EmptyResponse)
        );
        assert_eq!(generator.generate("c").await.unwrap(), "three");
    }

    #[tokio::test]
    async fn test_default_reply_when_script_exhausted() {
        let generator = ScriptedGenerator::new();
        assert_eq!(generator.generate("x").await.unwrap(), DEFAULT_REPLY);
    }

    #[tokio::test]
    async fn test_records_prompts() {
        let generator = ScriptedGenerator::new();
        generator.generate("first").await.unwrap();
        generator.generate("second").await.unwrap();
        assert_eq!(generator.calls(), vec!["first", "second"]);
        assert_eq!(generator.call_count(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_script_and_calls() {
        let generator = ScriptedGenerator::new().with_response("shared");
        let clone = generator.clone();
        assert_eq!(clone.generate("p").await.unwrap(), "shared");
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_applies() {
        let generator = ScriptedGenerator::new().with_delay(Duration::from_secs(5));
        let start = tokio::time::Instant::now();
        generator.generate("slow").await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
