//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use blockbot_chat::DialogueController;
use blockbot_core::config::BlockbotConfig;

/// Shared application state.
///
/// One server serves one conversation; every client talks to the same
/// controller.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, read-only after startup.
    pub config: Arc<BlockbotConfig>,
    /// The conversation session.
    pub controller: Arc<DialogueController>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: BlockbotConfig, controller: DialogueController) -> Self {
        Self {
            config: Arc::new(config),
            controller: Arc::new(controller),
            start_time: Instant::now(),
        }
    }
}
